//! Deal sources: where the 52-card stock order of a new game comes from.
//!
//! Sources:
//!   * `Random`: a fresh seed from the thread RNG.
//!   * `Seeded(n)`: reproducible ChaCha20 shuffle from a `u64`.
//!   * `Pysol(s)`: PySolFC game numbers. The shuffle reproduces
//!     PySolFC's `construct_random` + `RandomBase.shuffle`: an `msNNN`
//!     number or any number below 32000 uses the Microsoft LCG, any other
//!     number (arbitrarily large) seeds CPython's MT19937.
//!   * `Fixed`: an explicit order, for tests and saved deals.
//!
//! The returned order has the stock top at the end, ready for
//! `Tableau::deal_from_shuffled`.

use std::fmt;

use num_bigint::BigUint;
use num_traits::ToPrimitive;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::card::{standard_deck, Card, Rank, Suit, CARDS_PER_DECK};
use crate::error::DealError;

const DECK_LEN: usize = CARDS_PER_DECK as usize;

/// Stock order, top card last.
pub type StockOrder = [Card; DECK_LEN];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DealSource {
    Random,
    Seeded(u64),
    Pysol(String),
    /// An explicit order, top card last.
    Fixed(Box<StockOrder>),
}

/// A resolved deal: the order plus a label that reproduces it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deal {
    pub label: String,
    pub order: StockOrder,
}

impl fmt::Display for DealSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DealSource::Random => write!(f, "random"),
            DealSource::Seeded(n) => write!(f, "seed {n}"),
            DealSource::Pysol(s) => write!(f, "pysol {s}"),
            DealSource::Fixed(_) => write!(f, "fixed"),
        }
    }
}

impl DealSource {
    /// Produce the stock order for this source.
    ///
    /// `Random` picks a seed and reports it in the label, so every deal can
    /// be replayed with `Seeded`.
    pub fn deal(&self) -> Result<Deal, DealError> {
        match self {
            DealSource::Random => {
                let seed: u64 = rand::rng().random();
                DealSource::Seeded(seed).deal()
            }
            DealSource::Seeded(seed) => Ok(Deal {
                label: format!("seed {seed}"),
                order: seeded_order(*seed),
            }),
            DealSource::Pysol(s) => {
                let number = GameNumber::parse(s)?;
                let order = pysol_order(&number)?;
                Ok(Deal {
                    label: format!("pysol {number}"),
                    order,
                })
            }
            DealSource::Fixed(order) => Ok(Deal {
                label: "fixed".to_string(),
                order: **order,
            }),
        }
    }
}

fn seeded_order(seed: u64) -> StockOrder {
    let mut order = standard_deck();
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    order.shuffle(&mut rng);
    order
}

// --- PySolFC game numbers ---

/// A normalized PySolFC game number.
#[derive(Clone, Debug, PartialEq, Eq)]
enum GameNumber {
    Ms(u64),
    Num(BigUint),
}

impl fmt::Display for GameNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameNumber::Ms(n) => write!(f, "ms{n}"),
            GameNumber::Num(n) => write!(f, "{n}"),
        }
    }
}

impl GameNumber {
    /// Lowercase, drop a trailing `L` and the separators `# - _ . ,` and
    /// whitespace, then read `msNNN` or a plain decimal number.
    fn parse(raw: &str) -> Result<Self, DealError> {
        let trimmed = raw.trim();
        let trimmed = trimmed.strip_suffix('L').unwrap_or(trimmed);
        let cleaned: String = trimmed
            .chars()
            .filter(|c| !c.is_whitespace() && !matches!(c, '#' | '-' | '_' | '.' | ','))
            .map(|c| c.to_ascii_lowercase())
            .collect();

        if cleaned.is_empty() {
            return Err(DealError::EmptySeed);
        }
        let invalid = || DealError::InvalidSeed(raw.to_string());

        if let Some(digits) = cleaned.strip_prefix("ms") {
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            return digits.parse().map(GameNumber::Ms).map_err(|_| invalid());
        }

        if !cleaned.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        BigUint::parse_bytes(cleaned.as_bytes(), 10)
            .map(GameNumber::Num)
            .ok_or_else(invalid)
    }
}

/// PySolFC's suit order is Clubs, Spades, Hearts, Diamonds.
const PYSOL_SUITS: [Suit; 4] = [Suit::Clubs, Suit::Spades, Suit::Hearts, Suit::Diamonds];

fn pysol_order(number: &GameNumber) -> Result<StockOrder, DealError> {
    let mut order: Vec<Card> = PYSOL_SUITS
        .iter()
        .flat_map(|&suit| Rank::ALL.iter().map(move |&rank| Card::new(suit, rank)))
        .collect();

    match number {
        GameNumber::Ms(n) => MsLcg::new(*n)?.shuffle(&mut order),
        GameNumber::Num(n) => match n.to_u64().filter(|&v| v < 32000) {
            Some(small) => MsLcg::new(small)?.shuffle(&mut order),
            None => Mt19937::from_big(n).shuffle(&mut order),
        },
    }

    // PySolFC deals from the end of the talon list, as we do.
    let mut out = standard_deck();
    out.copy_from_slice(&order);
    Ok(out)
}

/// The two generators share PySolFC's Fisher-Yates shuffle.
trait PysolRng {
    /// Uniform integer in `0..=hi`.
    fn randint(&mut self, hi: usize) -> usize;

    fn shuffle<T>(&mut self, seq: &mut [T]) {
        for n in (1..seq.len()).rev() {
            let j = self.randint(n);
            seq.swap(n, j);
        }
    }
}

/// Microsoft-compatible 31/33-bit LCG (`pysol_cards.random.LCRandom31`).
struct MsLcg {
    seed: u64,
    state: u64,
}

impl MsLcg {
    const MAX_SEED: u64 = (1 << 33) - 1;

    fn new(seed: u64) -> Result<Self, DealError> {
        if !(1..=Self::MAX_SEED).contains(&seed) {
            return Err(DealError::MsSeedOutOfRange(seed));
        }
        let state = if seed < 1 << 32 { seed } else { seed - (1 << 32) };
        Ok(MsLcg { seed, state })
    }

    fn step(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(214013).wrapping_add(2531011) & Self::MAX_SEED;
        self.state >> 16
    }

    fn next_value(&mut self) -> usize {
        if self.seed < 1 << 32 {
            let r = (self.step() & 0x7fff) as usize;
            if self.seed < 0x8000_0000 { r } else { r | 0x8000 }
        } else {
            (self.step() & 0xffff) as usize + 1
        }
    }
}

impl PysolRng for MsLcg {
    fn randint(&mut self, hi: usize) -> usize {
        self.next_value() % (hi + 1)
    }
}

const MT_N: usize = 624;
const MT_M: usize = 397;

/// MT19937 with CPython's seeding of arbitrary-size integers and its
/// 53-bit `random()`.
struct Mt19937 {
    mt: [u32; MT_N],
    index: usize,
}

impl Mt19937 {
    fn from_big(seed: &BigUint) -> Self {
        let mut key = seed.to_u32_digits();
        if key.is_empty() {
            key.push(0);
        }
        let mut rng = Mt19937 {
            mt: [0; MT_N],
            index: MT_N,
        };
        rng.init_by_array(&key);
        rng
    }

    fn init_genrand(&mut self, s: u32) {
        self.mt[0] = s;
        for i in 1..MT_N {
            let prev = self.mt[i - 1];
            self.mt[i] = 1812433253u32
                .wrapping_mul(prev ^ (prev >> 30))
                .wrapping_add(i as u32);
        }
        self.index = MT_N;
    }

    fn init_by_array(&mut self, key: &[u32]) {
        self.init_genrand(19650218);
        let (mut i, mut j) = (1usize, 0usize);

        for _ in 0..MT_N.max(key.len()) {
            let prev = self.mt[i - 1];
            self.mt[i] = (self.mt[i] ^ 1664525u32.wrapping_mul(prev ^ (prev >> 30)))
                .wrapping_add(key[j])
                .wrapping_add(j as u32);
            i += 1;
            j += 1;
            if i >= MT_N {
                self.mt[0] = self.mt[MT_N - 1];
                i = 1;
            }
            if j >= key.len() {
                j = 0;
            }
        }
        for _ in 0..MT_N - 1 {
            let prev = self.mt[i - 1];
            self.mt[i] = (self.mt[i] ^ 1566083941u32.wrapping_mul(prev ^ (prev >> 30)))
                .wrapping_sub(i as u32);
            i += 1;
            if i >= MT_N {
                self.mt[0] = self.mt[MT_N - 1];
                i = 1;
            }
        }
        self.mt[0] = 0x8000_0000;
    }

    fn twist(&mut self) {
        for i in 0..MT_N {
            let y = (self.mt[i] & 0x8000_0000) | (self.mt[(i + 1) % MT_N] & 0x7fff_ffff);
            let mut next = self.mt[(i + MT_M) % MT_N] ^ (y >> 1);
            if y & 1 != 0 {
                next ^= 0x9908_b0df;
            }
            self.mt[i] = next;
        }
        self.index = 0;
    }

    fn next_u32(&mut self) -> u32 {
        if self.index >= MT_N {
            self.twist();
        }
        let mut y = self.mt[self.index];
        self.index += 1;
        y ^= y >> 11;
        y ^= (y << 7) & 0x9d2c_5680;
        y ^= (y << 15) & 0xefc6_0000;
        y ^ (y >> 18)
    }

    /// `(a * 2^26 + b) / 2^53` from two draws, as CPython does.
    fn next_f64(&mut self) -> f64 {
        let a = u64::from(self.next_u32() >> 5);
        let b = u64::from(self.next_u32() >> 6);
        ((a << 26) + b) as f64 / (1u64 << 53) as f64
    }
}

impl PysolRng for Mt19937 {
    fn randint(&mut self, hi: usize) -> usize {
        (self.next_f64() * (hi + 1) as f64) as usize
    }
}
