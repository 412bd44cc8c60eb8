//! Card, Suit, Rank and the card registry for a standard 52-card deck.
//!
//! - `Card` is a compact 1-byte identifier (0..=51). Piles store these,
//!   never copies of card records.
//! - `Deck` is the one place where a card's mutable attribute (its
//!   orientation) lives.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CardParseError;

/// Number of suits in a standard deck.
pub const NUM_SUITS: u8 = 4;
/// Number of ranks in a standard deck.
pub const NUM_RANKS: u8 = 13;
/// Number of cards in a standard deck.
pub const CARDS_PER_DECK: u8 = NUM_SUITS * NUM_RANKS;

/// A playing card identifier in 0..=51.
///
/// The mapping is:
/// ```text
/// index = suit as u8 * 13 + rank as u8
/// ```
/// where `rank` is 0=Ace, 1=Two, ..., 12=King.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Card(u8);

/// The four suits, in foundation order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[repr(u8)]
pub enum Suit {
    Spades = 0,
    Hearts = 1,
    Diamonds = 2,
    Clubs = 3,
}

/// Card color, derived from the suit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Color {
    Red,
    Black,
}

/// The thirteen ranks. Ace is low.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[repr(u8)]
pub enum Rank {
    Ace = 0,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King, // 12
}

/// Red for hearts and diamonds, black otherwise.
#[inline]
pub fn color_of(suit: Suit) -> Color {
    match suit {
        Suit::Hearts | Suit::Diamonds => Color::Red,
        Suit::Spades | Suit::Clubs => Color::Black,
    }
}

impl Card {
    /// Create a new card from a suit and rank.
    #[inline]
    pub fn new(suit: Suit, rank: Rank) -> Self {
        let s = suit as u8;
        let r = rank as u8;
        debug_assert!(s < NUM_SUITS && r < NUM_RANKS);
        Card(s * NUM_RANKS + r)
    }

    /// Create a card from a raw index, or `None` if it is not in 0..=51.
    #[inline]
    pub fn from_index(index: u8) -> Option<Self> {
        (index < CARDS_PER_DECK).then_some(Card(index))
    }

    /// Return the raw 0..=51 index of this card.
    #[inline]
    pub fn index(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn suit(self) -> Suit {
        Suit::ALL[(self.0 / NUM_RANKS) as usize]
    }

    #[inline]
    pub fn rank(self) -> Rank {
        Rank::ALL[(self.0 % NUM_RANKS) as usize]
    }

    /// Rank number in 1..=13 (Ace=1, King=13).
    #[inline]
    pub fn rank_number(self) -> u8 {
        self.rank().number()
    }

    #[inline]
    pub fn color(self) -> Color {
        color_of(self.suit())
    }

    /// Textual id like "AS", "7C", "10H", "KD".
    pub fn short_str(self) -> String {
        format!("{}{}", self.rank().label(), self.suit().short_char())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank().label(), self.suit().short_char())
    }
}

impl FromStr for Card {
    type Err = CardParseError;

    /// Parse a textual id. Accepts "10" or "T" for ten, any letter case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim().to_ascii_uppercase();
        let mut chars = t.chars();
        let suit_ch = chars.next_back().ok_or(CardParseError::Empty)?;
        let rank_str = chars.as_str();

        let suit = Suit::from_char(suit_ch)
            .ok_or_else(|| CardParseError::Suit(s.to_string()))?;
        let rank = Rank::from_label(rank_str)
            .ok_or_else(|| CardParseError::Rank(s.to_string()))?;
        Ok(Card::new(suit, rank))
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.short_str()
    }
}

impl TryFrom<String> for Card {
    type Error = CardParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl Suit {
    /// All suits in a fixed, reproducible order.
    pub const ALL: [Suit; NUM_SUITS as usize] = [
        Suit::Spades,
        Suit::Hearts,
        Suit::Diamonds,
        Suit::Clubs,
    ];

    /// Position of this suit in `Suit::ALL`; also its foundation slot.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn color(self) -> Color {
        color_of(self)
    }

    /// Single-character representation: 'S', 'H', 'D', or 'C'.
    #[inline]
    pub fn short_char(self) -> char {
        match self {
            Suit::Spades => 'S',
            Suit::Hearts => 'H',
            Suit::Diamonds => 'D',
            Suit::Clubs => 'C',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'S' => Some(Suit::Spades),
            'H' => Some(Suit::Hearts),
            'D' => Some(Suit::Diamonds),
            'C' => Some(Suit::Clubs),
            _ => None,
        }
    }
}

impl Rank {
    /// All ranks in a fixed, reproducible order (Ace..King).
    pub const ALL: [Rank; NUM_RANKS as usize] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Rank number in 1..=13 (Ace=1, King=13).
    #[inline]
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    /// Inverse of `number`.
    pub fn from_number(n: u8) -> Option<Self> {
        if (1..=NUM_RANKS).contains(&n) {
            Some(Rank::ALL[(n - 1) as usize])
        } else {
            None
        }
    }

    /// Label used in card ids: "A", "2".."10", "J", "Q", "K".
    pub fn label(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "A" | "1" => Some(Rank::Ace),
            "T" => Some(Rank::Ten),
            "J" => Some(Rank::Jack),
            "Q" => Some(Rank::Queen),
            "K" => Some(Rank::King),
            _ => s
                .parse::<u8>()
                .ok()
                .filter(|n| (2..=10).contains(n))
                .and_then(Rank::from_number),
        }
    }
}

/// Helper for tableau rules: can `upper` be placed on `lower`?
///
/// True if `upper` is exactly one rank lower than `lower` and of the
/// opposite color.
#[inline]
pub fn is_one_lower_opposite_color(upper: Card, lower: Card) -> bool {
    upper.rank_number() + 1 == lower.rank_number() && upper.color() != lower.color()
}

/// Generate a standard 52-card deck in a fixed order.
///
/// Suits follow `Suit::ALL` order, and ranks follow `Rank::ALL` order.
pub fn standard_deck() -> [Card; CARDS_PER_DECK as usize] {
    let mut cards = [Card(0); CARDS_PER_DECK as usize];
    for (i, slot) in cards.iter_mut().enumerate() {
        *slot = Card(i as u8);
    }
    cards
}

/// Identity plus the one mutable attribute a card has.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardRecord {
    pub card: Card,
    pub face_up: bool,
}

/// Registry of every card record in a game, keyed by identifier.
///
/// Piles hold `Card` identifiers only; orientation is looked up here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deck {
    records: [CardRecord; CARDS_PER_DECK as usize],
}

/// All 52 cards, face-down, one per suit x rank.
pub fn create_deck() -> Deck {
    let mut records = [CardRecord {
        card: Card(0),
        face_up: false,
    }; CARDS_PER_DECK as usize];
    for (rec, card) in records.iter_mut().zip(standard_deck()) {
        rec.card = card;
    }
    Deck { records }
}

impl Deck {
    #[inline]
    fn record(&self, card: Card) -> &CardRecord {
        &self.records[card.index() as usize]
    }

    #[inline]
    pub fn is_face_up(&self, card: Card) -> bool {
        self.record(card).face_up
    }

    #[inline]
    pub(crate) fn set_face_up(&mut self, card: Card, face_up: bool) {
        self.records[card.index() as usize].face_up = face_up;
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardRecord> {
        self.records.iter()
    }

    /// Orientation of every card packed into one word, bit i = card i.
    pub fn face_up_mask(&self) -> u64 {
        self.records
            .iter()
            .filter(|r| r.face_up)
            .fold(0u64, |m, r| m | (1u64 << r.card.index()))
    }

    pub(crate) fn restore_face_up_mask(&mut self, mask: u64) {
        for rec in self.records.iter_mut() {
            rec.face_up = mask & (1u64 << rec.card.index()) != 0;
        }
    }
}

impl Default for Deck {
    fn default() -> Self {
        create_deck()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_index_round_trip() {
        for &suit in Suit::ALL.iter() {
            for &rank in Rank::ALL.iter() {
                let c = Card::new(suit, rank);
                assert!(c.index() < CARDS_PER_DECK);
                assert_eq!(c.suit(), suit);
                assert_eq!(c.rank(), rank);
                assert_eq!(Card::from_index(c.index()), Some(c));
            }
        }
        for raw in CARDS_PER_DECK..=u8::MAX {
            assert_eq!(Card::from_index(raw), None, "index {raw}");
        }
    }

    #[test]
    fn suit_chars() {
        assert_eq!(Suit::from_char('s'), Some(Suit::Spades));
        assert_eq!(Suit::from_char('H'), Some(Suit::Hearts));
        assert_eq!(Suit::from_char('x'), None);

        for suit in Suit::ALL {
            assert_eq!(Suit::from_char(suit.short_char()), Some(suit));
        }
    }

    #[test]
    fn rank_numbers_and_labels() {
        for (i, &rank) in Rank::ALL.iter().enumerate() {
            assert_eq!(rank.number(), i as u8 + 1);
            assert_eq!(Rank::from_number(rank.number()), Some(rank));
            assert_eq!(Rank::from_label(rank.label()), Some(rank));
        }
        assert_eq!(Rank::from_number(0), None);
        assert_eq!(Rank::from_number(14), None);
        assert_eq!(Rank::from_label("T"), Some(Rank::Ten));
    }

    #[test]
    fn card_colors_are_correct() {
        for rank in Rank::ALL.iter().copied() {
            assert_eq!(Card::new(Suit::Hearts, rank).color(), Color::Red);
            assert_eq!(Card::new(Suit::Diamonds, rank).color(), Color::Red);
            assert_eq!(Card::new(Suit::Clubs, rank).color(), Color::Black);
            assert_eq!(Card::new(Suit::Spades, rank).color(), Color::Black);
        }
    }

    #[test]
    fn short_str_display_and_parse() {
        let ah = Card::new(Suit::Hearts, Rank::Ace);
        let td = Card::new(Suit::Diamonds, Rank::Ten);
        let ks = Card::new(Suit::Spades, Rank::King);

        assert_eq!(ah.short_str(), "AH");
        assert_eq!(td.short_str(), "10D");
        assert_eq!(format!("{ks}"), "KS");

        assert_eq!("ah".parse::<Card>(), Ok(ah));
        assert_eq!("TD".parse::<Card>(), Ok(td));
        assert_eq!(" 10d ".parse::<Card>(), Ok(td));
        assert!("".parse::<Card>().is_err());
        assert!("11H".parse::<Card>().is_err());
        assert!("AX".parse::<Card>().is_err());
    }

    #[test]
    fn card_serializes_as_id() {
        let card = Card::new(Suit::Clubs, Rank::Queen);
        let json = serde_json::to_string(&card).unwrap();
        assert_eq!(json, "\"QC\"");
        let back: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(back, card);
        assert!(serde_json::from_str::<Card>("\"ZZ\"").is_err());
        assert!(serde_json::from_str::<Card>("60").is_err());
    }

    #[test]
    fn create_deck_is_52_unique_face_down_cards() {
        let deck = create_deck();
        let mut seen = [false; CARDS_PER_DECK as usize];
        for rec in deck.iter() {
            assert!(!rec.face_up);
            let idx = rec.card.index() as usize;
            assert!(!seen[idx], "duplicate card index {idx}");
            seen[idx] = true;
        }
        assert!(seen.iter().all(|&b| b));
    }

    #[test]
    fn face_up_mask_round_trips() {
        let mut deck = create_deck();
        let qh = Card::new(Suit::Hearts, Rank::Queen);
        let kc = Card::new(Suit::Clubs, Rank::King);
        deck.set_face_up(qh, true);
        deck.set_face_up(kc, true);
        let mask = deck.face_up_mask();
        assert_eq!(mask.count_ones(), 2);

        let mut other = create_deck();
        other.restore_face_up_mask(mask);
        assert_eq!(other, deck);
    }

    #[test]
    fn klondike_run_rule_helper() {
        let eight_hearts = Card::new(Suit::Hearts, Rank::Eight);
        let seven_spades = Card::new(Suit::Spades, Rank::Seven);
        let seven_hearts = Card::new(Suit::Hearts, Rank::Seven);

        assert!(is_one_lower_opposite_color(seven_spades, eight_hearts));
        assert!(!is_one_lower_opposite_color(seven_hearts, eight_hearts));
    }
}
