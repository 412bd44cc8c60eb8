//! Shared helpers for unit tests: logging and hand-built positions.

use std::collections::HashSet;

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

use crate::card::{create_deck, standard_deck, Card, Deck, Rank, Suit};
use crate::tableau::Tableau;

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Install a test-writer subscriber once.
///
/// Level comes from `TEST_LOG`, then `RUST_LOG`, then `"warn"`.
pub fn init_logging() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

pub fn card(id: &str) -> Card {
    id.parse().unwrap()
}

/// Build a legal position by hand.
///
/// Column and waste entries are card ids, bottom first; a `#` prefix
/// marks a face-down card. `foundations` fills each listed suit from Ace
/// up to the given rank. Every card not placed goes to the stock,
/// face-down, in standard order.
pub fn position(
    columns: &[&[&str]],
    waste: &[&str],
    foundations: &[(Suit, u8)],
) -> (Tableau, Deck) {
    let mut tab = Tableau::new_empty();
    let mut deck = create_deck();
    let mut placed = HashSet::new();

    for (i, col) in columns.iter().enumerate() {
        for entry in col.iter() {
            let (face_up, id) = match entry.strip_prefix('#') {
                Some(rest) => (false, rest),
                None => (true, *entry),
            };
            let c = card(id);
            deck.set_face_up(c, face_up);
            tab.columns[i].push(c);
            assert!(placed.insert(c), "{c} placed twice");
        }
    }
    for id in waste {
        let c = card(id);
        deck.set_face_up(c, true);
        tab.waste.push(c);
        assert!(placed.insert(c), "{c} placed twice");
    }
    for &(suit, upto) in foundations {
        for r in 1..=upto {
            let c = Card::new(suit, Rank::from_number(r).unwrap());
            deck.set_face_up(c, true);
            tab.foundations[suit.index()].push(c);
            assert!(placed.insert(c), "{c} placed twice");
        }
    }
    for c in standard_deck() {
        if !placed.contains(&c) {
            tab.stock.push(c);
        }
    }
    tab.verify(&deck).unwrap();
    (tab, deck)
}

/// One move from a win: every foundation complete except Hearts, whose
/// King sits alone on column 0.
pub fn one_from_win() -> (Tableau, Deck) {
    let (mut tab, mut deck) = position(
        &[],
        &[],
        &[
            (Suit::Spades, 13),
            (Suit::Hearts, 12),
            (Suit::Diamonds, 13),
            (Suit::Clubs, 13),
        ],
    );
    let king = card("KH");
    tab.stock.clear();
    tab.columns[0].push(king);
    deck.set_face_up(king, true);
    tab.verify(&deck).unwrap();
    (tab, deck)
}
