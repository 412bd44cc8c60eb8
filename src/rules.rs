//! Legality predicates for Klondike (single-card draw).
//!
//! Pure functions: they read the pile store and the card registry and never
//! mutate either. The move executor calls them before touching anything.

use crate::card::{is_one_lower_opposite_color, Card, Deck, Rank, Suit};
use crate::tableau::Tableau;

/// True if `card` may be placed on the `suit` foundation.
///
/// The foundation must be the card's own suit; an empty foundation takes
/// only an Ace, otherwise the card must be one rank above the top.
pub fn can_move_to_foundation(tab: &Tableau, card: Card, suit: Suit) -> bool {
    if card.suit() != suit {
        return false;
    }
    match tab.foundation(suit).top() {
        None => card.rank() == Rank::Ace,
        Some(top) => card.rank_number() == top.rank_number() + 1,
    }
}

/// True if `card` (the lead of a run) may be placed on column `col`.
///
/// An empty column takes only a King. Otherwise the column's top must be
/// face-up, of the opposite color, and exactly one rank higher.
pub fn can_move_to_tableau(tab: &Tableau, deck: &Deck, card: Card, col: usize) -> bool {
    let Some(pile) = tab.columns.get(col) else {
        return false;
    };
    match pile.top() {
        None => card.rank() == Rank::King,
        Some(top) => deck.is_face_up(top) && is_one_lower_opposite_color(card, top),
    }
}

/// True if the cards form a movable run.
///
/// `cards` is in pile order, starting at the selected card and ending at
/// the pile's top. Every card must be face-up, and each card must be one
/// rank above and opposite in color to the card that follows it. An empty
/// slice is not a run.
pub fn is_valid_run(deck: &Deck, cards: &[Card]) -> bool {
    if cards.is_empty() {
        return false;
    }
    if !cards.iter().all(|&c| deck.is_face_up(c)) {
        return false;
    }
    cards
        .windows(2)
        .all(|pair| is_one_lower_opposite_color(pair[1], pair[0]))
}
