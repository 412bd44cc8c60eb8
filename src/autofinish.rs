//! Auto-finish: repeatedly send "safe" cards to the foundations.
//!
//! A card is safe when no card that might still need it as a tableau
//! landing spot can still be in play. For a red card that means both black
//! foundations have reached at least one rank below it; symmetrically for
//! black cards.

use tracing::{debug, warn};

use crate::card::{Card, Color, Deck, Suit};
use crate::moves::{plan_to_foundation, Move, MoveKind};
use crate::tableau::{Tableau, NUM_COLS};

/// Sweep cap; a full finish needs at most 53 sweeps.
pub const DEFAULT_MAX_SWEEPS: usize = 600;

/// True if `card` may be sent to a foundation without risk of stranding
/// a lower card of the opposite color.
///
/// Does not check foundation legality; see `rules::can_move_to_foundation`.
pub fn is_safe_auto_move(tab: &Tableau, card: Card) -> bool {
    let (a, b) = match card.color() {
        Color::Red => (Suit::Spades, Suit::Clubs),
        Color::Black => (Suit::Hearts, Suit::Diamonds),
    };
    let lowest_opposite = tab.foundation_top_rank(a).min(tab.foundation_top_rank(b));
    card.rank_number() <= lowest_opposite + 1
}

/// First safe, legal foundation move in sweep order: the waste top, then
/// each column's face-up top from left to right.
pub fn next_safe_move(tab: &Tableau, deck: &Deck) -> Option<Move> {
    let candidates = tab
        .waste
        .top()
        .into_iter()
        .chain((0..NUM_COLS).filter_map(|col| tab.columns[col].top()));

    candidates
        .filter(|&card| is_safe_auto_move(tab, card))
        .find_map(|card| plan_to_foundation(tab, deck, card, card.suit()).ok())
}

/// Result of one auto-finish run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AutoFinish {
    /// Cards sent to the foundations, in order.
    pub moved: Vec<Card>,
    /// Column cards turned face-up as a side effect.
    pub flipped: Vec<Card>,
    /// True if the sweep cap stopped the loop.
    pub hit_cap: bool,
}

/// Make safe moves until a sweep finds none, or `max_sweeps` is reached.
///
/// Each sweep makes at most one move and the next sweep starts again from
/// the waste.
pub fn run(tab: &mut Tableau, deck: &mut Deck, max_sweeps: usize) -> AutoFinish {
    let mut out = AutoFinish::default();

    for sweep in 0..max_sweeps {
        let Some(mv) = next_safe_move(tab, deck) else {
            debug!(sweep, moved = out.moved.len(), "auto-finish settled");
            return out;
        };
        debug!(sweep, mv = %mv.describe(tab), "auto-finish");
        let applied = mv.apply(tab, deck);
        if let MoveKind::ToFoundation { card, .. } = mv.kind {
            out.moved.push(card);
        }
        out.flipped.extend(applied.flipped);
    }

    out.hit_cap = next_safe_move(tab, deck).is_some();
    if out.hit_cap {
        warn!(max_sweeps, moved = out.moved.len(), "auto-finish stopped at sweep cap");
    }
    out
}
