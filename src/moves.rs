//! Move representation, validation and application.
//!
//! Every transition goes through two steps. A `plan_*` function checks the
//! request against the rules and the current piles and either returns a
//! concrete `Move` or a `MoveError`; nothing is touched. `Move::apply` then
//! performs the move. Since apply only ever runs on a planned move, a
//! transition is either fully applied or not at all.

use serde::Serialize;

use crate::card::{Card, Deck, Suit};
use crate::error::MoveError;
use crate::pile::{Location, PileRef};
use crate::rules::{can_move_to_foundation, can_move_to_tableau, is_valid_run};
use crate::tableau::{Tableau, NUM_COLS};

/// The different kinds of state transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveKind {
    /// Turn the stock's top card face-up onto the waste.
    Draw,

    /// Stock is empty: turn the whole waste back over into the stock.
    ///
    /// Popping from waste and pushing to stock restores the original
    /// stock order.
    Recycle,

    /// Turn the face-down top card of a column face-up.
    Flip { col: usize },

    /// Move the top card of `from` onto the `suit` foundation.
    ToFoundation { card: Card, from: PileRef, suit: Suit },

    /// Move `count` cards starting at `from` onto column `dst_col`.
    ///
    /// For waste and foundation sources `count` is always 1.
    ToTableau {
        from: Location,
        count: usize,
        dst_col: usize,
    },
}

/// A single validated move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    pub kind: MoveKind,
}

/// What `Move::apply` did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Applied {
    /// Number of cards that changed pile.
    pub cards_moved: usize,
    /// Card turned face-up because it was exposed (or flipped explicitly).
    pub flipped: Option<Card>,
}

/// Outcome of a committed game operation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MoveReport {
    pub description: String,
    pub cards_moved: usize,
    /// Cards turned face-up by the operation, explicit flips included.
    pub flipped: Vec<Card>,
    /// True only for the operation that first completes the game.
    pub won: bool,
}

impl From<MoveKind> for Move {
    fn from(kind: MoveKind) -> Self {
        Move { kind }
    }
}

fn check_col(col: usize) -> Result<(), MoveError> {
    if col < NUM_COLS {
        Ok(())
    } else {
        Err(MoveError::ColumnOutOfRange(col))
    }
}

/// Draw one card, or recycle the waste when the stock is empty.
pub fn plan_draw(tab: &Tableau) -> Result<Move, MoveError> {
    if !tab.stock.is_empty() {
        Ok(MoveKind::Draw.into())
    } else if !tab.waste.is_empty() {
        Ok(MoveKind::Recycle.into())
    } else {
        Err(MoveError::NothingToDraw)
    }
}

pub fn plan_flip(tab: &Tableau, deck: &Deck, col: usize) -> Result<Move, MoveError> {
    check_col(col)?;
    match tab.columns[col].top() {
        Some(top) if !deck.is_face_up(top) => Ok(MoveKind::Flip { col }.into()),
        _ => Err(MoveError::NothingToFlip(col)),
    }
}

/// Locate `card` and require it to be the face-up top of a pile other
/// than the stock.
fn top_card_source(tab: &Tableau, deck: &Deck, card: Card) -> Result<Location, MoveError> {
    let loc = tab.locate(card).ok_or(MoveError::UnknownCard(card))?;
    if loc.pile == PileRef::Stock {
        return Err(MoveError::BadSource(PileRef::Stock));
    }
    let is_top = tab.pile(loc.pile).and_then(|p| p.top()) == Some(card);
    if !is_top {
        return Err(MoveError::NotOnTop(card));
    }
    if !deck.is_face_up(card) {
        return Err(MoveError::FaceDown(card));
    }
    Ok(loc)
}

/// Move `card` to the `suit` foundation.
pub fn plan_to_foundation(
    tab: &Tableau,
    deck: &Deck,
    card: Card,
    suit: Suit,
) -> Result<Move, MoveError> {
    let loc = top_card_source(tab, deck, card)?;
    if !can_move_to_foundation(tab, card, suit) {
        return Err(MoveError::IllegalFoundation { card, suit });
    }
    Ok(MoveKind::ToFoundation {
        card,
        from: loc.pile,
        suit,
    }
    .into())
}

/// Move `cards` (pile order, lead first) to column `dst_col`.
///
/// From a column the cards must be exactly the tail of that column and
/// form a valid run. From the waste or a foundation only the top card may
/// move. The stock is never a source.
pub fn plan_run_to_tableau(
    tab: &Tableau,
    deck: &Deck,
    cards: &[Card],
    dst_col: usize,
) -> Result<Move, MoveError> {
    let &lead = cards.first().ok_or(MoveError::EmptySelection)?;
    check_col(dst_col)?;

    let from = match tab.locate(lead) {
        Some(loc @ Location { pile: PileRef::Tableau(src), index }) => {
            if src == dst_col {
                return Err(MoveError::SameColumn);
            }
            if tab.columns[src].tail(index) != cards {
                return Err(MoveError::NotASuffix);
            }
            if !deck.is_face_up(lead) {
                return Err(MoveError::FaceDown(lead));
            }
            if !is_valid_run(deck, cards) {
                return Err(MoveError::InvalidRun);
            }
            loc
        }
        None => return Err(MoveError::UnknownCard(lead)),
        Some(_) => {
            if cards.len() != 1 {
                return Err(MoveError::NotASuffix);
            }
            top_card_source(tab, deck, lead)?
        }
    };

    if !can_move_to_tableau(tab, deck, lead, dst_col) {
        return Err(MoveError::IllegalTableau {
            card: lead,
            col: dst_col,
        });
    }

    Ok(MoveKind::ToTableau {
        from,
        count: cards.len(),
        dst_col,
    }
    .into())
}

/// The move a single click on `card` asks for.
///
/// A face-down column top is flipped. A face-up top card goes to its
/// foundation when legal (never from a foundation), otherwise to the first
/// column, scanning 0..7, that accepts it.
pub fn plan_auto_move(tab: &Tableau, deck: &Deck, card: Card) -> Result<Move, MoveError> {
    if let Some(Location {
        pile: PileRef::Tableau(col),
        ..
    }) = tab.locate(card)
    {
        if tab.columns[col].top() == Some(card) && !deck.is_face_up(card) {
            return plan_flip(tab, deck, col);
        }
    }

    let loc = top_card_source(tab, deck, card)?;

    if !matches!(loc.pile, PileRef::Foundation(_)) {
        if let Ok(mv) = plan_to_foundation(tab, deck, card, card.suit()) {
            return Ok(mv);
        }
    }

    (0..NUM_COLS)
        .filter(|&col| loc.pile != PileRef::Tableau(col))
        .find(|&col| can_move_to_tableau(tab, deck, card, col))
        .map(|dst_col| {
            MoveKind::ToTableau {
                from: loc,
                count: 1,
                dst_col,
            }
            .into()
        })
        .ok_or(MoveError::NoDestination(card))
}

impl Move {
    /// Apply this move to the piles and registry.
    ///
    /// The move must come from one of the `plan_*` functions against the
    /// same state; legality is not re-checked here.
    pub fn apply(&self, tab: &mut Tableau, deck: &mut Deck) -> Applied {
        match self.kind {
            MoveKind::Draw => match tab.stock.pop() {
                Some(card) => {
                    deck.set_face_up(card, true);
                    tab.waste.push(card);
                    Applied {
                        cards_moved: 1,
                        flipped: None,
                    }
                }
                None => Applied::default(),
            },

            MoveKind::Recycle => {
                let mut n = 0;
                while let Some(card) = tab.waste.pop() {
                    deck.set_face_up(card, false);
                    tab.stock.push(card);
                    n += 1;
                }
                Applied {
                    cards_moved: n,
                    flipped: None,
                }
            }

            MoveKind::Flip { col } => {
                let flipped = tab.columns[col].top();
                if let Some(card) = flipped {
                    deck.set_face_up(card, true);
                }
                Applied {
                    cards_moved: 0,
                    flipped,
                }
            }

            MoveKind::ToFoundation { card, from, suit } => {
                let popped = tab.pile_mut(from).and_then(|p| p.pop());
                debug_assert_eq!(popped, Some(card));
                tab.foundations[suit.index()].push(card);
                let flipped = match from {
                    PileRef::Tableau(col) => flip_exposed_card_after_removal(tab, deck, col),
                    _ => None,
                };
                Applied {
                    cards_moved: 1,
                    flipped,
                }
            }

            MoveKind::ToTableau {
                from,
                count,
                dst_col,
            } => {
                let run = match tab.pile_mut(from.pile) {
                    Some(src) => src.take_from(from.index),
                    None => Vec::new(),
                };
                debug_assert_eq!(run.len(), count);
                let moved = run.len();
                tab.columns[dst_col].extend(run);
                let flipped = match from.pile {
                    PileRef::Tableau(col) => flip_exposed_card_after_removal(tab, deck, col),
                    _ => None,
                };
                Applied {
                    cards_moved: moved,
                    flipped,
                }
            }
        }
    }

    /// Render a move as a human-readable string, using the tableau as it
    /// was before the move.
    pub fn describe(&self, tab: &Tableau) -> String {
        match self.kind {
            MoveKind::Draw => match tab.stock.top() {
                Some(card) => format!("Draw {card} from Stock"),
                None => "Draw (empty Stock)".to_string(),
            },
            MoveKind::Recycle => format!("Recycle {} cards from Waste", tab.waste.len()),
            MoveKind::Flip { col } => format!("Flip Column {}", col + 1),
            MoveKind::ToFoundation { card, from, suit } => {
                format!("{}: {card} -> Foundation({suit:?})", pile_name(from))
            }
            MoveKind::ToTableau {
                from,
                count,
                dst_col,
            } => {
                let cards = tab
                    .pile(from.pile)
                    .map(|p| p.tail(from.index))
                    .unwrap_or(&[]);
                match (cards.first(), cards.last()) {
                    (Some(first), Some(last)) if count > 1 => format!(
                        "{}: {first}..{last} -> Column {}",
                        pile_name(from.pile),
                        dst_col + 1
                    ),
                    (Some(first), _) => format!(
                        "{}: {first} -> Column {}",
                        pile_name(from.pile),
                        dst_col + 1
                    ),
                    _ => format!("{} -> Column {}", pile_name(from.pile), dst_col + 1),
                }
            }
        }
    }
}

fn pile_name(pile: PileRef) -> String {
    match pile {
        PileRef::Stock => "Stock".to_string(),
        PileRef::Waste => "Waste".to_string(),
        PileRef::Foundation(suit) => format!("Foundation({suit:?})"),
        PileRef::Tableau(col) => format!("Column {}", col + 1),
    }
}

/// After cards leave a column, turn its new top face-up if it is
/// face-down. Returns the card that was turned.
fn flip_exposed_card_after_removal(tab: &mut Tableau, deck: &mut Deck, col: usize) -> Option<Card> {
    let top = tab.columns[col].top()?;
    if deck.is_face_up(top) {
        return None;
    }
    deck.set_face_up(top, true);
    Some(top)
}
