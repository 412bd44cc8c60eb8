//! Drag gestures: pick up a selection, ask where it may land, drop it.
//!
//! Picking up and hovering never touch the game. A drop goes through the
//! ordinary move planner again, so a drop is committed as exactly one move
//! or rejected with nothing changed. Cancelling a drag is simply dropping
//! the `DragSession` value.

use serde::{Deserialize, Serialize};

use crate::card::{Card, Deck, Suit};
use crate::error::MoveError;
use crate::moves::{plan_run_to_tableau, plan_to_foundation, Move};
use crate::pile::{Location, PileRef};
use crate::rules::is_valid_run;
use crate::tableau::Tableau;

/// Where a selection can be dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DropTarget {
    Foundation(Suit),
    Tableau(usize),
}

/// Cards picked up by a drag, in pile order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DragSession {
    from: Location,
    cards: Vec<Card>,
}

impl DragSession {
    pub fn source(&self) -> Location {
        self.from
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn lead(&self) -> Card {
        self.cards[0]
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Start dragging `card`.
///
/// The waste top and a foundation top are picked up alone. In a column
/// the card and everything above it are picked up, provided they form a
/// valid run. Stock cards cannot be dragged.
pub fn begin(tab: &Tableau, deck: &Deck, card: Card) -> Result<DragSession, MoveError> {
    let from = tab.locate(card).ok_or(MoveError::UnknownCard(card))?;
    let pile = tab.pile(from.pile).ok_or(MoveError::BadSource(from.pile))?;

    let cards = match from.pile {
        PileRef::Stock => return Err(MoveError::BadSource(PileRef::Stock)),
        PileRef::Waste | PileRef::Foundation(_) => {
            if pile.top() != Some(card) {
                return Err(MoveError::NotOnTop(card));
            }
            vec![card]
        }
        PileRef::Tableau(_) => {
            if !deck.is_face_up(card) {
                return Err(MoveError::FaceDown(card));
            }
            let tail = pile.tail(from.index);
            if !is_valid_run(deck, tail) {
                return Err(MoveError::InvalidRun);
            }
            tail.to_vec()
        }
    };

    Ok(DragSession { from, cards })
}

/// The move a drop would make, checked against the current state.
pub fn plan_drop(
    tab: &Tableau,
    deck: &Deck,
    session: &DragSession,
    target: DropTarget,
) -> Result<Move, MoveError> {
    match target {
        DropTarget::Foundation(suit) => match session.cards() {
            [card] => plan_to_foundation(tab, deck, *card, suit),
            [] => Err(MoveError::EmptySelection),
            _ => Err(MoveError::MultiCardToFoundation),
        },
        DropTarget::Tableau(col) => plan_run_to_tableau(tab, deck, session.cards(), col),
    }
}

/// Drop hint: would dropping here succeed?
pub fn can_drop(tab: &Tableau, deck: &Deck, session: &DragSession, target: DropTarget) -> bool {
    plan_drop(tab, deck, session, target).is_ok()
}
