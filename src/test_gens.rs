// Proptest generators for engine types and random play.
// Actions pick their cards from what is currently playable, so most
// generated actions are meaningful instead of trivially rejected.

use proptest::prelude::*;

use crate::card::{Card, Rank, Suit, CARDS_PER_DECK};
use crate::drag::DropTarget;
use crate::error::MoveError;
use crate::game::Game;
use crate::moves::MoveReport;
use crate::pile::PileRef;
use crate::tableau::NUM_COLS;

pub fn suit() -> impl Strategy<Value = Suit> {
    prop_oneof![
        Just(Suit::Spades),
        Just(Suit::Hearts),
        Just(Suit::Diamonds),
        Just(Suit::Clubs),
    ]
}

pub fn rank() -> impl Strategy<Value = Rank> {
    (1u8..=13).prop_map(|n| Rank::from_number(n).unwrap())
}

pub fn card() -> impl Strategy<Value = Card> {
    (0u8..CARDS_PER_DECK).prop_map(|i| Card::from_index(i).unwrap())
}

/// A player action. Indices are resolved against the current position
/// when the action is applied.
#[derive(Clone, Debug)]
pub enum Action {
    Draw,
    Flip(usize),
    /// Send a playable card to its foundation.
    Found(usize),
    /// Send a playable card to the given foundation pile.
    FoundPile(usize, Suit),
    /// Move a playable card, with whatever lies on it, to a column.
    Run(usize, usize),
    Click(usize),
    Drag(usize, usize),
    AutoFinish,
    Undo,
}

pub fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => Just(Action::Draw),
        1 => (0..NUM_COLS + 1).prop_map(Action::Flip),
        2 => any::<usize>().prop_map(Action::Found),
        1 => (any::<usize>(), suit()).prop_map(|(i, s)| Action::FoundPile(i, s)),
        3 => (any::<usize>(), 0..NUM_COLS).prop_map(|(i, c)| Action::Run(i, c)),
        3 => any::<usize>().prop_map(Action::Click),
        1 => (any::<usize>(), 0..NUM_COLS).prop_map(|(i, c)| Action::Drag(i, c)),
        1 => Just(Action::AutoFinish),
        1 => Just(Action::Undo),
    ]
}

pub fn actions(max: usize) -> impl Strategy<Value = Vec<Action>> {
    prop::collection::vec(action(), 0..max)
}

/// Face-up cards a player could grab: waste top, foundation tops and
/// every face-up column card.
pub fn playable_cards(game: &Game) -> Vec<Card> {
    let mut out: Vec<Card> = game.pile(PileRef::Waste).last().copied().into_iter().collect();
    for suit in Suit::ALL {
        out.extend(game.pile(PileRef::Foundation(suit)).last().copied());
    }
    for col in 0..NUM_COLS {
        out.extend(game.column(col).iter().copied().filter(|&c| game.is_face_up(c)));
    }
    out
}

fn pick(game: &Game, i: usize) -> Option<Card> {
    let cards = playable_cards(game);
    (!cards.is_empty()).then(|| cards[i % cards.len()])
}

/// Run the run/tail selection that starts at `card`.
fn selection_from(game: &Game, card: Card) -> Vec<Card> {
    match game.locate(card) {
        Some(loc) => match loc.pile {
            PileRef::Tableau(col) => game.column(col)[loc.index..].to_vec(),
            _ => vec![card],
        },
        None => vec![card],
    }
}

pub fn apply(game: &mut Game, action: &Action) -> Result<MoveReport, MoveError> {
    match *action {
        Action::Draw => game.draw(),
        Action::Flip(col) => game.flip_tableau_top(col),
        Action::Found(i) => match pick(game, i) {
            Some(card) => game.move_to_foundation(card),
            None => Err(MoveError::EmptySelection),
        },
        Action::FoundPile(i, suit) => match pick(game, i) {
            Some(card) => game.move_to_foundation_pile(card, suit),
            None => Err(MoveError::EmptySelection),
        },
        Action::Run(i, col) => {
            let cards = pick(game, i).map(|c| selection_from(game, c)).unwrap_or_default();
            game.move_run_to_tableau(&cards, col)
        }
        Action::Click(i) => match pick(game, i) {
            Some(card) => game.auto_move(card),
            None => Err(MoveError::EmptySelection),
        },
        Action::Drag(i, col) => {
            let card = pick(game, i).ok_or(MoveError::EmptySelection)?;
            let session = game.begin_drag(card)?;
            game.drop_drag(session, DropTarget::Tableau(col))
        }
        Action::AutoFinish => game.auto_finish(),
        Action::Undo => game.undo(),
    }
}
