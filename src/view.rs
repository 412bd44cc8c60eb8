//! Read-only, serializable snapshot of a game for a presentation layer.

use serde::Serialize;

use crate::card::{Card, Suit};
use crate::game::Game;
use crate::pile::{Pile, PileRef};
use crate::tableau::NUM_COLS;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub card: Card,
    pub face_up: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FoundationView {
    pub suit: Suit,
    pub cards: Vec<CardView>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GameView {
    pub deal: String,
    /// Stock contents are never shown; only the count.
    pub stock_count: usize,
    pub waste: Vec<CardView>,
    pub foundations: Vec<FoundationView>,
    pub columns: Vec<Vec<CardView>>,
    pub move_count: u32,
    pub elapsed_secs: u64,
    pub won: bool,
    pub can_undo: bool,
}

fn cards_of(game: &Game, pile: &Pile) -> Vec<CardView> {
    pile.iter()
        .map(|card| CardView {
            card,
            face_up: game.is_face_up(card),
        })
        .collect()
}

impl From<&Game> for GameView {
    fn from(game: &Game) -> Self {
        let tab = game.tableau();
        GameView {
            deal: game.deal_label().to_string(),
            stock_count: game.pile(PileRef::Stock).len(),
            waste: cards_of(game, &tab.waste),
            foundations: Suit::ALL
                .into_iter()
                .map(|suit| FoundationView {
                    suit,
                    cards: cards_of(game, tab.foundation(suit)),
                })
                .collect(),
            columns: (0..NUM_COLS)
                .map(|col| cards_of(game, &tab.columns[col]))
                .collect(),
            move_count: game.move_count(),
            elapsed_secs: game.elapsed().as_secs(),
            won: game.is_won(),
            can_undo: game.can_undo(),
        }
    }
}
