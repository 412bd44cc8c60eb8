//! Klondike solitaire engine (single-card draw).
//!
//! The engine owns all game state behind `game::Game`. A presentation
//! layer issues operations (draw, flip, move, click, auto-finish, undo,
//! drag and drop) and reads back piles, orientation and session data.
//! Every operation is atomic: it either commits one transition or returns
//! a `MoveError` and changes nothing.

pub mod autofinish;
pub mod card;
pub mod cli;
pub mod clock;
pub mod config;
pub mod deal;
pub mod display;
pub mod drag;
pub mod error;
pub mod game;
pub mod history;
pub mod moves;
pub mod pile;
pub mod rules;
pub mod tableau;
pub mod view;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod test_support;
#[cfg(test)]
mod tests_props;

pub use card::{Card, Color, Deck, Rank, Suit};
pub use config::GameConfig;
pub use deal::DealSource;
pub use drag::{DragSession, DropTarget};
pub use error::{CardParseError, ConfigError, DealError, InvariantError, MoveError};
pub use game::Game;
pub use moves::MoveReport;
pub use pile::{Location, PileRef};
pub use view::GameView;
