//! Error types for the engine.
//!
//! Rule violations are ordinary values: every rejected operation returns a
//! `MoveError` and leaves the game untouched. `InvariantError` is different
//! in kind; it means the engine itself has a bug.

use thiserror::Error;

use crate::card::{Card, Suit};
use crate::pile::PileRef;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardParseError {
    #[error("empty card id")]
    Empty,
    #[error("unknown suit in card id {0:?}")]
    Suit(String),
    #[error("unknown rank in card id {0:?}")]
    Rank(String),
}

/// Why a requested move was not performed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("no such card on the table: {0}")]
    UnknownCard(Card),
    #[error("column {0} is out of range (0..7)")]
    ColumnOutOfRange(usize),
    #[error("no cards selected")]
    EmptySelection,
    #[error("stock and waste are both empty")]
    NothingToDraw,
    #[error("top of column {0} is empty or already face-up")]
    NothingToFlip(usize),
    #[error("{0} is not on top of its pile")]
    NotOnTop(Card),
    #[error("selection is not the tail of its column")]
    NotASuffix,
    #[error("{0} is face-down")]
    FaceDown(Card),
    #[error("selection is not a descending, alternating-color run")]
    InvalidRun,
    #[error("cards cannot be taken from {0:?}")]
    BadSource(PileRef),
    #[error("only a single card can go to a foundation")]
    MultiCardToFoundation,
    #[error("{card} cannot go on the {suit:?} foundation")]
    IllegalFoundation { card: Card, suit: Suit },
    #[error("{card} cannot go on column {col}")]
    IllegalTableau { card: Card, col: usize },
    #[error("no column accepts {0}")]
    NoDestination(Card),
    #[error("source and destination are the same column")]
    SameColumn,
    #[error("no safe foundation moves available")]
    NoSafeMoves,
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("game is already won")]
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DealError {
    #[error("empty seed")]
    EmptySeed,
    #[error("invalid seed {0:?}")]
    InvalidSeed(String),
    #[error("ms seed {0} out of range")]
    MsSeedOutOfRange(u64),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

/// A broken structural invariant. Indicates an engine bug.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantError {
    #[error("{card} is in {first:?} and {second:?}")]
    Duplicate {
        card: Card,
        first: PileRef,
        second: PileRef,
    },
    #[error("piles hold {0} cards instead of 52")]
    CardCount(usize),
    #[error("{0:?} foundation is not an ascending run from Ace")]
    Foundation(Suit),
    #[error("{0:?} holds a face-down card")]
    FaceDownOutsideTableau(PileRef),
    #[error("stock card {0} is face-up")]
    FaceUpInStock(Card),
}
