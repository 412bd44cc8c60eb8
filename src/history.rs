//! Undo history: full-state snapshots in a bounded stack.

use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::card::Deck;
use crate::tableau::Tableau;

/// Default number of undo steps kept.
pub const DEFAULT_UNDO_DEPTH: usize = 200;

/// Everything needed to put a game back exactly as it was.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub tableau: Tableau,
    /// Bit `i` set iff card `i` is face-up.
    pub face_up: u64,
    pub move_count: u32,
    pub elapsed: Duration,
}

impl GameSnapshot {
    pub fn capture(tab: &Tableau, deck: &Deck, move_count: u32, elapsed: Duration) -> Self {
        GameSnapshot {
            tableau: tab.clone(),
            face_up: deck.face_up_mask(),
            move_count,
            elapsed,
        }
    }
}

/// Most recent snapshot last. When full, the oldest is dropped.
#[derive(Clone, Debug)]
pub struct History {
    entries: VecDeque<GameSnapshot>,
    capacity: usize,
}

impl History {
    pub fn with_capacity(capacity: usize) -> Self {
        History {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_UNDO_DEPTH)),
            capacity,
        }
    }

    pub fn push(&mut self, snapshot: GameSnapshot) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(snapshot);
    }

    pub fn pop(&mut self) -> Option<GameSnapshot> {
        self.entries.pop_back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        History::with_capacity(DEFAULT_UNDO_DEPTH)
    }
}
