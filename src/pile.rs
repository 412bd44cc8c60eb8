//! A pile is an ordered sequence of card identifiers; the top is the last
//! element. Storage only: nothing here knows the rules of the game.

use serde::{Deserialize, Serialize};

use crate::card::{Card, Suit};

/// Names one of the thirteen piles on the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PileRef {
    Stock,
    Waste,
    Foundation(Suit),
    /// Tableau column, 0-based.
    Tableau(usize),
}

/// Where a card currently sits: a pile plus its position from the bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub pile: PileRef,
    pub index: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pile {
    cards: Vec<Card>,
}

impl Pile {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[inline]
    pub fn top(&self) -> Option<Card> {
        self.cards.last().copied()
    }

    #[inline]
    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Remove and return the run from `index` to the top, bottom-first.
    /// Returns an empty vector if `index` is past the top.
    pub fn take_from(&mut self, index: usize) -> Vec<Card> {
        if index >= self.cards.len() {
            return Vec::new();
        }
        self.cards.split_off(index)
    }

    /// Append cards in order; the last one becomes the new top.
    pub fn extend<I: IntoIterator<Item = Card>>(&mut self, cards: I) {
        self.cards.extend(cards);
    }

    pub fn position(&self, card: Card) -> Option<usize> {
        self.cards.iter().position(|&c| c == card)
    }

    /// Cards from `index` to the top.
    pub fn tail(&self, index: usize) -> &[Card] {
        self.cards.get(index..).unwrap_or(&[])
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    /// Bottom to top.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Card> + '_ {
        self.cards.iter().copied()
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }
}

impl FromIterator<Card> for Pile {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Pile {
            cards: iter.into_iter().collect(),
        }
    }
}
