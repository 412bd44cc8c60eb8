//! The pile store: every pile on the table.
//!
//! `Tableau` names the whole layout (stock, waste, foundations and the
//! seven columns). It moves identifiers around mechanically and answers
//! location queries; legality lives in `rules`, orientation in `card::Deck`.

use serde::{Deserialize, Serialize};

use crate::card::{Card, Deck, Suit, CARDS_PER_DECK, NUM_RANKS, NUM_SUITS};
use crate::error::InvariantError;
use crate::pile::{Location, Pile, PileRef};

/// Number of tableau columns.
pub const NUM_COLS: usize = 7;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tableau {
    pub stock: Pile,
    pub waste: Pile,
    /// Indexed by `Suit::index()`.
    pub foundations: [Pile; NUM_SUITS as usize],
    pub columns: [Pile; NUM_COLS],
}

impl Tableau {
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Deal a new game.
    ///
    /// `stock_order` is the shuffled deck with its top at the end. Column
    /// `c` receives `c + 1` cards popped from that top, and only its last
    /// card is turned face-up. The 24 remaining cards stay in the stock,
    /// face-down. Orientation is written to `deck`.
    pub fn deal_from_shuffled(stock_order: [Card; CARDS_PER_DECK as usize], deck: &mut Deck) -> Self {
        let mut tab = Tableau::new_empty();
        tab.stock.extend(stock_order);
        for card in stock_order {
            deck.set_face_up(card, false);
        }

        for col_idx in 0..NUM_COLS {
            for _ in 0..=col_idx {
                if let Some(card) = tab.stock.pop() {
                    tab.columns[col_idx].push(card);
                }
            }
            if let Some(top) = tab.columns[col_idx].top() {
                deck.set_face_up(top, true);
            }
        }

        tab
    }

    pub fn pile(&self, pile: PileRef) -> Option<&Pile> {
        match pile {
            PileRef::Stock => Some(&self.stock),
            PileRef::Waste => Some(&self.waste),
            PileRef::Foundation(suit) => Some(&self.foundations[suit.index()]),
            PileRef::Tableau(col) => self.columns.get(col),
        }
    }

    pub fn pile_mut(&mut self, pile: PileRef) -> Option<&mut Pile> {
        match pile {
            PileRef::Stock => Some(&mut self.stock),
            PileRef::Waste => Some(&mut self.waste),
            PileRef::Foundation(suit) => Some(&mut self.foundations[suit.index()]),
            PileRef::Tableau(col) => self.columns.get_mut(col),
        }
    }

    #[inline]
    pub fn foundation(&self, suit: Suit) -> &Pile {
        &self.foundations[suit.index()]
    }

    /// Rank number of the foundation's top card, 0 when empty.
    pub fn foundation_top_rank(&self, suit: Suit) -> u8 {
        self.foundation(suit).top().map_or(0, Card::rank_number)
    }

    /// Every pile paired with its name, in a fixed order.
    pub fn piles(&self) -> impl Iterator<Item = (PileRef, &Pile)> {
        let fixed = [
            (PileRef::Stock, &self.stock),
            (PileRef::Waste, &self.waste),
        ];
        let foundations = Suit::ALL
            .into_iter()
            .map(move |s| (PileRef::Foundation(s), &self.foundations[s.index()]));
        let columns = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, p)| (PileRef::Tableau(i), p));
        fixed.into_iter().chain(foundations).chain(columns)
    }

    pub fn locate(&self, card: Card) -> Option<Location> {
        self.piles().find_map(|(pile, p)| {
            p.position(card).map(|index| Location { pile, index })
        })
    }

    /// Total number of cards on the foundations.
    pub fn foundation_count(&self) -> usize {
        self.foundations.iter().map(Pile::len).sum()
    }

    /// All four foundations are complete.
    pub fn is_win(&self) -> bool {
        self.foundations
            .iter()
            .all(|f| f.len() == NUM_RANKS as usize)
    }

    /// All cards on the table, pile by pile, bottom to top.
    pub fn flatten_cards(&self) -> Vec<Card> {
        self.piles().flat_map(|(_, p)| p.iter()).collect()
    }

    /// Check the structural invariants against the registry:
    /// every card in exactly one pile, 52 in total, foundations are
    /// Ace-up runs of their suit, stock face-down, waste and foundations
    /// face-up.
    pub fn verify(&self, deck: &Deck) -> Result<(), InvariantError> {
        let mut owner: [Option<PileRef>; CARDS_PER_DECK as usize] = [None; CARDS_PER_DECK as usize];
        let mut total = 0usize;

        for (pile_ref, pile) in self.piles() {
            for card in pile.iter() {
                total += 1;
                let slot = &mut owner[card.index() as usize];
                if let Some(first) = *slot {
                    return Err(InvariantError::Duplicate {
                        card,
                        first,
                        second: pile_ref,
                    });
                }
                *slot = Some(pile_ref);

                let face_up = deck.is_face_up(card);
                match pile_ref {
                    PileRef::Stock if face_up => return Err(InvariantError::FaceUpInStock(card)),
                    PileRef::Waste | PileRef::Foundation(_) if !face_up => {
                        return Err(InvariantError::FaceDownOutsideTableau(pile_ref));
                    }
                    _ => {}
                }
            }
        }

        if total != CARDS_PER_DECK as usize {
            return Err(InvariantError::CardCount(total));
        }

        for suit in Suit::ALL {
            let ok = self
                .foundation(suit)
                .iter()
                .enumerate()
                .all(|(i, c)| c.suit() == suit && c.rank_number() as usize == i + 1);
            if !ok {
                return Err(InvariantError::Foundation(suit));
            }
        }

        Ok(())
    }
}
