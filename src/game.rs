//! Game session: the single owner of all mutable state.
//!
//! `Game` holds the card registry, the pile store, the undo history, the
//! clock, the move counter and the win latch. Every operation either
//! commits one atomic transition (returning a `MoveReport`) or returns a
//! `MoveError` and leaves every one of those untouched.
//!
//! Order of a commit:
//!   1. plan the move against the current state (may fail, nothing changed)
//!   2. push a snapshot of the pre-move state
//!   3. apply the move, count it, start the clock
//!   4. latch a win if this commit completed the foundations

use std::time::Duration;

use tracing::{debug, info, trace};

use crate::autofinish;
use crate::card::{Card, Deck, Suit};
use crate::config::GameConfig;
use crate::deal::DealSource;
use crate::drag::{self, DragSession, DropTarget};
use crate::error::{DealError, InvariantError, MoveError};
use crate::history::{GameSnapshot, History};
use crate::clock::GameClock;
use crate::moves::{
    plan_auto_move, plan_draw, plan_flip, plan_run_to_tableau, plan_to_foundation, Move,
    MoveReport,
};
use crate::pile::{Location, PileRef};
use crate::tableau::{Tableau, NUM_COLS};
use crate::view::GameView;

/// 64-bit FNV-1a parameters.
const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01B3;

#[inline]
fn fnv1a_mix_byte(h: u64, byte: u8) -> u64 {
    (h ^ byte as u64).wrapping_mul(FNV_PRIME)
}

/// Hash of the whole position: every pile in order, and each card's
/// orientation (bit 7 set for face-up). Pile tags separate the piles so
/// that moving a card between adjacent piles changes the hash.
pub fn hash_position(tab: &Tableau, deck: &Deck) -> u64 {
    let mut h = FNV_OFFSET_BASIS;
    for (tag, (_, pile)) in tab.piles().enumerate() {
        h = fnv1a_mix_byte(h, 0xC0 | tag as u8);
        for card in pile.iter() {
            let face = if deck.is_face_up(card) { 0x80 } else { 0 };
            h = fnv1a_mix_byte(h, card.index() | face);
        }
    }
    h
}

#[derive(Debug)]
pub struct Game {
    deck: Deck,
    tableau: Tableau,
    history: History,
    clock: GameClock,
    move_count: u32,
    /// Set by the commit that first completes the game; never cleared
    /// until a new game.
    win_reported: bool,
    deal_label: String,
    config: GameConfig,
}

impl Game {
    /// Deal a new game from `source`.
    pub fn new(source: &DealSource, config: GameConfig) -> Result<Self, DealError> {
        let mut game = Game {
            deck: Deck::default(),
            tableau: Tableau::new_empty(),
            history: History::with_capacity(config.undo_depth),
            clock: GameClock::new(),
            move_count: 0,
            win_reported: false,
            deal_label: String::new(),
            config,
        };
        game.new_game(source)?;
        Ok(game)
    }

    /// Start from an arbitrary position, e.g. a restored save.
    pub fn from_layout(
        tableau: Tableau,
        deck: Deck,
        config: GameConfig,
    ) -> Result<Self, InvariantError> {
        tableau.verify(&deck)?;
        let win_reported = tableau.is_win();
        Ok(Game {
            deck,
            tableau,
            history: History::with_capacity(config.undo_depth),
            clock: GameClock::new(),
            move_count: 0,
            win_reported,
            deal_label: "layout".to_string(),
            config,
        })
    }

    /// Replace the current game with a fresh deal. Clears history, the
    /// move counter, the clock and the win latch.
    pub fn new_game(&mut self, source: &DealSource) -> Result<(), DealError> {
        let deal = source.deal()?;
        let mut deck = Deck::default();
        self.tableau = Tableau::deal_from_shuffled(deal.order, &mut deck);
        self.deck = deck;
        self.history.clear();
        self.clock.reset();
        self.move_count = 0;
        self.win_reported = false;
        info!(deal = %deal.label, hash = self.state_hash(), "new game");
        self.deal_label = deal.label;
        debug_assert!(self.tableau.verify(&self.deck).is_ok());
        Ok(())
    }

    // --- operations ---

    /// Draw from the stock, or recycle the waste when the stock is empty.
    pub fn draw(&mut self) -> Result<MoveReport, MoveError> {
        self.ensure_playing("draw")?;
        let mv = plan_draw(&self.tableau).map_err(|e| self.rejected("draw", e))?;
        Ok(self.commit(mv))
    }

    pub fn flip_tableau_top(&mut self, col: usize) -> Result<MoveReport, MoveError> {
        self.ensure_playing("flip")?;
        let mv = plan_flip(&self.tableau, &self.deck, col).map_err(|e| self.rejected("flip", e))?;
        Ok(self.commit(mv))
    }

    /// Move `card` to its own suit's foundation.
    pub fn move_to_foundation(&mut self, card: Card) -> Result<MoveReport, MoveError> {
        self.move_to_foundation_pile(card, card.suit())
    }

    /// Move `card` to the `suit` foundation, as when dropped on it.
    pub fn move_to_foundation_pile(
        &mut self,
        card: Card,
        suit: Suit,
    ) -> Result<MoveReport, MoveError> {
        self.ensure_playing("to_foundation")?;
        let mv = plan_to_foundation(&self.tableau, &self.deck, card, suit)
            .map_err(|e| self.rejected("to_foundation", e))?;
        Ok(self.commit(mv))
    }

    /// Move `cards` (lead first) onto column `col`.
    pub fn move_run_to_tableau(
        &mut self,
        cards: &[Card],
        col: usize,
    ) -> Result<MoveReport, MoveError> {
        self.ensure_playing("to_tableau")?;
        let mv = plan_run_to_tableau(&self.tableau, &self.deck, cards, col)
            .map_err(|e| self.rejected("to_tableau", e))?;
        Ok(self.commit(mv))
    }

    /// Single-click behavior: flip, else foundation, else first column.
    pub fn auto_move(&mut self, card: Card) -> Result<MoveReport, MoveError> {
        self.ensure_playing("auto_move")?;
        let mv = plan_auto_move(&self.tableau, &self.deck, card)
            .map_err(|e| self.rejected("auto_move", e))?;
        Ok(self.commit(mv))
    }

    /// Send safe cards to the foundations until none is left.
    ///
    /// The whole run is one undo step. Each card moved counts as one move.
    pub fn auto_finish(&mut self) -> Result<MoveReport, MoveError> {
        self.ensure_playing("auto_finish")?;
        let snapshot = self.snapshot();
        let out = autofinish::run(
            &mut self.tableau,
            &mut self.deck,
            self.config.auto_finish_max_sweeps,
        );
        if out.moved.is_empty() {
            return Err(self.rejected("auto_finish", MoveError::NoSafeMoves));
        }

        self.history.push(snapshot);
        self.move_count += out.moved.len() as u32;
        let description = format!("Auto-finish: {} cards", out.moved.len());
        Ok(self.finish_commit(description, out.moved.len(), out.flipped))
    }

    /// Restore the state before the last committed operation.
    pub fn undo(&mut self) -> Result<MoveReport, MoveError> {
        let snap = self
            .history
            .pop()
            .ok_or_else(|| self.rejected("undo", MoveError::NothingToUndo))?;
        let undone = self.move_count - snap.move_count;
        self.restore(snap);
        info!(
            undone,
            move_count = self.move_count,
            remaining = self.history.len(),
            "undo"
        );
        Ok(MoveReport {
            description: "Undo".to_string(),
            cards_moved: 0,
            flipped: Vec::new(),
            won: false,
        })
    }

    // --- drag and drop ---

    pub fn begin_drag(&self, card: Card) -> Result<DragSession, MoveError> {
        drag::begin(&self.tableau, &self.deck, card)
    }

    pub fn can_drop(&self, session: &DragSession, target: DropTarget) -> bool {
        !self.tableau.is_win() && drag::can_drop(&self.tableau, &self.deck, session, target)
    }

    pub fn drop_drag(
        &mut self,
        session: DragSession,
        target: DropTarget,
    ) -> Result<MoveReport, MoveError> {
        self.ensure_playing("drop")?;
        let mv = drag::plan_drop(&self.tableau, &self.deck, &session, target)
            .map_err(|e| self.rejected("drop", e))?;
        Ok(self.commit(mv))
    }

    // --- queries ---

    pub fn tableau(&self) -> &Tableau {
        &self.tableau
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Cards of one pile, bottom first. Empty for an unknown column.
    pub fn pile(&self, pile: PileRef) -> &[Card] {
        self.tableau.pile(pile).map_or(&[], |p| p.as_slice())
    }

    pub fn column(&self, col: usize) -> &[Card] {
        self.pile(PileRef::Tableau(col))
    }

    pub fn locate(&self, card: Card) -> Option<Location> {
        self.tableau.locate(card)
    }

    pub fn is_face_up(&self, card: Card) -> bool {
        self.deck.is_face_up(card)
    }

    pub fn is_won(&self) -> bool {
        self.tableau.is_win()
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed()
    }

    pub fn clock_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn deal_label(&self) -> &str {
        &self.deal_label
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn view(&self) -> GameView {
        GameView::from(self)
    }

    pub fn state_hash(&self) -> u64 {
        hash_position(&self.tableau, &self.deck)
    }

    pub fn verify_invariants(&self) -> Result<(), InvariantError> {
        self.tableau.verify(&self.deck)
    }

    /// Face-down cards still in the columns.
    pub fn hidden_count(&self) -> usize {
        (0..NUM_COLS)
            .flat_map(|col| self.tableau.columns[col].iter())
            .filter(|&c| !self.deck.is_face_up(c))
            .count()
    }

    // --- internals ---

    fn ensure_playing(&self, op: &'static str) -> Result<(), MoveError> {
        if self.tableau.is_win() {
            return Err(self.rejected(op, MoveError::GameOver));
        }
        Ok(())
    }

    fn rejected(&self, op: &'static str, err: MoveError) -> MoveError {
        trace!(op, error = %err, "rejected");
        err
    }

    fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(&self.tableau, &self.deck, self.move_count, self.clock.elapsed())
    }

    fn restore(&mut self, snap: GameSnapshot) {
        self.tableau = snap.tableau;
        self.deck.restore_face_up_mask(snap.face_up);
        self.move_count = snap.move_count;
        self.clock.restore(snap.elapsed);
        debug_assert!(self.tableau.verify(&self.deck).is_ok());
    }

    fn commit(&mut self, mv: Move) -> MoveReport {
        let description = mv.describe(&self.tableau);
        self.history.push(self.snapshot());
        let applied = mv.apply(&mut self.tableau, &mut self.deck);
        self.move_count += 1;
        self.finish_commit(description, applied.cards_moved, applied.flipped.into_iter().collect())
    }

    fn finish_commit(
        &mut self,
        description: String,
        cards_moved: usize,
        flipped: Vec<Card>,
    ) -> MoveReport {
        if self.clock.start_if_needed() {
            debug!("clock started");
        }
        debug_assert!(
            self.tableau.verify(&self.deck).is_ok(),
            "invariant broken after {description}: {:?}",
            self.tableau.verify(&self.deck)
        );

        let won = !self.win_reported && self.tableau.is_win();
        if won {
            self.win_reported = true;
            self.clock.stop();
            info!(
                moves = self.move_count,
                elapsed_secs = self.clock.elapsed().as_secs(),
                "game won"
            );
        }

        debug!(
            mv = %description,
            cards_moved,
            move_count = self.move_count,
            hash = self.state_hash(),
            "commit"
        );

        MoveReport {
            description,
            cards_moved,
            flipped,
            won,
        }
    }
}
