//! Property tests over random play.
//!
//! Properties tested:
//! - Every position reached holds each of the 52 cards exactly once, with
//!   foundations as Ace-up runs of their own suit
//! - A rejected operation changes nothing
//! - Undo restores the exact prior position, counter included
//! - Auto-finish leaves no safe move behind
//! - Rule predicates: foundations only take their own suit, empty columns
//!   only Kings
//! - Fresh deals have the Klondike shape for any seed

use proptest::prelude::*;

use crate::autofinish::{is_safe_auto_move, next_safe_move};
use crate::card::{Card, Rank, Suit};
use crate::config::GameConfig;
use crate::deal::DealSource;
use crate::error::MoveError;
use crate::game::Game;
use crate::moves::MoveKind;
use crate::pile::PileRef;
use crate::rules::{can_move_to_foundation, can_move_to_tableau};
use crate::tableau::NUM_COLS;
use crate::test_gens::{self, Action};
use crate::test_support::init_logging;

fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(64);

    ProptestConfig {
        cases,
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

fn seeded(seed: u64) -> Game {
    init_logging();
    Game::new(&DealSource::Seeded(seed), GameConfig::default()).unwrap()
}

/// Position fingerprint plus the counters undo must also restore.
fn fingerprint(game: &Game) -> (u64, u32) {
    (game.state_hash(), game.move_count())
}

proptest! {
    #![proptest_config(proptest_config())]

    /// Property: structural invariants hold after every action
    #[test]
    fn prop_random_play_keeps_invariants(
        seed in any::<u64>(),
        actions in test_gens::actions(120),
    ) {
        let mut game = seeded(seed);
        for action in &actions {
            let _ = test_gens::apply(&mut game, action);
            prop_assert!(game.verify_invariants().is_ok(), "after {:?}: {:?}", action, game.verify_invariants());
            prop_assert_eq!(game.tableau().flatten_cards().len(), 52);
        }
    }

    /// Property: a rejected operation leaves position, counter and history alone
    #[test]
    fn prop_rejections_are_no_ops(
        seed in any::<u64>(),
        actions in test_gens::actions(120),
    ) {
        let mut game = seeded(seed);
        for action in &actions {
            let before = fingerprint(&game);
            let depth = game.history_len();
            if test_gens::apply(&mut game, action).is_err() {
                prop_assert_eq!(fingerprint(&game), before, "{:?}", action);
                prop_assert_eq!(game.history_len(), depth);
            }
        }
    }

    /// Property: undo returns to exactly the position before each commit
    #[test]
    fn prop_undo_is_an_inverse(
        seed in any::<u64>(),
        actions in test_gens::actions(80),
    ) {
        let mut game = seeded(seed);
        let mut trail = Vec::new();

        for action in &actions {
            let before = fingerprint(&game);
            match (action, test_gens::apply(&mut game, action)) {
                (Action::Undo, Ok(_)) => {
                    let expected = trail.pop();
                    prop_assert_eq!(Some(fingerprint(&game)), expected);
                }
                (_, Ok(_)) => trail.push(before),
                (_, Err(_)) => {}
            }
        }

        while let Some(expected) = trail.pop() {
            prop_assert!(game.undo().is_ok());
            prop_assert_eq!(fingerprint(&game), expected);
        }
        prop_assert_eq!(game.undo(), Err(MoveError::NothingToUndo));
        prop_assert_eq!(game.move_count(), 0);
    }

    /// Property: after auto-finish there is no safe move left
    #[test]
    fn prop_auto_finish_reaches_a_fixed_point(
        seed in any::<u64>(),
        actions in test_gens::actions(150),
    ) {
        let mut game = seeded(seed);
        for action in &actions {
            let _ = test_gens::apply(&mut game, action);
        }
        let _ = game.auto_finish();
        prop_assert!(next_safe_move(game.tableau(), game.deck()).is_none());

        let again = game.auto_finish();
        prop_assert!(
            matches!(again, Err(MoveError::NoSafeMoves) | Err(MoveError::GameOver)),
            "{:?}", again
        );
    }

    /// Property: every committed auto-finish card was safe and legal
    #[test]
    fn prop_auto_finish_moves_only_safe_cards(
        seed in any::<u64>(),
        actions in test_gens::actions(150),
    ) {
        let mut game = seeded(seed);
        for action in &actions {
            let _ = test_gens::apply(&mut game, action);
        }
        while let Some(mv) = next_safe_move(game.tableau(), game.deck()) {
            let MoveKind::ToFoundation { card, suit, .. } = mv.kind else {
                return Err(TestCaseError::fail(format!("not a foundation move: {mv:?}")));
            };
            prop_assert_eq!(card.suit(), suit);
            prop_assert!(is_safe_auto_move(game.tableau(), card));
            prop_assert!(can_move_to_foundation(game.tableau(), card, suit));
            prop_assert!(game.move_to_foundation(card).is_ok());
        }
    }

    /// Property: foundations only take their own suit; empty columns only Kings
    #[test]
    fn prop_rule_predicates(
        seed in any::<u64>(),
        actions in test_gens::actions(60),
        card in test_gens::card(),
        suit in test_gens::suit(),
    ) {
        let mut game = seeded(seed);
        for action in &actions {
            let _ = test_gens::apply(&mut game, action);
        }
        let tab = game.tableau();

        if can_move_to_foundation(tab, card, suit) {
            prop_assert_eq!(card.suit(), suit);
            prop_assert_eq!(card.rank_number(), tab.foundation_top_rank(suit) + 1);
        }
        for col in 0..NUM_COLS {
            if can_move_to_tableau(tab, game.deck(), card, col) {
                match tab.columns[col].top() {
                    None => {
                        prop_assert_eq!(card.rank(), Rank::King);
                    }
                    Some(top) => {
                        prop_assert!(game.is_face_up(top));
                        prop_assert_ne!(top.color(), card.color());
                        prop_assert_eq!(top.rank_number(), card.rank_number() + 1);
                    }
                }
            }
        }
    }

    /// Property: a King of any suit fits an empty column, nothing else does
    #[test]
    fn prop_empty_column_accepts_exactly_kings(
        rank in test_gens::rank(),
        suit in test_gens::suit(),
    ) {
        let (tab, deck) = crate::test_support::position(&[], &[], &[]);
        let card = Card::new(suit, rank);
        prop_assert_eq!(can_move_to_tableau(&tab, &deck, card, 0), rank == Rank::King);
    }

    /// Property: every seed deals 1..=7 cards per column, tops face-up, 24 in stock
    #[test]
    fn prop_deal_shape(seed in any::<u64>()) {
        let game = seeded(seed);
        prop_assert_eq!(game.pile(PileRef::Stock).len(), 24);
        for col in 0..NUM_COLS {
            let cards = game.column(col);
            prop_assert_eq!(cards.len(), col + 1);
            for (i, &c) in cards.iter().enumerate() {
                prop_assert_eq!(game.is_face_up(c), i == col);
            }
        }
        for suit in Suit::ALL {
            prop_assert!(game.pile(PileRef::Foundation(suit)).is_empty());
        }
        prop_assert!(game.verify_invariants().is_ok());
    }
}
