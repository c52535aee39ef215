use tactics_core::danger::{estimate_tile_danger, gather_intelligence};
use tactics_core::economy::{collect_step, walk_toward};
use tactics_core::prelude::*;
use tactics_test_utils::determinism::strategies::{
    arb_any_coordinates, arb_coordinates, arb_piece, arb_snapshot,
};
use tactics_test_utils::fixtures::SnapshotBuilder;
use tactics_test_utils::proptest::prelude::*;

proptest! {
    /// Power is defined and finite for every kind, flying or not.
    #[test]
    fn power_is_total(piece in arb_piece(1)) {
        let snapshot = SnapshotBuilder::new(1, 1).piece(0, 0, piece).build();
        let board = Board::from_snapshot(snapshot).unwrap();
        let power = PowerTable::default().power(board.piece(1).unwrap());
        prop_assert!(power >= Fixed::ZERO);
        prop_assert!(power <= Fixed::from_num(500));
    }

    /// Own tiles are never dangerous, foreign tiles never safe, unclaimed
    /// tiles always neutral.
    #[test]
    fn danger_sign_follows_owner(snapshot in arb_snapshot(6, 12)) {
        let board = Board::from_snapshot(snapshot).unwrap();
        let powers = PowerTable::default();
        for tile in board.tiles() {
            let danger = estimate_tile_danger(&board, tile.coordinates, &powers);
            match tile.country.as_deref() {
                None => prop_assert_eq!(danger, Fixed::ZERO),
                Some(owner) if owner == board.my_country() => prop_assert!(danger <= Fixed::ZERO),
                Some(_) => prop_assert!(danger >= Fixed::ZERO),
            }
        }
    }

    /// Radius zero sees only the target tile.
    #[test]
    fn intelligence_at_radius_zero_is_tile_danger(snapshot in arb_snapshot(6, 12), x in 0i32..6, y in 0i32..6) {
        let board = Board::from_snapshot(snapshot).unwrap();
        let powers = PowerTable::default();
        let target = Coordinates::new(x, y);
        prop_assert_eq!(
            gather_intelligence(&board, target, 0, &powers),
            estimate_tile_danger(&board, target, &powers)
        );
    }

    /// Every step gets strictly closer until the destination is reached.
    #[test]
    fn step_strictly_reduces_distance(from in arb_any_coordinates(), to in arb_any_coordinates()) {
        match from.step_toward(to) {
            None => prop_assert_eq!(from, to),
            Some(next) => {
                prop_assert_eq!(next.manhattan_distance(to) + 1, from.manhattan_distance(to));
                prop_assert_eq!(next.manhattan_distance(from), 1);
            }
        }
    }

    /// Walks stop at the destination or after the step budget.
    #[test]
    fn walk_is_bounded(from in arb_any_coordinates(), to in arb_any_coordinates(), budget in 0u32..20) {
        let mut orders = OrderBook::new();
        let (reached, steps) = walk_toward(&mut orders, 1, from, to, budget);
        prop_assert_eq!(steps as usize, orders.len());
        prop_assert_eq!(steps, budget.min(from.manhattan_distance(to)));
        prop_assert_eq!(reached.manhattan_distance(to), from.manhattan_distance(to) - steps);
    }

    /// A collection never takes more than the tile holds nor more than the cap.
    #[test]
    fn collection_respects_tile_and_cap(
        tile_money in 0u32..50,
        funds in 0u32..50,
        cap in 1u32..12,
        cell in arb_coordinates(5, 5),
    ) {
        let snapshot = SnapshotBuilder::new(5, 5)
            .money(cell.x, cell.y, tile_money)
            .builder(1, cell.x, cell.y, funds)
            .build();
        let board = Board::from_snapshot(snapshot).unwrap();
        let mut config = EngineConfig::default();
        config.economy.collect_cap = cap;

        let mut orders = OrderBook::new();
        let outcome = collect_step(
            &board,
            &mut orders,
            board.piece(1).unwrap(),
            1000,
            &config.economy,
            &config.powers,
        );
        if let CollectAction::Collected { amount } = outcome.action {
            prop_assert!(amount <= tile_money);
            prop_assert!(amount <= cap);
            prop_assert_eq!(outcome.total, funds + amount);
        } else {
            prop_assert_eq!(outcome.total, funds);
        }
    }

    /// Issuing twice always leaves one active mission and one failure.
    #[test]
    fn reissue_keeps_one_active(first in arb_coordinates(8, 8), second in arb_coordinates(8, 8)) {
        let snapshot = SnapshotBuilder::new(8, 8).unit(1, PieceKind::Tank, 0, 0).build();
        let mut commander = Commander::default();
        let mut turn = commander.begin_turn(snapshot).unwrap();
        let a = turn.attack(1, first).unwrap();
        let b = turn.attack(1, second).unwrap();
        prop_assert_eq!(turn.ledger().active_count(), 1);
        prop_assert_eq!(turn.ledger().status_of(a), Some(MissionStatus::Failure));
        prop_assert_eq!(turn.ledger().status_of(b), Some(MissionStatus::InProgress));
    }
}
