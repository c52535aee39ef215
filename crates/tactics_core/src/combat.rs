//! Attack missions.
//!
//! An attack is issued once and then advanced automatically at the start of
//! every following turn: one cell per turn toward the destination, then an
//! attack on arrival.

use std::collections::BTreeMap;

use crate::board::Board;
use crate::error::Result;
use crate::ledger::{MissionId, MissionKind, MissionLedger, MissionStart, MissionStatus};
use crate::math::Coordinates;
use crate::orders::UnitOrders;
use crate::piece::{PieceId, PieceKind};

/// Start (or replace) an attack mission for a piece.
///
/// The piece must be ours and of one of the `attackers` kinds, and the
/// destination must be on the board. Any active mission of the piece is
/// failed first.
///
/// # Errors
/// Returns an error if the piece is missing, foreign or of the wrong kind,
/// or the destination is off the board.
pub fn issue_attack(
    board: &Board,
    ledger: &mut MissionLedger,
    piece_id: PieceId,
    destination: Coordinates,
    attackers: &[PieceKind],
) -> Result<MissionId> {
    let piece = board.own_piece_of_kind(piece_id, attackers)?;
    board.check_bounds(destination)?;
    Ok(ledger.issue(
        piece_id,
        MissionKind::Attack {
            target: destination,
        },
        MissionStart::InProgress,
        piece.coordinates.manhattan_distance(destination),
    ))
}

/// Advance every active attack mission by one turn.
///
/// Returns the status each advanced mission ended the turn in, in piece
/// order.
pub fn advance_attacks<O: UnitOrders>(
    board: &Board,
    orders: &mut O,
    ledger: &mut MissionLedger,
) -> Vec<(MissionId, MissionStatus)> {
    let attacks: Vec<(MissionId, PieceId, Coordinates)> = ledger
        .active_missions()
        .into_iter()
        .filter_map(|id| ledger.mission(id))
        .filter_map(|mission| match mission.kind {
            MissionKind::Attack { target } => Some((mission.id, mission.piece, target)),
            _ => None,
        })
        .collect();

    attacks
        .into_iter()
        .filter_map(|(id, piece, target)| {
            match advance_attack(board, orders, ledger, id, piece, target) {
                Ok(status) => Some((id, status)),
                Err(err) => {
                    tracing::warn!("Could not advance mission {}: {}", id, err);
                    None
                }
            }
        })
        .collect()
}

fn advance_attack<O: UnitOrders>(
    board: &Board,
    orders: &mut O,
    ledger: &mut MissionLedger,
    id: MissionId,
    piece_id: PieceId,
    target: Coordinates,
) -> Result<MissionStatus> {
    let Some(piece) = board.my_piece(piece_id) else {
        ledger.fail(id)?;
        return Ok(MissionStatus::Failure);
    };
    if !board.in_bounds(target) {
        ledger.fail(id)?;
        return Ok(MissionStatus::Failure);
    }

    let Some(next) = piece.coordinates.step_toward(target) else {
        orders.attack(piece_id);
        ledger.succeed(id)?;
        return Ok(MissionStatus::Success);
    };

    orders.move_piece(piece_id, next);
    let mission = ledger.record_step(id)?;
    tracing::debug!(
        "Piece {} marching to {} via {} (elapsed {}, {} left)",
        piece_id,
        target,
        next,
        mission.elapsed_turns,
        mission.estimated_turns
    );

    if next == target {
        orders.attack(piece_id);
        ledger.succeed(id)?;
        return Ok(MissionStatus::Success);
    }
    Ok(MissionStatus::InProgress)
}

/// Every attacker we own with its active attack mission, if any.
#[must_use]
pub fn report_attacking_pieces(
    board: &Board,
    ledger: &MissionLedger,
    attackers: &[PieceKind],
) -> BTreeMap<PieceId, Option<MissionId>> {
    board
        .my_pieces()
        .filter(|piece| attackers.contains(&piece.kind))
        .map(|piece| {
            let mission = ledger
                .active_mission_of(piece.id)
                .filter(|mission| matches!(mission.kind, MissionKind::Attack { .. }))
                .map(|mission| mission.id);
            (piece.id, mission)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TacticsError;
    use crate::orders::{Action, OrderBook};
    use crate::snapshot::{PieceSnapshot, Snapshot};

    const ATTACKERS: &[PieceKind] = &[PieceKind::Tank];

    fn board_with_tank(at: Coordinates) -> Board {
        let mut snapshot = Snapshot::blank(5, 5, "red");
        snapshot
            .place(at, PieceSnapshot::new(1, PieceKind::Tank, "red"))
            .place(
                Coordinates::new(4, 4),
                PieceSnapshot::new(2, PieceKind::Builder, "red"),
            )
            .place(
                Coordinates::new(4, 0),
                PieceSnapshot::new(3, PieceKind::Tank, "blue"),
            );
        Board::from_snapshot(snapshot).unwrap()
    }

    #[test]
    fn test_issue_attack_estimates_distance() {
        let board = board_with_tank(Coordinates::new(0, 0));
        let mut ledger = MissionLedger::new();
        let id = issue_attack(&board, &mut ledger, 1, Coordinates::new(2, 3), ATTACKERS).unwrap();
        let mission = ledger.mission(id).unwrap();
        assert_eq!(mission.estimated_turns, 5);
        assert_eq!(mission.status, MissionStatus::InProgress);
    }

    #[test]
    fn test_issue_attack_validation() {
        let board = board_with_tank(Coordinates::new(0, 0));
        let mut ledger = MissionLedger::new();
        assert!(matches!(
            issue_attack(&board, &mut ledger, 2, Coordinates::new(0, 1), ATTACKERS),
            Err(TacticsError::WrongKind { .. })
        ));
        assert!(matches!(
            issue_attack(&board, &mut ledger, 3, Coordinates::new(0, 1), ATTACKERS),
            Err(TacticsError::NotOwned { .. })
        ));
        assert!(matches!(
            issue_attack(&board, &mut ledger, 1, Coordinates::new(0, 5), ATTACKERS),
            Err(TacticsError::OutOfBounds { .. })
        ));
        assert!(ledger.missions().is_empty());
    }

    #[test]
    fn test_advance_moves_one_cell() {
        let board = board_with_tank(Coordinates::new(0, 0));
        let mut ledger = MissionLedger::new();
        let id = issue_attack(&board, &mut ledger, 1, Coordinates::new(3, 1), ATTACKERS).unwrap();

        let mut orders = OrderBook::new();
        let statuses = advance_attacks(&board, &mut orders, &mut ledger);
        assert_eq!(statuses, [(id, MissionStatus::InProgress)]);
        assert_eq!(
            orders.actions(),
            [Action::Move {
                piece: 1,
                to: Coordinates::new(1, 0)
            }]
        );
        let mission = ledger.mission(id).unwrap();
        assert_eq!((mission.elapsed_turns, mission.estimated_turns), (1, 3));
    }

    #[test]
    fn test_advance_at_destination_attacks() {
        let board = board_with_tank(Coordinates::new(2, 2));
        let mut ledger = MissionLedger::new();
        let id = issue_attack(&board, &mut ledger, 1, Coordinates::new(2, 2), ATTACKERS).unwrap();

        let mut orders = OrderBook::new();
        advance_attacks(&board, &mut orders, &mut ledger);
        assert_eq!(orders.actions(), [Action::Attack { piece: 1 }]);
        assert_eq!(ledger.status_of(id), Some(MissionStatus::Success));
    }

    #[test]
    fn test_advance_arriving_attacks_same_turn() {
        let board = board_with_tank(Coordinates::new(2, 1));
        let mut ledger = MissionLedger::new();
        let id = issue_attack(&board, &mut ledger, 1, Coordinates::new(2, 2), ATTACKERS).unwrap();

        let mut orders = OrderBook::new();
        advance_attacks(&board, &mut orders, &mut ledger);
        assert_eq!(
            orders.actions(),
            [
                Action::Move {
                    piece: 1,
                    to: Coordinates::new(2, 2)
                },
                Action::Attack { piece: 1 },
            ]
        );
        assert_eq!(ledger.status_of(id), Some(MissionStatus::Success));
        assert!(ledger.active_mission_of(1).is_none());
    }

    #[test]
    fn test_advance_missing_piece_fails() {
        let board = board_with_tank(Coordinates::new(0, 0));
        let mut ledger = MissionLedger::new();
        let id = ledger.issue(
            77,
            MissionKind::Attack {
                target: Coordinates::new(1, 1),
            },
            MissionStart::InProgress,
            2,
        );
        let mut orders = OrderBook::new();
        let statuses = advance_attacks(&board, &mut orders, &mut ledger);
        assert_eq!(statuses, [(id, MissionStatus::Failure)]);
        assert!(orders.is_empty());
    }

    #[test]
    fn test_advance_ignores_other_missions() {
        let board = board_with_tank(Coordinates::new(0, 0));
        let mut ledger = MissionLedger::new();
        ledger.issue(
            2,
            MissionKind::Collect { target_amount: 10 },
            MissionStart::InProgress,
            2,
        );
        let statuses = advance_attacks(&board, &mut OrderBook::new(), &mut ledger);
        assert!(statuses.is_empty());
    }

    #[test]
    fn test_report_attacking_pieces() {
        let board = board_with_tank(Coordinates::new(0, 0));
        let mut ledger = MissionLedger::new();
        let report = report_attacking_pieces(&board, &ledger, ATTACKERS);
        assert_eq!(report.len(), 1);
        assert_eq!(report[&1], None);

        let id = issue_attack(&board, &mut ledger, 1, Coordinates::new(1, 0), ATTACKERS).unwrap();
        let report = report_attacking_pieces(&board, &ledger, ATTACKERS);
        assert_eq!(report[&1], Some(id));
    }
}
