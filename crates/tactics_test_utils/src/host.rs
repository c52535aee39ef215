//! A minimal stand-in for the host simulation.
//!
//! [`apply_actions`] plays a turn's actions back onto a snapshot so that
//! multi-turn scenarios can be driven without a real game server. Only the
//! bookkeeping the agent relies on is modelled: movement, money transfer and
//! construction. Attacks are acknowledged but resolve nothing.

use tactics_core::construction::CostTable;
use tactics_core::math::Coordinates;
use tactics_core::orders::Action;
use tactics_core::piece::{PieceId, PieceKind};
use tactics_core::snapshot::{PieceSnapshot, Snapshot};

/// Summary of what [`apply_actions`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostReport {
    /// Actions applied to the snapshot.
    pub applied: usize,
    /// Actions ignored because they referred to a missing piece or tile.
    pub ignored: usize,
    /// Ids of pieces spawned by build actions.
    pub spawned: Vec<PieceId>,
}

/// Apply actions to a snapshot in order.
///
/// - `move`: the piece is moved to the target tile
/// - `collect_money`: money moves from the piece's tile to the piece,
///   never more than the tile holds
/// - `build`: the builder pays the cost and a new piece of its country
///   appears on its tile with the next free id
/// - `attack`: counted, no effect
pub fn apply_actions(snapshot: &mut Snapshot, actions: &[Action], costs: &CostTable) -> HostReport {
    let mut report = HostReport::default();
    for action in actions {
        let applied = match *action {
            Action::Move { piece, to } => move_piece(snapshot, piece, to),
            Action::CollectMoney { piece, amount } => collect(snapshot, piece, amount),
            Action::Build { piece, kind } => {
                let cost = costs.cost(kind).unwrap_or(0);
                match build(snapshot, piece, cost, kind) {
                    Some(id) => {
                        report.spawned.push(id);
                        true
                    }
                    None => false,
                }
            }
            Action::Attack { piece } => locate(snapshot, piece).is_some(),
        };
        if applied {
            report.applied += 1;
        } else {
            tracing::debug!("Host ignored {:?}", action);
            report.ignored += 1;
        }
    }
    report
}

/// Tile index and position within the tile of a piece.
fn locate(snapshot: &Snapshot, piece: PieceId) -> Option<(usize, usize)> {
    snapshot.tiles.iter().enumerate().find_map(|(t, tile)| {
        tile.pieces
            .iter()
            .position(|p| p.id == piece)
            .map(|p| (t, p))
    })
}

fn move_piece(snapshot: &mut Snapshot, piece: PieceId, to: Coordinates) -> bool {
    let Some(target) = snapshot.tiles.iter().position(|t| t.coordinates == to) else {
        return false;
    };
    let Some((tile, index)) = locate(snapshot, piece) else {
        return false;
    };
    let moving = snapshot.tiles[tile].pieces.remove(index);
    snapshot.tiles[target].pieces.push(moving);
    true
}

fn collect(snapshot: &mut Snapshot, piece: PieceId, amount: u32) -> bool {
    let Some((tile, index)) = locate(snapshot, piece) else {
        return false;
    };
    let tile = &mut snapshot.tiles[tile];
    let taken = amount.min(tile.money);
    tile.money -= taken;
    let collector = &mut tile.pieces[index];
    collector.money = Some(collector.money.unwrap_or(0) + taken);
    true
}

fn build(
    snapshot: &mut Snapshot,
    piece: PieceId,
    cost: u32,
    kind: PieceKind,
) -> Option<PieceId> {
    let (tile, index) = locate(snapshot, piece)?;
    let next_id = snapshot
        .tiles
        .iter()
        .flat_map(|t| t.pieces.iter().map(|p| p.id))
        .max()
        .map_or(1, |id| id + 1);

    let tile = &mut snapshot.tiles[tile];
    let builder = &mut tile.pieces[index];
    let funds = builder.money.unwrap_or(0);
    if funds < cost {
        return None;
    }
    builder.money = Some(funds - cost);
    let country = builder.country.clone();
    tile.pieces.push(PieceSnapshot::new(next_id, kind, country));
    Some(next_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::SnapshotBuilder;

    fn pieces_at(snapshot: &Snapshot, x: i32, y: i32) -> Vec<PieceId> {
        snapshot
            .tiles
            .iter()
            .find(|t| t.coordinates == Coordinates::new(x, y))
            .map(|t| t.pieces.iter().map(|p| p.id).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_move_and_attack() {
        let mut snapshot = SnapshotBuilder::new(3, 3)
            .unit(1, PieceKind::Tank, 0, 0)
            .build();
        let report = apply_actions(
            &mut snapshot,
            &[
                Action::Move {
                    piece: 1,
                    to: Coordinates::new(1, 0),
                },
                Action::Attack { piece: 1 },
                Action::Move {
                    piece: 1,
                    to: Coordinates::new(9, 9),
                },
            ],
            &CostTable::default(),
        );
        assert_eq!((report.applied, report.ignored), (2, 1));
        assert_eq!(pieces_at(&snapshot, 1, 0), [1]);
        assert!(pieces_at(&snapshot, 0, 0).is_empty());
    }

    #[test]
    fn test_collect_is_bounded_by_tile() {
        let mut snapshot = SnapshotBuilder::new(3, 3)
            .money(1, 1, 3)
            .builder(1, 1, 1, 2)
            .build();
        apply_actions(
            &mut snapshot,
            &[Action::CollectMoney {
                piece: 1,
                amount: 5,
            }],
            &CostTable::default(),
        );
        let tile = &snapshot.tiles[4];
        assert_eq!(tile.money, 0);
        assert_eq!(tile.pieces[0].money, Some(5));
    }

    #[test]
    fn test_build_spawns_and_charges() {
        let mut snapshot = SnapshotBuilder::new(3, 3)
            .builder(4, 1, 1, 10)
            .enemy(9, PieceKind::Tank, 2, 2)
            .build();
        let report = apply_actions(
            &mut snapshot,
            &[
                Action::Build {
                    piece: 4,
                    kind: PieceKind::Tank,
                },
                Action::Build {
                    piece: 4,
                    kind: PieceKind::Tank,
                },
            ],
            &CostTable::default(),
        );
        assert_eq!(report.spawned, [10]);
        assert_eq!(report.ignored, 1);
        assert_eq!(pieces_at(&snapshot, 1, 1), [4, 10]);
        assert_eq!(snapshot.tiles[4].pieces[0].money, Some(2));
        assert_eq!(snapshot.tiles[4].pieces[1].country, "red");
    }
}
