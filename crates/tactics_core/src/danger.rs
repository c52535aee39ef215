//! Danger heuristics.
//!
//! - [`PowerTable::power`]: combat power of a single piece
//! - [`estimate_tile_danger`]: signed strength of the strongest piece on a tile
//! - [`gather_intelligence`]: distance-weighted danger around a cell
//!
//! Danger is signed. Positive values mean foreign strength on a foreign tile,
//! negative values mean our own strength on one of our tiles, and zero means
//! nothing to worry about (including every unclaimed tile).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Piece};
use crate::math::{Coordinates, Fixed};
use crate::piece::PieceKind;

/// How a kind's power is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerRule {
    /// Fixed power.
    Constant(i32),
    /// Aircraft: `airborne / max(time_in_air, 1)` while flying, `grounded`
    /// otherwise. Freshly launched aircraft are at their strongest.
    Aircraft {
        /// Numerator of the in-flight power.
        airborne: i32,
        /// Power on the ground.
        grounded: i32,
    },
}

/// Power rule per piece kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerTable {
    /// Power of kinds not listed in `rules`.
    pub default: i32,
    /// Per-kind rules.
    pub rules: BTreeMap<PieceKind, PowerRule>,
}

impl Default for PowerTable {
    fn default() -> Self {
        let aircraft = PowerRule::Aircraft {
            airborne: 500,
            grounded: 4,
        };
        Self {
            default: 15,
            rules: [
                (PieceKind::Tank, PowerRule::Constant(10)),
                (PieceKind::Antitank, PowerRule::Constant(100)),
                (PieceKind::Artillery, PowerRule::Constant(30)),
                (PieceKind::Airplane, aircraft),
                (PieceKind::Helicopter, aircraft),
            ]
            .into_iter()
            .collect(),
        }
    }
}

impl PowerTable {
    /// Rule for a kind, falling back to the default constant.
    #[must_use]
    pub fn rule(&self, kind: PieceKind) -> PowerRule {
        self.rules
            .get(&kind)
            .copied()
            .unwrap_or(PowerRule::Constant(self.default))
    }

    /// Combat power of a piece. Total for every kind and state.
    #[must_use]
    pub fn power(&self, piece: &Piece) -> Fixed {
        match self.rule(piece.kind) {
            PowerRule::Constant(power) => Fixed::from_num(power),
            PowerRule::Aircraft { airborne, grounded } => {
                if piece.flying {
                    let time_in_air = piece.time_in_air.unwrap_or(0).max(1);
                    Fixed::from_num(airborne) / Fixed::saturating_from_num(time_in_air)
                } else {
                    Fixed::from_num(grounded)
                }
            }
        }
    }
}

/// Signed danger of a single tile.
///
/// - Unclaimed or unknown tile: `0`
/// - Our tile: minus the strongest of our pieces on it, `0` if none
/// - Anyone else's tile: the strongest foreign piece on it, `0` if none
#[must_use]
pub fn estimate_tile_danger(board: &Board, coordinates: Coordinates, powers: &PowerTable) -> Fixed {
    let Some(tile) = board.tile(coordinates) else {
        return Fixed::ZERO;
    };
    let Some(owner) = tile.country.as_deref() else {
        return Fixed::ZERO;
    };

    let ours = owner == board.my_country();
    let strongest = board
        .pieces_on(coordinates)
        .filter(|piece| board.is_mine(piece) == ours)
        .map(|piece| powers.power(piece))
        .max()
        .unwrap_or(Fixed::ZERO);

    if ours {
        -strongest
    } else {
        strongest
    }
}

/// Distance-weighted danger around `target`.
///
/// Sums `danger / max(distance, 1)` over every tile within Euclidean
/// `radius`, so the target tile itself counts with weight one. Only the
/// bounding box of `radius` is scanned.
#[must_use]
pub fn gather_intelligence(
    board: &Board,
    target: Coordinates,
    radius: u32,
    powers: &PowerTable,
) -> Fixed {
    board
        .cells_within(target, radius)
        .map(|cell| {
            let danger = estimate_tile_danger(board, cell, powers);
            if danger == Fixed::ZERO {
                return Fixed::ZERO;
            }
            danger / cell.distance(target).max(Fixed::ONE)
        })
        .fold(Fixed::ZERO, |total, weighted| total.saturating_add(weighted))
}
