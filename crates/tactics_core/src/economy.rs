//! Builder economy: collecting money and walking toward it.
//!
//! One call makes exactly one decision for one builder:
//!
//! 1. Enough money on the builder's own tile: collect up to the cap.
//! 2. Otherwise step onto the richest orthogonal neighbour.
//! 3. If every neighbour is empty, walk toward the configured
//!    [`RelocationPolicy`] destination, a bounded number of steps.
//!
//! All calculations use integer math for deterministic simulation.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Piece};
use crate::config::EngineConfig;
use crate::danger::{gather_intelligence, PowerTable};
use crate::error::Result;
use crate::ledger::{MissionKind, MissionLedger, MissionStart};
use crate::math::Coordinates;
use crate::orders::UnitOrders;
use crate::piece::{PieceId, PieceKind};

/// Where a builder goes when there is no money next to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelocationPolicy {
    /// Head for the middle of the board.
    BoardCenter,
    /// Head for a fixed cell.
    Fixed(Coordinates),
    /// Head for the tile with the lowest intelligence score within
    /// `radius`, nearest first on ties.
    Safest {
        /// Intelligence radius used to score each candidate.
        radius: u32,
    },
}

/// Tunables of the economic planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Minimum money on the builder's tile before it collects there.
    pub min_collect: u32,
    /// Maximum money collected per call.
    pub collect_cap: u32,
    /// Maximum single-cell steps per relocation walk.
    pub max_walk_steps: u32,
    /// Fallback destination when no neighbour holds money.
    pub relocation: RelocationPolicy,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            min_collect: 5,
            collect_cap: 5,
            max_walk_steps: 5,
            relocation: RelocationPolicy::BoardCenter,
        }
    }
}

/// What the builder did this call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectAction {
    /// Picked up money from its own tile.
    Collected {
        /// Amount picked up.
        amount: u32,
    },
    /// Moved toward money or the relocation destination.
    Moved {
        /// Cell reached after the last step.
        to: Coordinates,
        /// Single-cell steps taken.
        steps: u32,
    },
    /// Already at the relocation destination with nothing to collect.
    Stayed,
}

/// Result of one economic decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectOutcome {
    /// What was done.
    pub action: CollectAction,
    /// Builder's money after this call.
    pub total: u32,
    /// Whether `total` reaches the requested amount.
    pub target_met: bool,
}

/// Make one economic decision for a builder.
///
/// The builder is not validated here; see [`collect_money`].
pub fn collect_step<O: UnitOrders>(
    board: &Board,
    orders: &mut O,
    builder: &Piece,
    target: u32,
    config: &EconomyConfig,
    powers: &PowerTable,
) -> CollectOutcome {
    let here = builder.coordinates;
    let funds = builder.funds();
    let available = board.money_at(here);

    if available >= config.min_collect {
        let amount = available.min(config.collect_cap);
        if amount > 0 {
            orders.collect_money(builder.id, amount);
            let total = funds.saturating_add(amount);
            tracing::debug!(
                "Builder {} collected {} at {} (now {}/{})",
                builder.id,
                amount,
                here,
                total,
                target
            );
            return CollectOutcome {
                action: CollectAction::Collected { amount },
                total,
                target_met: total >= target,
            };
        }
    }

    let action = match richest_neighbor(board, here) {
        Some((cell, money)) if money > 0 => {
            tracing::debug!(
                "Builder {} stepping to {} ({} money)",
                builder.id,
                cell,
                money
            );
            orders.move_piece(builder.id, cell);
            CollectAction::Moved { to: cell, steps: 1 }
        }
        _ => {
            let destination = relocation_target(board, here, config.relocation, powers);
            tracing::debug!(
                "No money near builder {} at {}, relocating toward {}",
                builder.id,
                here,
                destination
            );
            let (to, steps) =
                walk_toward(orders, builder.id, here, destination, config.max_walk_steps);
            if steps == 0 {
                CollectAction::Stayed
            } else {
                CollectAction::Moved { to, steps }
            }
        }
    };

    CollectOutcome {
        action,
        total: funds,
        target_met: funds >= target,
    }
}

/// Collect toward `target` with a builder, tracking the goal in the ledger.
///
/// A repeat request with the same target continues the builder's active
/// collect mission; anything else replaces it. The mission succeeds on the
/// call that brings the builder's money to `target`.
///
/// # Errors
/// Returns an error if the piece is missing, foreign or not a builder.
pub fn collect_money<O: UnitOrders>(
    board: &Board,
    orders: &mut O,
    ledger: &mut MissionLedger,
    builder_id: PieceId,
    target: u32,
    config: &EngineConfig,
) -> Result<CollectOutcome> {
    let builder = board.own_piece_of_kind(builder_id, &[PieceKind::Builder])?;
    let kind = MissionKind::Collect {
        target_amount: target,
    };

    let mission = match ledger.active_mission_of(builder_id) {
        Some(active) if active.kind == kind => active.id,
        _ => ledger.issue(
            builder_id,
            kind,
            MissionStart::InProgress,
            turns_to_collect(builder.funds(), target, config.economy.collect_cap),
        ),
    };

    let outcome = collect_step(
        board,
        orders,
        builder,
        target,
        &config.economy,
        &config.powers,
    );

    ledger.record_step(mission)?;
    if outcome.target_met {
        ledger.succeed(mission)?;
    }
    Ok(outcome)
}

/// Turns of collecting needed to go from `funds` to `target` at `cap` per turn.
#[must_use]
pub fn turns_to_collect(funds: u32, target: u32, cap: u32) -> u32 {
    let shortfall = target.saturating_sub(funds);
    if cap == 0 {
        shortfall
    } else {
        shortfall.div_ceil(cap)
    }
}

/// The first in-board neighbour holding the strictly greatest money.
fn richest_neighbor(board: &Board, here: Coordinates) -> Option<(Coordinates, u32)> {
    let mut best: Option<(Coordinates, u32)> = None;
    for cell in board.orthogonal_neighbors(here) {
        let money = board.money_at(cell);
        if best.map_or(true, |(_, best_money)| money > best_money) {
            best = Some((cell, money));
        }
    }
    best
}

/// Destination chosen by a relocation policy, clamped onto the board.
#[must_use]
pub fn relocation_target(
    board: &Board,
    from: Coordinates,
    policy: RelocationPolicy,
    powers: &PowerTable,
) -> Coordinates {
    match policy {
        RelocationPolicy::BoardCenter => board.center(),
        RelocationPolicy::Fixed(cell) => Coordinates::new(
            cell.x.clamp(0, board.width() as i32 - 1),
            cell.y.clamp(0, board.height() as i32 - 1),
        ),
        RelocationPolicy::Safest { radius } => board
            .tiles()
            .map(|tile| {
                let score = gather_intelligence(board, tile.coordinates, radius, powers);
                (score, from.manhattan_distance(tile.coordinates), tile.coordinates)
            })
            .min()
            .map_or(from, |(_, _, cell)| cell),
    }
}

/// Walk one cell at a time toward `destination`, at most `max_steps` cells.
///
/// Each step is issued as its own move order. Returns the cell reached and
/// the number of steps taken.
pub fn walk_toward<O: UnitOrders>(
    orders: &mut O,
    piece: PieceId,
    from: Coordinates,
    destination: Coordinates,
    max_steps: u32,
) -> (Coordinates, u32) {
    let mut position = from;
    let mut steps = 0;
    while steps < max_steps {
        let Some(next) = position.step_toward(destination) else {
            break;
        };
        orders.move_piece(piece, next);
        position = next;
        steps += 1;
    }
    (position, steps)
}
