//! Construction: build costs and build-or-collect decisions.
//!
//! A build request either pays for the piece immediately or spends this
//! call saving up for it through the economic planner. Requests are never
//! queued: a pending build only progresses when the caller asks again.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::config::EngineConfig;
use crate::economy::{collect_step, turns_to_collect, CollectOutcome};
use crate::error::{Result, TacticsError};
use crate::ledger::{MissionKind, MissionLedger, MissionStart};
use crate::orders::UnitOrders;
use crate::piece::{PieceId, PieceKind};

/// Funds required to build each kind.
///
/// Kinds missing from the table cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CostTable(BTreeMap<PieceKind, u32>);

impl Default for CostTable {
    fn default() -> Self {
        Self(
            [
                (PieceKind::Tank, 8),
                (PieceKind::Airplane, 20),
                (PieceKind::Artillery, 8),
                (PieceKind::Helicopter, 16),
                (PieceKind::Antitank, 10),
                (PieceKind::IronDome, 32),
                (PieceKind::Bunker, 10),
                (PieceKind::Spy, 20),
                (PieceKind::Tower, 16),
                (PieceKind::Satellite, 64),
                (PieceKind::Builder, 20),
            ]
            .into_iter()
            .collect(),
        )
    }
}

impl CostTable {
    /// An empty table: nothing can be built.
    #[must_use]
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Cost of a kind, `None` if it cannot be built.
    #[must_use]
    pub fn cost(&self, kind: PieceKind) -> Option<u32> {
        self.0.get(&kind).copied()
    }

    /// Set or replace the cost of a kind.
    pub fn set(&mut self, kind: PieceKind, cost: u32) -> &mut Self {
        self.0.insert(kind, cost);
        self
    }

    /// Stop a kind from being built.
    pub fn remove(&mut self, kind: PieceKind) -> &mut Self {
        self.0.remove(&kind);
        self
    }

    /// Buildable kinds with their costs, in kind order.
    pub fn iter(&self) -> impl Iterator<Item = (PieceKind, u32)> + '_ {
        self.0.iter().map(|(&kind, &cost)| (kind, cost))
    }
}

/// Result of a build request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildOutcome {
    /// The build order was issued.
    Built {
        /// Kind constructed.
        kind: PieceKind,
        /// Funds spent.
        cost: u32,
    },
    /// Not enough funds; this call was spent collecting instead.
    Pending {
        /// Kind requested.
        kind: PieceKind,
        /// Funds still missing before this call's collection.
        shortfall: u32,
        /// What the builder did toward the cost.
        collect: CollectOutcome,
    },
}

impl BuildOutcome {
    /// Whether the piece was built.
    #[must_use]
    pub const fn is_built(&self) -> bool {
        matches!(self, Self::Built { .. })
    }
}

/// Build a piece with a builder, or collect toward its cost.
///
/// The request is tracked as a `Build` mission: it stays
/// [`MissionStatus::Pending`](crate::ledger::MissionStatus::Pending) while funds are short and succeeds on the call
/// that issues the build. Asking the same builder for a different kind
/// replaces the mission.
///
/// # Errors
/// Returns an error if:
/// - The kind has no configured cost
/// - The piece is missing, foreign or not a builder
pub fn build<O: UnitOrders>(
    board: &Board,
    orders: &mut O,
    ledger: &mut MissionLedger,
    builder_id: PieceId,
    kind: PieceKind,
    config: &EngineConfig,
) -> Result<BuildOutcome> {
    let cost = config
        .costs
        .cost(kind)
        .ok_or(TacticsError::UnknownBuildType(kind))?;
    let builder = board.own_piece_of_kind(builder_id, &[PieceKind::Builder])?;
    let funds = builder.funds();

    let mission_kind = MissionKind::Build { kind };
    let mission = match ledger.active_mission_of(builder_id) {
        Some(active) if active.kind == mission_kind => active.id,
        _ => ledger.issue(
            builder_id,
            mission_kind,
            MissionStart::Pending,
            turns_to_collect(funds, cost, config.economy.collect_cap),
        ),
    };

    if funds >= cost {
        tracing::info!("Builder {} building {} for {}", builder_id, kind, cost);
        orders.build(builder_id, kind);
        ledger.succeed(mission)?;
        return Ok(BuildOutcome::Built { kind, cost });
    }

    let shortfall = cost - funds;
    tracing::debug!(
        "Builder {} is {} short for {}, collecting",
        builder_id,
        shortfall,
        kind
    );
    let collect = collect_step(
        board,
        orders,
        builder,
        cost,
        &config.economy,
        &config.powers,
    );
    ledger.record_step(mission)?;

    Ok(BuildOutcome::Pending {
        kind,
        shortfall,
        collect,
    })
}

/// [`build`] with the kind given by its wire name.
///
/// # Errors
/// Unknown names are rejected before anything else is checked.
pub fn build_named<O: UnitOrders>(
    board: &Board,
    orders: &mut O,
    ledger: &mut MissionLedger,
    builder_id: PieceId,
    kind: &str,
    config: &EngineConfig,
) -> Result<BuildOutcome> {
    let kind: PieceKind = kind.parse()?;
    build(board, orders, ledger, builder_id, kind, config)
}
