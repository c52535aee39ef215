//! Decision engine entry point.
//!
//! The [`Commander`] lives for the whole match and owns the configuration and
//! the mission ledger. Each turn it is handed a snapshot and opens a [`Turn`],
//! a short-lived session through which the caller issues requests. Finishing
//! the turn yields the ordered actions for the host.
//!
//! A `Turn` holds the ledger mutably, so only one turn can be open at a time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::combat::{advance_attacks, issue_attack, report_attacking_pieces};
use crate::config::EngineConfig;
use crate::construction::{build, build_named, BuildOutcome};
use crate::context::TurnContext;
use crate::danger::{estimate_tile_danger, gather_intelligence};
use crate::economy::{collect_money, CollectOutcome};
use crate::error::{Result, TacticsError};
use crate::ledger::{MissionId, MissionLedger};
use crate::math::{Coordinates, Fixed};
use crate::orders::Action;
use crate::piece::{PieceId, PieceKind};
use crate::snapshot::Snapshot;

/// A builder's state as reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderReport {
    /// Active mission of the builder, if any.
    pub mission: Option<MissionId>,
    /// Money the builder carries.
    pub money: u32,
}

/// Process-lifetime decision engine.
#[derive(Debug, Clone, Default)]
pub struct Commander {
    config: EngineConfig,
    ledger: MissionLedger,
    turns: u64,
}

impl Commander {
    /// Create a commander with the given configuration and an empty ledger.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ledger: MissionLedger::new(),
            turns: 0,
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Missions issued so far.
    #[must_use]
    pub const fn ledger(&self) -> &MissionLedger {
        &self.ledger
    }

    /// Number of turns opened so far.
    #[must_use]
    pub const fn turns(&self) -> u64 {
        self.turns
    }

    /// Open a turn on a fresh snapshot.
    ///
    /// Before returning, missions whose piece is gone are failed and every
    /// active attack mission advances one step. Their orders are the first
    /// actions of the turn.
    ///
    /// # Errors
    /// Returns an error if the snapshot is inconsistent. The ledger is left
    /// untouched in that case.
    pub fn begin_turn(&mut self, snapshot: Snapshot) -> Result<Turn<'_>> {
        let board = Board::from_snapshot(snapshot)?;
        self.turns += 1;
        let mut context = TurnContext::new(board, self.config.sight.clone());

        let lost = self.ledger.fail_missing(context.board());
        let (board, orders) = context.split();
        let advanced = advance_attacks(board, orders, &mut self.ledger);
        tracing::debug!(
            "Turn {}: {} missions lost, {} attacks advanced, {} active",
            self.turns,
            lost.len(),
            advanced.len(),
            self.ledger.active_count()
        );

        Ok(Turn {
            number: self.turns,
            config: &self.config,
            ledger: &mut self.ledger,
            context,
        })
    }
}

/// One turn's decision session.
#[derive(Debug)]
pub struct Turn<'a> {
    number: u64,
    config: &'a EngineConfig,
    ledger: &'a mut MissionLedger,
    context: TurnContext,
}

impl Turn<'_> {
    /// Sequence number of this turn, starting at one.
    #[must_use]
    pub const fn number(&self) -> u64 {
        self.number
    }

    /// Read-only view of the turn.
    #[must_use]
    pub const fn context(&self) -> &TurnContext {
        &self.context
    }

    /// Mission ledger as of now.
    #[must_use]
    pub fn ledger(&self) -> &MissionLedger {
        self.ledger
    }

    /// Send a piece to attack `destination`.
    ///
    /// The first step is taken at the start of the next turn.
    ///
    /// # Errors
    /// Returns an error if the piece is not one of our attackers or the
    /// destination is off the board.
    pub fn attack(&mut self, piece: PieceId, destination: Coordinates) -> Result<MissionId> {
        issue_attack(
            self.context.board(),
            self.ledger,
            piece,
            destination,
            &self.config.attackers,
        )
        .map_err(|err| {
            tracing::warn!("Attack by {} rejected: {}", piece, err);
            err
        })
    }

    /// Have a builder collect toward `target`.
    ///
    /// # Errors
    /// Returns an error if the piece is not one of our builders.
    pub fn collect_money(&mut self, builder: PieceId, target: u32) -> Result<CollectOutcome> {
        let (board, orders) = self.context.split();
        collect_money(board, orders, self.ledger, builder, target, self.config)
            .map_err(|err| {
                tracing::warn!("Collection by {} rejected: {}", builder, err);
                err
            })
    }

    /// Have a builder build `kind`, or collect toward its cost.
    ///
    /// # Errors
    /// Returns an error if the kind has no cost or the piece is not one of our
    /// builders.
    pub fn build(&mut self, builder: PieceId, kind: PieceKind) -> Result<BuildOutcome> {
        let (board, orders) = self.context.split();
        build(board, orders, self.ledger, builder, kind, self.config)
            .map_err(|err| {
                tracing::warn!("Build by {} rejected: {}", builder, err);
                err
            })
    }

    /// [`Turn::build`] with the kind given by its wire name.
    ///
    /// # Errors
    /// As [`Turn::build`], plus unknown kind names.
    pub fn build_named(&mut self, builder: PieceId, kind: &str) -> Result<BuildOutcome> {
        let (board, orders) = self.context.split();
        build_named(board, orders, self.ledger, builder, kind, self.config)
            .map_err(|err| {
                tracing::warn!("Build by {} rejected: {}", builder, err);
                err
            })
    }

    /// Combat power of any visible piece.
    ///
    /// # Errors
    /// Returns an error if the piece is not on the board.
    pub fn power_of(&self, piece: PieceId) -> Result<Fixed> {
        let piece = self
            .context
            .board()
            .piece(piece)
            .ok_or(TacticsError::PieceNotFound(piece))?;
        Ok(self.config.powers.power(piece))
    }

    /// Signed danger of one tile.
    #[must_use]
    pub fn estimate_tile_danger(&self, coordinates: Coordinates) -> Fixed {
        estimate_tile_danger(self.context.board(), coordinates, &self.config.powers)
    }

    /// Distance-weighted danger around `target`.
    #[must_use]
    pub fn gather_intelligence(&self, target: Coordinates, radius: u32) -> Fixed {
        gather_intelligence(self.context.board(), target, radius, &self.config.powers)
    }

    /// Every builder we own with its active mission and money.
    #[must_use]
    pub fn report_builders(&self) -> BTreeMap<PieceId, BuilderReport> {
        self.context
            .board()
            .my_pieces_of_kind(PieceKind::Builder)
            .map(|builder| {
                let report = BuilderReport {
                    mission: self.ledger.active_mission_of(builder.id).map(|m| m.id),
                    money: builder.funds(),
                };
                (builder.id, report)
            })
            .collect()
    }

    /// Every attacker we own with its active attack mission, if any.
    #[must_use]
    pub fn report_attacking_pieces(&self) -> BTreeMap<PieceId, Option<MissionId>> {
        report_attacking_pieces(self.context.board(), self.ledger, &self.config.attackers)
    }

    /// Ids of our pieces of a kind, ascending.
    #[must_use]
    pub fn piece_of_type(&self, kind: PieceKind) -> Vec<PieceId> {
        self.context
            .board()
            .my_pieces_of_kind(kind)
            .map(|piece| piece.id)
            .collect()
    }

    /// Close the turn and return its actions in issue order.
    #[must_use]
    pub fn finish(self) -> Vec<Action> {
        let actions = self.context.into_actions();
        tracing::debug!("Turn {} finished with {} actions", self.number, actions.len());
        actions
    }
}
