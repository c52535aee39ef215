//! Multi-turn mission ledger.
//!
//! The host only ever shows the current turn, so anything that takes more
//! than one turn (an attack march, saving up for a build) is remembered here.
//! The ledger is the only state that outlives a turn.
//!
//! # State machine
//!
//! ```text
//! Pending ──┐
//!    │      ├──> Success
//!    v      │
//! InProgress┴──> Failure
//! ```
//!
//! - A piece has at most one active (non-terminal) mission.
//! - Issuing a mission for a piece that already has one fails the old one
//!   first.
//! - Mission ids increase monotonically and are never reused.
//! - Terminal missions stay in the log forever; they are only unlinked from
//!   the active map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::{Result, TacticsError};
use crate::math::Coordinates;
use crate::piece::{PieceId, PieceKind};

/// Unique mission identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MissionId(pub u64);

impl std::fmt::Display for MissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a mission is trying to achieve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissionKind {
    /// March to a cell and attack there.
    Attack {
        /// Cell to attack.
        target: Coordinates,
    },
    /// Collect until the builder carries at least this much.
    Collect {
        /// Money the builder should end up with.
        target_amount: u32,
    },
    /// Construct a piece once funds allow.
    Build {
        /// Kind to construct.
        kind: PieceKind,
    },
}

/// Lifecycle state of a mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissionStatus {
    /// Waiting on a precondition (funds for a build).
    Pending,
    /// Being carried out.
    InProgress,
    /// Finished successfully.
    Success,
    /// Abandoned, replaced, or made impossible.
    Failure,
}

/// Status a new mission starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissionStart {
    /// Waiting on a precondition (funds for a build).
    Pending,
    /// Carried out from the next turn on.
    InProgress,
}

impl From<MissionStart> for MissionStatus {
    fn from(start: MissionStart) -> Self {
        match start {
            MissionStart::Pending => Self::Pending,
            MissionStart::InProgress => Self::InProgress,
        }
    }
}

impl MissionStatus {
    /// Whether no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failure)
    }
}

/// One tracked mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    /// Mission id.
    pub id: MissionId,
    /// Piece carrying out the mission.
    pub piece: PieceId,
    /// Goal.
    pub kind: MissionKind,
    /// Current state.
    pub status: MissionStatus,
    /// Turns spent on the mission so far.
    pub elapsed_turns: u32,
    /// Estimated turns left, never below zero.
    pub estimated_turns: u32,
}

impl Mission {
    /// Whether the mission can still change state.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }
}

/// Process-lifetime store of missions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionLedger {
    /// Every mission ever issued, indexed by id.
    log: Vec<Mission>,
    /// Piece → its single active mission.
    active: BTreeMap<PieceId, MissionId>,
}

impl MissionLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a mission for a piece, failing any mission it already has.
    pub fn issue(
        &mut self,
        piece: PieceId,
        kind: MissionKind,
        start: MissionStart,
        estimated_turns: u32,
    ) -> MissionId {
        if let Some(previous) = self.active.get(&piece).copied() {
            tracing::warn!(
                "Mission {} for piece {} replaced, marking it failed",
                previous,
                piece
            );
            self.finish(previous, MissionStatus::Failure);
        }

        let id = MissionId(self.log.len() as u64);
        self.log.push(Mission {
            id,
            piece,
            kind,
            status: start.into(),
            elapsed_turns: 0,
            estimated_turns,
        });
        self.active.insert(piece, id);
        tracing::info!(
            "Mission {} issued to piece {}: {:?}, estimated {} turns",
            id,
            piece,
            kind,
            estimated_turns
        );
        id
    }

    /// Record one turn of progress: elapsed +1, estimate -1 (floored at 0).
    ///
    /// # Errors
    /// Fails if the mission is unknown or already terminal.
    pub fn record_step(&mut self, id: MissionId) -> Result<&Mission> {
        let mission = self.active_mut(id)?;
        mission.elapsed_turns += 1;
        mission.estimated_turns = mission.estimated_turns.saturating_sub(1);
        Ok(mission)
    }

    /// Move an active mission to [`MissionStatus::Success`].
    ///
    /// # Errors
    /// Fails if the mission is unknown or already terminal.
    pub fn succeed(&mut self, id: MissionId) -> Result<()> {
        self.active_mut(id)?;
        tracing::info!("Mission {} succeeded", id);
        self.finish(id, MissionStatus::Success);
        Ok(())
    }

    /// Move an active mission to [`MissionStatus::Failure`].
    ///
    /// # Errors
    /// Fails if the mission is unknown or already terminal.
    pub fn fail(&mut self, id: MissionId) -> Result<()> {
        self.active_mut(id)?;
        tracing::warn!("Mission {} failed", id);
        self.finish(id, MissionStatus::Failure);
        Ok(())
    }

    /// Fail every active mission whose piece is no longer one of ours.
    ///
    /// Returns the failed mission ids in piece order.
    pub fn fail_missing(&mut self, board: &Board) -> Vec<MissionId> {
        let gone: Vec<MissionId> = self
            .active
            .iter()
            .filter(|(piece, _)| board.my_piece(**piece).is_none())
            .map(|(_, &id)| id)
            .collect();
        for &id in &gone {
            tracing::warn!("Mission {} lost its piece, marking it failed", id);
            self.finish(id, MissionStatus::Failure);
        }
        gone
    }

    /// The active mission of a piece.
    #[must_use]
    pub fn active_mission_of(&self, piece: PieceId) -> Option<&Mission> {
        self.active.get(&piece).and_then(|&id| self.mission(id))
    }

    /// Status of any mission ever issued.
    #[must_use]
    pub fn status_of(&self, id: MissionId) -> Option<MissionStatus> {
        self.mission(id).map(|mission| mission.status)
    }

    /// Any mission ever issued.
    #[must_use]
    pub fn mission(&self, id: MissionId) -> Option<&Mission> {
        usize::try_from(id.0).ok().and_then(|index| self.log.get(index))
    }

    /// The full log, in issue order.
    #[must_use]
    pub fn missions(&self) -> &[Mission] {
        &self.log
    }

    /// Ids of all active missions, in piece order.
    #[must_use]
    pub fn active_missions(&self) -> Vec<MissionId> {
        self.active.values().copied().collect()
    }

    /// Number of active missions.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    fn active_mut(&mut self, id: MissionId) -> Result<&mut Mission> {
        let index = usize::try_from(id.0).map_err(|_| TacticsError::MissionNotFound(id))?;
        let mission = self
            .log
            .get_mut(index)
            .ok_or(TacticsError::MissionNotFound(id))?;
        if mission.status.is_terminal() {
            return Err(TacticsError::MissionFinished {
                id,
                status: mission.status,
            });
        }
        Ok(mission)
    }

    fn finish(&mut self, id: MissionId, status: MissionStatus) {
        let Some(mission) = usize::try_from(id.0)
            .ok()
            .and_then(|index| self.log.get_mut(index))
        else {
            return;
        };
        mission.status = status;
        let piece = mission.piece;
        if self.active.get(&piece) == Some(&id) {
            self.active.remove(&piece);
        }
    }
}
