//! Error types for the decision core.

use thiserror::Error;

use crate::ledger::{MissionId, MissionStatus};
use crate::piece::{CountryId, PieceId, PieceKind};

/// Result type alias using [`TacticsError`].
pub type Result<T> = std::result::Result<T, TacticsError>;

/// Top-level error type for all decision core errors.
///
/// Every error is local to the call that produced it. Nothing in a turn's
/// decision path panics or aborts the turn on these.
#[derive(Debug, Error)]
pub enum TacticsError {
    /// The piece is not present in this turn's snapshot.
    #[error("Piece not found: {0}")]
    PieceNotFound(PieceId),

    /// The piece exists but belongs to another country.
    #[error("Piece {piece} belongs to {owner}, not to this country")]
    NotOwned {
        /// Piece that was addressed.
        piece: PieceId,
        /// Country that actually owns it.
        owner: CountryId,
    },

    /// The piece cannot carry out the requested order.
    #[error("Piece {piece} is a {actual}, expected one of: {expected}")]
    WrongKind {
        /// Piece that was addressed.
        piece: PieceId,
        /// Its kind.
        actual: PieceKind,
        /// Accepted kinds, comma separated.
        expected: String,
    },

    /// Coordinates fall outside the board.
    #[error("Coordinates ({x}, {y}) are outside the {width}x{height} board")]
    OutOfBounds {
        /// X coordinate.
        x: i32,
        /// Y coordinate.
        y: i32,
        /// Board width.
        width: u32,
        /// Board height.
        height: u32,
    },

    /// Board dimensions must both be positive.
    #[error("Invalid board dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Board width.
        width: u32,
        /// Board height.
        height: u32,
    },

    /// The same piece id appears more than once in a snapshot.
    #[error("Duplicate piece ID in snapshot: {0}")]
    DuplicatePiece(PieceId),

    /// The same coordinates appear more than once in a snapshot.
    #[error("Duplicate tile in snapshot: ({x}, {y})")]
    DuplicateTile {
        /// X coordinate.
        x: i32,
        /// Y coordinate.
        y: i32,
    },

    /// A piece type name that is not part of the game.
    #[error("Unknown piece type: {0}")]
    UnknownPieceKind(String),

    /// No build cost is configured for this kind.
    #[error("No build cost configured for {0}")]
    UnknownBuildType(PieceKind),

    /// Mission id was never issued.
    #[error("Mission not found: {0}")]
    MissionNotFound(MissionId),

    /// Mission already reached a terminal state.
    #[error("Mission {id} already finished with status {status:?}")]
    MissionFinished {
        /// Mission id.
        id: MissionId,
        /// Its terminal status.
        status: MissionStatus,
    },

    /// Failed to read a configuration file.
    #[error("Failed to read config: {0}")]
    ConfigRead(#[from] std::io::Error),

    /// Failed to parse a RON configuration.
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),

    /// Failed to parse a JSON turn snapshot.
    #[error("Failed to parse snapshot: {0}")]
    SnapshotParse(#[from] serde_json::Error),
}
