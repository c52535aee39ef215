//! Error type of the headless adapter.

use thiserror::Error;

use tactics_core::error::TacticsError;

/// Errors raised outside the decision core: files, streams and wire parsing.
#[derive(Error, Debug)]
pub enum HeadlessError {
    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(String),
    /// Reading input or writing output failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A RON file could not be parsed.
    #[error("Failed to parse RON: {0}")]
    Ron(#[from] ron::error::SpannedError),
    /// A JSON line could not be parsed or written.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The decision core rejected a request.
    #[error(transparent)]
    Tactics(#[from] TacticsError),
}

/// Result alias for headless operations.
pub type Result<T> = std::result::Result<T, HeadlessError>;
