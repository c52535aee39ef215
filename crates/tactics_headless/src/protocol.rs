//! JSON lines protocol between the host and the agent.
//!
//! **Input (stdin):** one [`Snapshot`](tactics_core::snapshot::Snapshot) per
//! line, one line per turn.
//! **Output (stdout):** one [`Response`] per line.
//!
//! # Example Session
//!
//! ```text
//! <- {"type":"ready","version":"0.1.0"}
//! -> {"width":5,"height":5,"country":"red","tiles":[...]}
//! <- {"type":"actions","turn":1,"actions":[{"action":"move","piece":1,"to":{"x":3,"y":2}}]}
//! -> {"width":5,"height":0,"country":"red","tiles":[]}
//! <- {"type":"error","turn":2,"message":"Invalid board dimensions: 5x0"}
//! <- {"type":"bye","turns":2}
//! ```
//!
//! A rejected line never ends the session; the next line is a new turn.

use serde::{Deserialize, Serialize};

use tactics_core::orders::Action;

/// Responses written by the adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// Adapter is ready to read snapshots.
    Ready { version: String },

    /// Actions for one turn, in the order they must be executed.
    Actions { turn: u64, actions: Vec<Action> },

    /// The turn's input was rejected. No actions are issued for it.
    Error { turn: u64, message: String },

    /// Input closed.
    Bye { turns: u64 },
}

impl Response {
    /// Ready message carrying the crate version.
    #[must_use]
    pub fn ready() -> Self {
        Self::Ready {
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Create an error response.
    pub fn error(turn: u64, message: impl Into<String>) -> Self {
        Self::Error {
            turn,
            message: message.into(),
        }
    }

    /// Serialize to JSON line (with newline).
    #[must_use]
    pub fn to_json_line(&self) -> String {
        let mut json = serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"type":"error","turn":0,"message":"Serialization failed: {e}"}}"#)
        });
        json.push('\n');
        json
    }
}
