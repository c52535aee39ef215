//! Headless host adapter for the grid tactics agent.
//!
//! Reads one world snapshot per turn as JSON on stdin and answers with the
//! turn's actions on stdout. The agent's behaviour between turns is scripted
//! by [`StandingOrders`](orders::StandingOrders).
//!
//! # Protocol
//!
//! Communication uses JSON lines (one JSON object per line):
//!
//! - **stdin**: Snapshots from the host, one per turn
//! - **stdout**: Responses (actions or errors)
//! - **stderr**: Debug logs (human-readable)
//!
//! See [`protocol`] module for the full response specification.
//!
//! # Example
//!
//! ```bash
//! # Play turns from a file of snapshots
//! cargo run -p tactics_headless -- run < turns.jsonl
//!
//! # With custom heuristics and standing orders
//! cargo run -p tactics_headless -- --config engine.ron --orders rush.ron run
//!
//! # Check the agent answers the same way every time
//! cargo run -p tactics_headless -- verify --input turns.jsonl --runs 5
//! ```

pub mod error;
pub mod orders;
pub mod protocol;
pub mod runner;

pub use error::HeadlessError;
pub use orders::{Doctrine, StandingOrders};
pub use protocol::Response;
pub use runner::HeadlessRunner;
