//! # Tactics Core
//!
//! Deterministic decision core for a turn-based grid strategy agent.
//!
//! Each turn the host hands over a fresh [`Snapshot`](snapshot::Snapshot) of
//! the world and receives an ordered list of [`Action`](orders::Action)s back.
//! Everything that has to survive between turns lives in the
//! [`MissionLedger`](ledger::MissionLedger), owned by the
//! [`Commander`](engine::Commander).
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No network IO
//! - No system randomness
//! - No floating-point math in heuristics (uses fixed-point)
//!
//! ## Crate Structure
//!
//! - [`snapshot`] - Wire format of the per-turn world state
//! - [`board`] - Per-turn tile and piece indices
//! - [`context`] - Read-only turn facade plus this turn's order book
//! - [`ledger`] - Multi-turn mission state machine
//! - [`danger`] - Unit power, tile danger and area intelligence
//! - [`economy`] - Builder movement and money collection
//! - [`construction`] - Build costs and build-or-collect decisions
//! - [`combat`] - Attack missions
//! - [`engine`] - Decision engine entry point
//! - [`math`] - Grid coordinates and fixed-point helpers
//!
//! ## Example
//!
//! ```
//! use tactics_core::prelude::*;
//!
//! let mut snapshot = Snapshot::blank(5, 5, "red");
//! snapshot.place(Coordinates::new(0, 0), PieceSnapshot::new(1, PieceKind::Tank, "red"));
//!
//! let mut commander = Commander::default();
//! let mut turn = commander.begin_turn(snapshot).unwrap();
//! let mission = turn.attack(1, Coordinates::new(0, 3)).unwrap();
//! assert_eq!(turn.ledger().status_of(mission), Some(MissionStatus::InProgress));
//! let actions = turn.finish();
//! assert!(actions.is_empty());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod board;
pub mod combat;
pub mod config;
pub mod construction;
pub mod context;
pub mod danger;
pub mod economy;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod math;
pub mod orders;
pub mod piece;
pub mod snapshot;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::board::{Board, Piece, SightTable, Tile};
    pub use crate::config::EngineConfig;
    pub use crate::construction::{BuildOutcome, CostTable};
    pub use crate::context::TurnContext;
    pub use crate::danger::{PowerRule, PowerTable};
    pub use crate::economy::{CollectAction, CollectOutcome, EconomyConfig, RelocationPolicy};
    pub use crate::engine::{BuilderReport, Commander, Turn};
    pub use crate::error::{Result, TacticsError};
    pub use crate::ledger::{
        Mission, MissionId, MissionKind, MissionLedger, MissionStart, MissionStatus,
    };
    pub use crate::math::{Coordinates, Fixed};
    pub use crate::orders::{Action, OrderBook, UnitOrders};
    pub use crate::piece::{CountryId, PieceId, PieceKind};
    pub use crate::snapshot::{PieceSnapshot, Snapshot, TileSnapshot};
}
