//! # Tactics Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Snapshot fixtures and canned scenarios
//! - A minimal host that applies actions to a snapshot
//! - Determinism harness
//! - Property-based testing strategies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod determinism;
pub mod fixtures;
pub mod host;

/// Re-export proptest for convenience.
pub use proptest;
