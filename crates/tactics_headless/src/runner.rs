//! Headless turn loop.

use std::io::{BufRead, Write};

use tactics_core::config::EngineConfig;
use tactics_core::engine::Commander;
use tactics_core::orders::Action;
use tactics_core::snapshot::Snapshot;

use crate::error::Result;
use crate::orders::{Doctrine, StandingOrders};
use crate::protocol::Response;

/// Counters for a finished session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Snapshot lines read.
    pub turns: u64,
    /// Lines answered with an error.
    pub rejected: u64,
    /// Actions issued over the whole session.
    pub actions: u64,
}

/// Drives a [`Commander`] from JSON snapshot lines.
#[derive(Debug, Clone)]
pub struct HeadlessRunner {
    commander: Commander,
    doctrine: Doctrine,
    summary: SessionSummary,
}

impl HeadlessRunner {
    /// Create a runner with default config and standing orders.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default(), StandingOrders::default())
    }

    /// Create a runner with custom configuration.
    #[must_use]
    pub fn with_config(config: EngineConfig, orders: StandingOrders) -> Self {
        Self {
            commander: Commander::new(config),
            doctrine: Doctrine::new(orders),
            summary: SessionSummary::default(),
        }
    }

    /// The commander, for inspecting the mission ledger.
    #[must_use]
    pub const fn commander(&self) -> &Commander {
        &self.commander
    }

    /// Counters so far.
    #[must_use]
    pub const fn summary(&self) -> SessionSummary {
        self.summary
    }

    /// Answer one snapshot line.
    pub fn handle_line(&mut self, line: &str) -> Response {
        self.summary.turns += 1;
        let number = self.summary.turns;
        match self.play_turn(line) {
            Ok(actions) => {
                self.summary.actions += actions.len() as u64;
                Response::Actions {
                    turn: number,
                    actions,
                }
            }
            Err(err) => {
                tracing::warn!("Turn {} rejected: {}", number, err);
                self.summary.rejected += 1;
                Response::error(number, err.to_string())
            }
        }
    }

    fn play_turn(&mut self, line: &str) -> Result<Vec<Action>> {
        let snapshot = Snapshot::from_json(line)?;
        let mut turn = self.commander.begin_turn(snapshot)?;
        self.doctrine.command(&mut turn);
        Ok(turn.finish())
    }

    /// Run the loop until `input` is exhausted.
    ///
    /// Writes a ready line first, one response per non-empty input line,
    /// then a bye line.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<SessionSummary> {
        write!(output, "{}", Response::ready().to_json_line())?;
        output.flush()?;

        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let response = self.handle_line(line);
            write!(output, "{}", response.to_json_line())?;
            output.flush()?;
        }

        write!(
            output,
            "{}",
            Response::Bye {
                turns: self.summary.turns
            }
            .to_json_line()
        )?;
        output.flush()?;
        tracing::info!(
            "Session over: {} turns, {} rejected, {} actions",
            self.summary.turns,
            self.summary.rejected,
            self.summary.actions
        );
        Ok(self.summary)
    }
}

impl Default for HeadlessRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// Replay the same snapshot lines through `runs` fresh runners and check
/// that every run answers identically.
///
/// Returns the index of the first line whose answers differ, if any.
pub fn find_divergence(
    lines: &[String],
    config: &EngineConfig,
    orders: &StandingOrders,
    runs: u32,
) -> Option<usize> {
    let transcripts: Vec<Vec<Response>> = (0..runs)
        .map(|_| {
            let mut runner = HeadlessRunner::with_config(config.clone(), orders.clone());
            lines.iter().map(|line| runner.handle_line(line)).collect()
        })
        .collect();

    let first = transcripts.first()?;
    transcripts.iter().skip(1).find_map(|other| {
        first
            .iter()
            .zip(other)
            .position(|(a, b)| a != b)
    })
}
