//! Headless grid tactics agent.
//!
//! # Usage
//!
//! ```bash
//! # Interactive mode - read snapshots from stdin
//! cargo run -p tactics_headless
//!
//! # Verify determinism over a recorded match
//! cargo run -p tactics_headless -- verify --input turns.jsonl --runs 5
//! ```
//!
//! # Protocol
//!
//! Input (stdin): JSON snapshots, one per line
//! Output (stdout): JSON responses, one per line
//! Logs (stderr): Debug information

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tactics_core::config::EngineConfig;
use tactics_headless::error::Result;
use tactics_headless::orders::StandingOrders;
use tactics_headless::runner::{find_divergence, HeadlessRunner};

#[derive(Parser)]
#[command(name = "tactics_headless")]
#[command(about = "Headless grid tactics agent speaking JSON lines")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Engine config file (RON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Standing orders file (RON)
    #[arg(short, long, global = true)]
    orders: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play turns read from stdin
    Run,

    /// Replay recorded snapshots several times and compare the answers
    Verify {
        /// File with one snapshot per line
        #[arg(short, long)]
        input: PathBuf,

        /// Number of verification runs
        #[arg(short, long, default_value = "5")]
        runs: u32,
    },

    /// Print the effective config and standing orders as RON
    Show,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging to stderr (stdout is for protocol)
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(filter)
        .init();

    let result = load(cli.config.as_deref(), cli.orders.as_deref()).and_then(|(config, orders)| {
        match cli.command.unwrap_or(Commands::Run) {
            Commands::Run => cmd_run(config, orders),
            Commands::Verify { input, runs } => cmd_verify(&input, &config, &orders, runs),
            Commands::Show => cmd_show(&config, &orders),
        }
    });

    match result {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn load(config: Option<&Path>, orders: Option<&Path>) -> Result<(EngineConfig, StandingOrders)> {
    let config = match config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let orders = match orders {
        Some(path) => StandingOrders::load(path)?,
        None => StandingOrders::default(),
    };
    orders.check_costs(&config.costs)?;
    tracing::debug!("Using standing orders '{}'", orders.name);
    Ok((config, orders))
}

/// Run the interactive loop
fn cmd_run(config: EngineConfig, orders: StandingOrders) -> Result<ExitCode> {
    tracing::info!("Starting headless session with '{}' orders", orders.name);
    let mut runner = HeadlessRunner::with_config(config, orders);
    let stdin = io::stdin();
    let stdout = io::stdout();
    runner.run(stdin.lock(), stdout.lock())?;
    Ok(ExitCode::SUCCESS)
}

/// Verify determinism over a recorded match
fn cmd_verify(
    input: &Path,
    config: &EngineConfig,
    orders: &StandingOrders,
    runs: u32,
) -> Result<ExitCode> {
    let file = std::fs::File::open(input)?;
    let lines: Vec<String> = io::BufReader::new(file)
        .lines()
        .collect::<io::Result<Vec<_>>>()?
        .into_iter()
        .filter(|line| !line.trim().is_empty())
        .collect();

    tracing::info!("Verifying {} turns over {} runs", lines.len(), runs);
    match find_divergence(&lines, config, orders, runs) {
        None => {
            println!("Deterministic: {} turns, {} runs", lines.len(), runs);
            Ok(ExitCode::SUCCESS)
        }
        Some(turn) => {
            println!("Diverged at turn {}", turn + 1);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Print the effective configuration
fn cmd_show(config: &EngineConfig, orders: &StandingOrders) -> Result<ExitCode> {
    let pretty = ron::ser::PrettyConfig::default();
    let config = ron::ser::to_string_pretty(config, pretty.clone()).map_err(io::Error::other)?;
    let orders = ron::ser::to_string_pretty(orders, pretty).map_err(io::Error::other)?;
    println!("// engine config\n{config}\n// standing orders\n{orders}");
    Ok(ExitCode::SUCCESS)
}
