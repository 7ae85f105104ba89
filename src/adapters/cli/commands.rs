//! CLI Command Definitions
//!
//! Argument structs for every `loco-hft` subcommand.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// LocoHFT - Bollinger band mean reversion signal engine
#[derive(Parser, Debug)]
#[command(
    name = "loco-hft",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Bollinger band mean reversion signal engine",
    long_about = "LocoHFT replays price ticks through per-symbol rolling band statistics, \
                  emits BUY/SELL mean reversion signals and checks VaR against a \
                  capital-relative risk limit."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a tick file through the engine and print signals
    Replay(ReplayCmd),

    /// Check a VaR figure against the risk limit
    Risk(RiskCmd),

    /// Equal-weight allocation for a returns matrix
    Weights(WeightsCmd),

    /// Generate a synthetic random-walk tick stream
    Simulate(SimulateCmd),

    /// Realized volatility and regime per symbol
    Volatility(VolatilityCmd),
}

/// Replay ticks
#[derive(Parser, Debug)]
pub struct ReplayCmd {
    /// JSON-lines tick file ("-" for stdin)
    #[arg(short, long, value_name = "FILE")]
    pub ticks: PathBuf,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override capital from config
    #[arg(long, value_name = "AMOUNT")]
    pub capital: Option<f64>,

    /// Override lookback from config
    #[arg(long, value_name = "N")]
    pub lookback: Option<usize>,
}

/// Risk check
#[derive(Parser, Debug)]
pub struct RiskCmd {
    /// Reported 95% VaR in quote currency
    #[arg(long, value_name = "AMOUNT", required_unless_present = "returns")]
    pub var95: Option<f64>,

    /// JSON array of historical returns; VaR95 = historical loss * exposure
    #[arg(long, value_name = "FILE", conflicts_with = "var95")]
    pub returns: Option<PathBuf>,

    /// Current exposure in quote currency
    #[arg(long, value_name = "AMOUNT", default_value = "0")]
    pub exposure: f64,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Portfolio weights
#[derive(Parser, Debug)]
pub struct WeightsCmd {
    /// JSON array of return series, one per asset
    #[arg(short, long, value_name = "FILE")]
    pub returns: PathBuf,
}

/// Synthetic ticks
#[derive(Parser, Debug)]
pub struct SimulateCmd {
    /// Comma-separated symbols
    #[arg(short, long, value_delimiter = ',', default_value = "BTC,ETH")]
    pub symbols: Vec<String>,

    /// Number of ticks to emit
    #[arg(short = 'n', long, default_value = "1000")]
    pub count: usize,

    /// RNG seed
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Starting price for every symbol
    #[arg(long, default_value = "100.0")]
    pub start: f64,

    /// Per-tick log return standard deviation
    #[arg(long, default_value = "0.002")]
    pub vol: f64,
}

/// Volatility regime report
#[derive(Parser, Debug)]
pub struct VolatilityCmd {
    /// JSON-lines tick file ("-" for stdin)
    #[arg(short, long, value_name = "FILE")]
    pub ticks: PathBuf,

    /// Short horizon in ticks
    #[arg(long, default_value = "20")]
    pub short: usize,

    /// Long horizon in ticks
    #[arg(long, default_value = "100")]
    pub long: usize,
}
