//! CLI Adapter
//!
//! Command-line interface for the LocoHFT engine.
//! Uses clap derive macros for argument parsing.

mod commands;

pub use commands::{CliApp, Command, ReplayCmd, RiskCmd, SimulateCmd, VolatilityCmd, WeightsCmd};
