//! Adapters Layer - Host-side I/O around the engine
//!
//! - `cli`: clap command definitions
//! - `tick_file`: JSON-lines tick reader/writer
//! - `simulator`: seeded synthetic tick stream

pub mod cli;
pub mod simulator;
pub mod tick_file;

pub use simulator::{SimulatorConfig, TickSimulator};
pub use tick_file::{write_tick, TickFileError, TickReader};
