//! Application Layer - Engine wiring
//!
//! Owns per-symbol state and routes ticks through the strategy layer.

pub mod engine;

pub use engine::{EngineError, ReversionEngine, TickOutcome};
