//! LocoHFT - Band Mean Reversion Signal Engine
//!
//! Stateful per-symbol Bollinger-band mean reversion: rolling price
//! windows, band statistics, BUY/SELL signals with position bookkeeping,
//! and a stateless VaR risk gate.
//!
//! # Modules
//!
//! - `domain`: Core types (PriceTick, Signal, PositionState, RiskGate)
//! - `strategy`: Window, band statistics, signal generator, weight fallback, regimes
//! - `application`: The `ReversionEngine` that owns per-symbol state
//! - `adapters`: CLI, tick files and the synthetic tick source
//! - `config`: Configuration loading and validation

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod strategy;

pub use application::{EngineError, ReversionEngine, TickOutcome};
pub use domain::{PriceTick, RiskVerdict, Signal, SignalAction};
pub use strategy::{EngineConfig, StrategyConfig};
