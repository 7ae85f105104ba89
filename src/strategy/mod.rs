//! Strategy Layer - Bollinger-style Mean Reversion
//!
//! Per-symbol building blocks of the tick path:
//! - `window`: bounded FIFO of recent prices
//! - `bands`: mean, population std-dev and bands over a full window
//! - `generator`: BUY/SELL decision from bands and position sign
//!
//! Independently invokable helpers:
//! - `weights`: equal-weight allocation fallback
//! - `regime`: realized volatility and volatility regime classification

pub mod bands;
pub mod generator;
pub mod params;
pub mod regime;
pub mod weights;
pub mod window;

pub use bands::{compute as compute_bands, BandOutcome, BandStatistics};
pub use generator::{Decision, SignalGenerator};
pub use params::{ConfigError, EngineConfig, StrategyConfig};
pub use regime::{realized_volatility, VolatilityRegime};
pub use weights::{equal_weights, fallback_weights, WeightError};
pub use window::PriceWindow;
