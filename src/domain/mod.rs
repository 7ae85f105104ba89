//! Domain Layer - Core types for the band reversion engine
//!
//! Pure domain types with no I/O:
//! - `tick`: incoming price updates
//! - `signal`: emitted BUY/SELL signals
//! - `position`: net position sign interpretation and overflow-checked updates
//! - `risk`: stateless VaR risk gate
//! - `portfolio`: paper fills with average-cost PnL

pub mod portfolio;
pub mod position;
pub mod risk;
pub mod signal;
pub mod tick;

pub use portfolio::{Fill, Holding, PaperPortfolio};
pub use position::{apply_delta, PositionError, PositionState};
pub use risk::{historical_var95, RiskCheck, RiskGate, RiskVerdict, RiskViolation, DEFAULT_VAR_LIMIT_PCT};
pub use signal::{Signal, SignalAction, SignalMetadata};
pub use tick::{PriceTick, TickError};
