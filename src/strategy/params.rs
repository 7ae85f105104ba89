//! Strategy Parameters
//!
//! Construction-time configuration for the band reversion engine.
//! Defaults reproduce the reference behaviour: 20-tick lookback, 2-sigma
//! bands, 100-unit signals at 0.8 confidence and a 2% VaR limit.

use serde::{Deserialize, Serialize};

use crate::domain::risk::DEFAULT_VAR_LIMIT_PCT;

pub const DEFAULT_CAPITAL: f64 = 100_000.0;
pub const DEFAULT_LOOKBACK: usize = 20;
pub const DEFAULT_BAND_WIDTH: f64 = 2.0;
pub const DEFAULT_ORDER_SIZE: u32 = 100;
pub const DEFAULT_CONFIDENCE: f64 = 0.8;

/// Signal generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Number of most recent prices kept per symbol
    pub lookback: usize,
    /// Band half-width in standard deviations
    pub band_width: f64,
    /// Fixed units per signal, independent of the current position
    pub order_size: u32,
    /// Confidence attached to every emitted signal
    pub confidence: f64,
    /// VaR limit as a fraction of capital
    pub var_limit_pct: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            lookback: DEFAULT_LOOKBACK,
            band_width: DEFAULT_BAND_WIDTH,
            order_size: DEFAULT_ORDER_SIZE,
            confidence: DEFAULT_CONFIDENCE,
            var_limit_pct: DEFAULT_VAR_LIMIT_PCT,
        }
    }
}

impl StrategyConfig {
    pub fn with_lookback(mut self, lookback: usize) -> Self {
        self.lookback = lookback;
        self
    }

    pub fn with_band_width(mut self, band_width: f64) -> Self {
        self.band_width = band_width;
        self
    }

    pub fn with_order_size(mut self, order_size: u32) -> Self {
        self.order_size = order_size;
        self
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookback == 0 {
            return Err(ConfigError::InvalidLookback(self.lookback));
        }
        if !self.band_width.is_finite() || self.band_width <= 0.0 {
            return Err(ConfigError::InvalidBandWidth(self.band_width));
        }
        if self.order_size == 0 {
            return Err(ConfigError::InvalidOrderSize(self.order_size));
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(ConfigError::InvalidConfidence(self.confidence));
        }
        if !(self.var_limit_pct > 0.0 && self.var_limit_pct <= 1.0) {
            return Err(ConfigError::InvalidVarLimit(self.var_limit_pct));
        }
        Ok(())
    }
}

/// Engine-wide settings, fixed for the lifetime of an engine instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub capital: f64,
    pub strategy: StrategyConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            capital: DEFAULT_CAPITAL,
            strategy: StrategyConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn new(capital: f64, lookback: usize) -> Self {
        Self {
            capital,
            strategy: StrategyConfig::default().with_lookback(lookback),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.capital.is_finite() || self.capital <= 0.0 {
            return Err(ConfigError::InvalidCapital(self.capital));
        }
        self.strategy.validate()
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid capital: {0} (must be finite and > 0)")]
    InvalidCapital(f64),
    #[error("Invalid lookback: {0} (minimum 1)")]
    InvalidLookback(usize),
    #[error("Invalid band width: {0} (must be finite and > 0)")]
    InvalidBandWidth(f64),
    #[error("Invalid order size: {0} (must be > 0)")]
    InvalidOrderSize(u32),
    #[error("Invalid confidence: {0} (must be 0-1)")]
    InvalidConfidence(f64),
    #[error("Invalid VaR limit: {0} (must be 0 < pct <= 1)")]
    InvalidVarLimit(f64),
}
