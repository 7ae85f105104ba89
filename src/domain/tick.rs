//! Price Tick
//!
//! A single market data update delivered by the host. Ticks are consumed
//! immediately by the engine and never retained beyond the price window.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TickError {
    #[error("Invalid price: {0} (must be finite and > 0)")]
    InvalidPrice(f64),
    #[error("Invalid volume: {0} (must be finite and >= 0)")]
    InvalidVolume(f64),
}

/// Market data update for one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTick {
    pub symbol: String,
    pub price: f64,
    #[serde(default)]
    pub volume: f64,
    /// Logical clock supplied by the feed, not validated against wall time
    #[serde(default)]
    pub timestamp: u64,
}

impl PriceTick {
    pub fn new(symbol: impl Into<String>, price: f64, volume: f64, timestamp: u64) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            volume,
            timestamp,
        }
    }

    /// Reject prices and volumes the statistics cannot digest
    pub fn validate(&self) -> Result<(), TickError> {
        validate_price(self.price)?;
        validate_volume(self.volume)
    }
}

pub(crate) fn validate_price(price: f64) -> Result<(), TickError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(TickError::InvalidPrice(price));
    }
    Ok(())
}

pub(crate) fn validate_volume(volume: f64) -> Result<(), TickError> {
    if !volume.is_finite() || volume < 0.0 {
        return Err(TickError::InvalidVolume(volume));
    }
    Ok(())
}
