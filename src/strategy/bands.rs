//! Band Statistics
//!
//! Bollinger-style bands over a full price window:
//!
//! mean      = sum(p) / N
//! std_dev   = sqrt(sum((p - mean)^2) / N)      (population variance)
//! upper     = mean + k * std_dev
//! lower     = mean - k * std_dev
//! z(price)  = (price - mean) / std_dev
//!
//! Statistics are derived fresh from the window on every call and never
//! cached, since the window mutates on every tick.

use serde::{Deserialize, Serialize};

use crate::strategy::window::PriceWindow;

/// Derived band values for one window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandStatistics {
    pub mean: f64,
    pub std_dev: f64,
    pub upper_band: f64,
    pub lower_band: f64,
}

impl BandStatistics {
    /// Standardised distance of `price` from the mean. Only constructed
    /// with a non-zero standard deviation, so this is always finite for
    /// finite prices.
    pub fn z_score(&self, price: f64) -> f64 {
        (price - self.mean) / self.std_dev
    }

    pub fn is_below_lower(&self, price: f64) -> bool {
        price < self.lower_band
    }

    pub fn is_above_upper(&self, price: f64) -> bool {
        price > self.upper_band
    }

    /// Band width as a fraction of the mean
    pub fn bandwidth(&self) -> f64 {
        (self.upper_band - self.lower_band) / self.mean
    }
}

/// Result of evaluating a window
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BandOutcome {
    /// Fewer than `need` prices accumulated; the normal state for a new symbol
    Insufficient { have: usize, need: usize },
    /// All prices identical, z-score undefined
    Degenerate { mean: f64 },
    Ready(BandStatistics),
}

impl BandOutcome {
    pub fn stats(&self) -> Option<&BandStatistics> {
        match self {
            BandOutcome::Ready(stats) => Some(stats),
            _ => None,
        }
    }
}

/// Compute bands over `window` with half-width `band_width` standard deviations
pub fn compute(window: &PriceWindow, band_width: f64) -> BandOutcome {
    if !window.is_ready() {
        return BandOutcome::Insufficient {
            have: window.len(),
            need: window.capacity(),
        };
    }

    // Zero variance means every price is identical; tested on the prices
    // since the summed mean of inexact values like 0.1 is not exact.
    if let Some(price) = constant_price(window) {
        return BandOutcome::Degenerate { mean: price };
    }

    let mean = rolling_mean(window);
    let std_dev = rolling_std(window, mean);

    if !(std_dev > 0.0) {
        return BandOutcome::Degenerate { mean };
    }

    BandOutcome::Ready(BandStatistics {
        mean,
        std_dev,
        upper_band: mean + band_width * std_dev,
        lower_band: mean - band_width * std_dev,
    })
}

fn constant_price(window: &PriceWindow) -> Option<f64> {
    let mut prices = window.iter();
    let first = prices.next()?;
    prices.all(|price| price == first).then_some(first)
}

fn rolling_mean(window: &PriceWindow) -> f64 {
    let sum: f64 = window.iter().sum();
    sum / window.len() as f64
}

fn rolling_std(window: &PriceWindow, mean: f64) -> f64 {
    let variance: f64 = window
        .iter()
        .map(|price| {
            let diff = price - mean;
            diff * diff
        })
        .sum::<f64>()
        / window.len() as f64;

    variance.sqrt()
}
