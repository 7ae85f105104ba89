//! Volatility Regime Detection
//!
//! Realized volatility from log returns and a short/long volatility ratio
//! classifier. Mean reversion bands behave very differently in a
//! high-volatility regime, so hosts use this to annotate replays.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::fmt;

/// Trading days per year used for annualisation
pub const TRADING_DAYS: f64 = 252.0;

/// Ratio above which short-term volatility counts as elevated
pub const HIGH_VOL_RATIO: f64 = 1.5;

/// Ratio below which short-term volatility counts as compressed
pub const LOW_VOL_RATIO: f64 = 0.5;

/// Annualised realized volatility of a price series.
///
/// Population standard deviation of log returns times sqrt(252). Returns
/// 0.0 for fewer than two prices or when any price is not strictly
/// positive and finite.
pub fn realized_volatility(prices: &[f64]) -> f64 {
    if prices.len() < 2 || prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
        return 0.0;
    }
    let log_returns: Vec<f64> = prices.windows(2).map(|w| (w[1] / w[0]).ln()).collect();
    log_returns.iter().population_std_dev() * TRADING_DAYS.sqrt()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolatilityRegime {
    High,
    Normal,
    Low,
}

impl VolatilityRegime {
    /// Classify by the ratio of short- to long-horizon volatility.
    /// A non-positive long volatility is treated as a neutral ratio of 1.
    pub fn detect(short_vol: f64, long_vol: f64) -> Self {
        let ratio = if long_vol > 0.0 { short_vol / long_vol } else { 1.0 };
        if ratio > HIGH_VOL_RATIO {
            VolatilityRegime::High
        } else if ratio < LOW_VOL_RATIO {
            VolatilityRegime::Low
        } else {
            VolatilityRegime::Normal
        }
    }
}

impl fmt::Display for VolatilityRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolatilityRegime::High => write!(f, "HIGH_VOL"),
            VolatilityRegime::Normal => write!(f, "NORMAL"),
            VolatilityRegime::Low => write!(f, "LOW_VOL"),
        }
    }
}
