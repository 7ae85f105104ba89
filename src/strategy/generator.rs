//! Band Signal Generator
//!
//! Mean reversion state machine over the sign of the net position:
//!
//! - price < lower band and position FLAT or SHORT  -> BUY  (+order_size)
//! - price > upper band and position FLAT or LONG   -> SELL (-order_size)
//! - otherwise                                      -> no signal
//!
//! The order size is a fixed increment, not position-aware: a BUY from a
//! deep SHORT leaves it short, and repeated ticks below the lower band keep
//! firing BUYs until the position turns LONG. There is no terminal state;
//! a symbol may cycle BUY -> SELL -> BUY indefinitely.

use crate::domain::position::PositionState;
use crate::domain::signal::{Signal, SignalAction, SignalMetadata};
use crate::strategy::bands::BandStatistics;
use crate::strategy::params::StrategyConfig;

/// A decided signal together with the position it leaves behind
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub signal: Signal,
    pub delta: i64,
}

#[derive(Debug, Clone)]
pub struct SignalGenerator {
    order_size: u32,
    confidence: f64,
}

impl SignalGenerator {
    pub fn new(config: &StrategyConfig) -> Self {
        Self {
            order_size: config.order_size,
            confidence: config.confidence,
        }
    }

    /// Decide the action for `price` against `stats` given the current
    /// `position`. BUY is checked before SELL; with a positive standard
    /// deviation the two conditions cannot both hold.
    pub fn decide(&self, stats: &BandStatistics, price: f64, position: i64) -> Option<SignalAction> {
        let state = PositionState::of(position);
        if stats.is_below_lower(price) && state.can_buy() {
            Some(SignalAction::Buy)
        } else if stats.is_above_upper(price) && state.can_sell() {
            Some(SignalAction::Sell)
        } else {
            None
        }
    }

    /// Build the signal for a tick, if any. Does not touch any position;
    /// the caller applies `Decision::delta`.
    pub fn evaluate(
        &self,
        symbol: &str,
        price: f64,
        timestamp: u64,
        stats: &BandStatistics,
        position: i64,
    ) -> Option<Decision> {
        let action = self.decide(stats, price, position)?;
        let signal = Signal {
            symbol: symbol.to_string(),
            action,
            size: f64::from(self.order_size),
            price,
            confidence: self.confidence,
            timestamp,
            metadata: SignalMetadata {
                mean: stats.mean,
                z_score: stats.z_score(price),
                std_dev: stats.std_dev,
                upper_band: stats.upper_band,
                lower_band: stats.lower_band,
            },
        };
        Some(Decision {
            signal,
            delta: action.direction() * i64::from(self.order_size),
        })
    }
}
