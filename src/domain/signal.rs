use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of an emitted signal. "No signal" is never a variant here;
/// it is the absence of a `Signal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalAction {
    Buy,
    Sell,
}

impl SignalAction {
    /// Sign applied to the position when this action fills
    pub fn direction(&self) -> i64 {
        match self {
            SignalAction::Buy => 1,
            SignalAction::Sell => -1,
        }
    }
}

impl fmt::Display for SignalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalAction::Buy => write!(f, "BUY"),
            SignalAction::Sell => write!(f, "SELL"),
        }
    }
}

/// Band values observed when the signal fired
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalMetadata {
    pub mean: f64,
    pub z_score: f64,
    pub std_dev: f64,
    pub upper_band: f64,
    pub lower_band: f64,
}

/// Trading signal emitted by the band generator. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub symbol: String,
    pub action: SignalAction,
    /// Units to trade, always positive
    pub size: f64,
    /// Price of the tick that triggered the signal
    pub price: f64,
    /// Confidence in [0, 1]
    pub confidence: f64,
    pub timestamp: u64,
    pub metadata: SignalMetadata,
}

impl Signal {
    /// Validates the signal meets basic criteria
    pub fn validate(&self) -> Result<(), String> {
        if self.confidence.is_nan() || self.confidence < 0.0 || self.confidence > 1.0 {
            return Err(format!("Invalid confidence value: {}", self.confidence));
        }
        if !(self.size > 0.0) {
            return Err(format!("Invalid size: {}", self.size));
        }
        if !self.metadata.z_score.is_finite() {
            return Err("Z-score must be finite".to_string());
        }
        Ok(())
    }
}
