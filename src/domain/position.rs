use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Interpretation of a net position's sign. Never stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionState {
    Flat,
    Long,
    Short,
}

impl PositionState {
    pub fn of(position: i64) -> Self {
        match position {
            0 => PositionState::Flat,
            p if p > 0 => PositionState::Long,
            _ => PositionState::Short,
        }
    }

    /// FLAT or SHORT, the states a BUY may fire from
    pub fn can_buy(&self) -> bool {
        !matches!(self, PositionState::Long)
    }

    /// FLAT or LONG, the states a SELL may fire from
    pub fn can_sell(&self) -> bool {
        !matches!(self, PositionState::Short)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PositionError {
    #[error("Position overflow for {symbol}: {position} + {delta} does not fit in i64")]
    Overflow {
        symbol: String,
        position: i64,
        delta: i64,
    },
}

/// Add a signed delta to a net position, failing loudly instead of
/// wrapping or saturating. Magnitude is otherwise unbounded: repeated
/// same-side signals keep accumulating.
pub fn apply_delta(symbol: &str, position: i64, delta: i64) -> Result<i64, PositionError> {
    position.checked_add(delta).ok_or_else(|| PositionError::Overflow {
        symbol: symbol.to_string(),
        position,
        delta,
    })
}
