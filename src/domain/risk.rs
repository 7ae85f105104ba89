//! Risk Gate
//!
//! Stateless VaR check that decides whether trading may continue. The gate
//! only reports a verdict; halting the tick stream is the host's decision.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default VaR limit as a fraction of capital (2%)
pub const DEFAULT_VAR_LIMIT_PCT: f64 = 0.02;

/// Minimum observations before a historical VaR is reported
pub const MIN_VAR_OBSERVATIONS: usize = 30;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RiskViolation {
    #[error("VaR ${var95:.2} exceeds limit ${limit:.2}")]
    VarLimitExceeded { var95: f64, limit: f64 },

    #[error("VaR is not a finite number: {0}")]
    NonFiniteVar(f64),
}

/// Allow/halt decision derived purely from the check's inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RiskVerdict {
    Allow,
    Halt { var95: f64, limit: f64 },
}

impl RiskVerdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RiskVerdict::Allow)
    }

    /// Reason for a halt, if any
    pub fn violation(&self) -> Option<RiskViolation> {
        match *self {
            RiskVerdict::Allow => None,
            RiskVerdict::Halt { var95, .. } if !var95.is_finite() => {
                Some(RiskViolation::NonFiniteVar(var95))
            }
            RiskVerdict::Halt { var95, limit } => {
                Some(RiskViolation::VarLimitExceeded { var95, limit })
            }
        }
    }
}

pub trait RiskCheck {
    fn check(&self, var95: f64, exposure: f64) -> RiskVerdict;
}

/// Capital-relative VaR limit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskGate {
    capital: f64,
    var_limit_pct: f64,
}

impl RiskGate {
    pub fn new(capital: f64, var_limit_pct: f64) -> Self {
        Self {
            capital,
            var_limit_pct,
        }
    }

    /// Largest VaR that is still allowed
    pub fn limit(&self) -> f64 {
        self.capital * self.var_limit_pct
    }
}

impl RiskCheck for RiskGate {
    /// Halts when `var95` is strictly above the limit. A non-finite VaR
    /// also halts.
    ///
    /// `exposure` is part of the host-facing signature but does not enter
    /// the decision.
    fn check(&self, var95: f64, _exposure: f64) -> RiskVerdict {
        let limit = self.limit();
        if !var95.is_finite() || var95 > limit {
            return RiskVerdict::Halt { var95, limit };
        }
        RiskVerdict::Allow
    }
}

/// Historical 95% VaR as a positive loss fraction.
///
/// Takes the 5th-percentile return; with fewer than
/// `MIN_VAR_OBSERVATIONS` finite returns there is not enough history and
/// the result is 0.0. Gains at the 5th percentile also report 0.0.
pub fn historical_var95(returns: &[f64]) -> f64 {
    let mut sorted: Vec<f64> = returns.iter().copied().filter(|r| r.is_finite()).collect();
    if sorted.len() < MIN_VAR_OBSERVATIONS {
        return 0.0;
    }
    sorted.sort_by(f64::total_cmp);
    let idx = (sorted.len() as f64 * 0.05) as usize;
    let quantile = sorted[idx.min(sorted.len() - 1)];
    (-quantile).max(0.0)
}
