//! Equal-weight portfolio fallback, used when no richer allocation
//! (risk parity, optimisation) is available.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WeightError {
    #[error("Cannot allocate across zero assets")]
    EmptyUniverse,
}

/// `n` weights of `1/n` each
pub fn equal_weights(n: usize) -> Result<Vec<f64>, WeightError> {
    if n == 0 {
        return Err(WeightError::EmptyUniverse);
    }
    Ok(vec![1.0 / n as f64; n])
}

/// Equal weights over the series of a returns matrix; the outer length
/// decides the asset count and the series themselves are not inspected.
pub fn fallback_weights<T>(returns: &[T]) -> Result<Vec<f64>, WeightError> {
    equal_weights(returns.len())
}
