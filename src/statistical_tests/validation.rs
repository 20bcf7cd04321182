//! statistical_tests::validation: shared input guards.
//!
//! Every test calls [`validate_series`] before touching the data, and the
//! lag-based tests add [`validate_lag`]. A successful return guarantees a
//! finite series of the required length.
use crate::statistical_tests::errors::{TestError, TestResult};

/// Series has at least `min_len` observations, all finite.
///
/// # Errors
/// - `TestError::InsufficientData` when `data.len() < min_len`.
/// - `TestError::InvalidData` with the first non-finite entry.
pub fn validate_series(data: &[f64], min_len: usize) -> TestResult<()> {
    if data.len() < min_len {
        return Err(TestError::InsufficientData { len: data.len(), required: min_len });
    }
    if let Some((index, &value)) = data.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(TestError::InvalidData { index, value });
    }
    Ok(())
}

/// Lag satisfies `1 ≤ lag < len`.
pub fn validate_lag(lag: usize, len: usize) -> TestResult<()> {
    if lag == 0 || lag >= len {
        return Err(TestError::InvalidLag { lag, len });
    }
    Ok(())
}

/// Sample mean; callers have already validated `data` as non-empty.
pub(crate) fn mean(data: &[f64]) -> f64 {
    data.iter().sum::<f64>() / data.len() as f64
}
