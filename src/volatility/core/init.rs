//! Pre-sample seeding of the variance recursion.
//!
//! Before the first observation the recursion needs `q` lagged ε² values and
//! `p` lagged σ² values. All of them are set to one scalar chosen by
//! [`VarianceInit`]. Pre-sample mean lags are not configurable: lagged
//! `y − μ` and lagged shocks start at zero.
use crate::volatility::errors::{VolError, VolResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum VarianceInit {
    /// Mean of the in-sample squared residuals at the current parameters.
    #[default]
    SampleVariance,
    /// `ω / (1 − Σα − Σβ)` at the current parameters.
    Unconditional,
    /// A fixed positive value.
    Fixed(f64),
}

impl VarianceInit {
    /// # Errors
    /// `InvalidInitFixed` unless `value` is finite and > 0.
    pub fn fixed(value: f64) -> VolResult<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(VolError::InvalidInitFixed { value });
        }
        Ok(VarianceInit::Fixed(value))
    }

    pub fn validate(&self) -> VolResult<()> {
        match *self {
            VarianceInit::Fixed(value) => VarianceInit::fixed(value).map(|_| ()),
            _ => Ok(()),
        }
    }

    /// Seed value given the current residual sum of squares and the
    /// unconditional variance.
    pub fn seed(&self, mean_sq_resid: f64, uncond_variance: f64) -> f64 {
        match *self {
            VarianceInit::SampleVariance => mean_sq_resid,
            VarianceInit::Unconditional => uncond_variance,
            VarianceInit::Fixed(value) => value,
        }
    }
}
