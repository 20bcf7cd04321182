//! Bounds on the conditional variance recursion.
//!
//! Each σ²_t is clamped into `[min, max]` before it enters the likelihood or
//! a forecast, so a wild optimizer iterate cannot produce `ln 0` or overflow.
use crate::volatility::errors::{VolError, VolResult};
use serde::{Deserialize, Serialize};

/// Lower/upper bounds for σ²_t; `0 < min < max`, both finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VarianceGuards {
    pub min: f64,
    pub max: f64,
}

impl VarianceGuards {
    /// # Errors
    /// `InvalidVarianceGuards` when the pair violates `0 < min < max` or is
    /// not finite.
    pub fn new(value: (f64, f64)) -> VolResult<Self> {
        let (min, max) = value;
        if min >= max {
            return Err(VolError::InvalidVarianceGuards {
                min,
                max,
                reason: "Variance guards must have min < max.",
            });
        }
        if !min.is_finite() || !max.is_finite() {
            return Err(VolError::InvalidVarianceGuards {
                min,
                max,
                reason: "Variance guards must be finite.",
            });
        }
        if min <= 0.0 {
            return Err(VolError::InvalidVarianceGuards {
                min,
                max,
                reason: "Variance guards must be strictly positive.",
            });
        }
        Ok(VarianceGuards { min, max })
    }

    /// Re-check a deserialized value.
    pub fn validate(&self) -> VolResult<()> {
        VarianceGuards::new((self.min, self.max)).map(|_| ())
    }

    pub fn clamp(&self, sigma2: f64) -> f64 {
        sigma2.clamp(self.min, self.max)
    }
}

impl Default for VarianceGuards {
    fn default() -> Self {
        VarianceGuards { min: 1e-12, max: 1e6 }
    }
}
