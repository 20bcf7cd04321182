//! Return series container for ARMA–GARCH models.
//!
//! Purpose
//! -------
//! Validate a (transformed) return series once at the boundary of the
//! volatility stack and cache the sample moments the parameter maps use as
//! their natural scale.
//!
//! Invariants & assumptions
//! ------------------------
//! - Non-empty, every value finite.
//! - Sample variance strictly positive, so `scale > 0` and the ω map is
//!   well-defined.
//! - Values are never rescaled; `scale` only conditions the optimizer.
use crate::volatility::errors::{VolError, VolResult};
use ndarray::Array1;

/// Validated return series plus its sample mean and standard deviation.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    pub data: Array1<f64>,
    mean: f64,
    variance: f64,
}

impl ReturnSeries {
    /// Validate `data` and cache its moments.
    ///
    /// # Errors
    /// - `SeriesTooShort` when fewer than two observations are given.
    /// - `NonFiniteData` at the first NaN/±inf.
    /// - `DegenerateSeries` when all values are equal.
    pub fn new(data: Array1<f64>) -> VolResult<Self> {
        if data.len() < 2 {
            return Err(VolError::SeriesTooShort { len: data.len(), required: 2 });
        }
        if let Some((index, &value)) = data.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(VolError::NonFiniteData { index, value });
        }
        let n = data.len() as f64;
        let mean = data.sum() / n;
        let variance = data.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n;
        if !(variance > 0.0) {
            return Err(VolError::DegenerateSeries);
        }
        Ok(ReturnSeries { data, mean, variance })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population variance `(1/n) Σ (y − ȳ)²`.
    pub fn variance(&self) -> f64 {
        self.variance
    }

    pub fn scale(&self) -> f64 {
        self.variance.sqrt()
    }
}
