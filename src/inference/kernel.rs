//! Kernel tapers and plug-in bandwidths for long-run variance estimation.
//!
//! The KPSS statistic divides by a long-run variance estimate of the
//! demeaned series; this module supplies the taper `w(x)` (with
//! `x = k/(L+1)`) and Andrews' (1991) AR(1) plug-in bandwidth `L`.
//!
//! Conventions:
//! - Input matrices are `n×p` (rows = time).
//! - The plug-in fits an AR(1) to each column with the `arima` crate; when
//!   that fails or the fit is too close to a unit root it falls back to
//!   `round(n^{1/4})`.
use crate::{
    inference::errors::{InferenceError, InferenceResult},
    optimization::numerical_stability::transformations::{GENERAL_TOL, STATIONARITY_MARGIN},
};
use arima::estimate;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Taper family.
///
/// - `IID`: weight 1 at lag 0 only.
/// - `Bartlett`: triangular (Newey–West); the KPSS default.
/// - `Parzen`: cubic taper with compact support.
/// - `QuadraticSpectral`: infinite support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KernelType {
    IID,
    Bartlett,
    Parzen,
    QuadraticSpectral,
}

impl KernelType {
    /// Kernel weight at `input`, usually `k/(L+1)`.
    pub fn weight(&self, input: f64) -> f64 {
        let x = input.abs();
        match self {
            KernelType::IID => {
                if input == 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            KernelType::Bartlett => {
                if x <= 1.0 {
                    1.0 - x
                } else {
                    0.0
                }
            }
            KernelType::Parzen => {
                if x <= 0.5 {
                    1.0 - 6.0 * x * x + 6.0 * x * x * x
                } else if x <= 1.0 {
                    2.0 * (1.0 - x).powi(3)
                } else {
                    0.0
                }
            }
            KernelType::QuadraticSpectral => {
                if input == 0.0 {
                    1.0
                } else {
                    let pi_x = std::f64::consts::PI * input;
                    let z = 6.0 * pi_x / 5.0;
                    (25.0 / (12.0 * pi_x * pi_x)) * (z.sin() / z - z.cos())
                }
            }
        }
    }

    /// Andrews plug-in bandwidth for this kernel.
    ///
    /// - `Bartlett`: `1.1447 (n α(1))^{1/3}`.
    /// - `Parzen`: `2.6614 (n α(2))^{1/5}`.
    /// - `QuadraticSpectral`: `1.3221 (n α(2))^{1/5}`.
    /// - `IID`: `0`.
    ///
    /// Callers truncate the result to `n - 1`.
    pub fn optimal_bandwidth(&self, series_mat: &Array2<f64>) -> usize {
        let n = series_mat.nrows() as f64;
        let fallback = n.powf(0.25).round() as usize;
        let (ord, constant, power) = match self {
            KernelType::IID => return 0,
            KernelType::Bartlett => (1, 1.1447, 1.0 / 3.0),
            KernelType::Parzen => (2, 2.6614, 0.2),
            KernelType::QuadraticSpectral => (2, 1.3221, 0.2),
        };
        match calc_opt_bandwidth_param(series_mat, ord) {
            Ok(alpha) => (constant * (n * alpha).powf(power)).round() as usize,
            Err(err) => {
                tracing::debug!(%err, fallback, "plug-in bandwidth failed, using n^(1/4)");
                fallback
            }
        }
    }
}

/// Andrews `α(q)` aggregated over columns from per-column AR(1) fits.
///
/// # Errors
/// - `StationarityViolated` when `|φ| ≥ 1 - STATIONARITY_MARGIN`.
/// - `OrderNotSupported` for `q ∉ {1, 2}`.
/// - `DenominatorTooSmall` when the pooled denominator is below `GENERAL_TOL`.
/// - `Anyhow` for failures inside the `arima` crate.
fn calc_opt_bandwidth_param(series_mat: &Array2<f64>, ord: usize) -> InferenceResult<f64> {
    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for col in series_mat.columns() {
        let col_vec = col.to_vec();
        let coeff = estimate::fit(&col_vec, 1, 0, 0)?;
        let (intercept, phi) = (coeff[0], coeff[1]);
        if phi.abs() >= 1.0 - STATIONARITY_MARGIN {
            return Err(InferenceError::StationarityViolated { phi });
        }
        let residuals = estimate::residuals(&col_vec, intercept, Some(&coeff[1..2]), None)?;
        let sigma2 =
            residuals.iter().map(|&e| e * e).sum::<f64>() / ((residuals.len().max(2) - 1) as f64);
        let sigma4 = sigma2 * sigma2;
        let phi2 = phi * phi;
        denominator += sigma4 / (1.0 - phi2).powi(4);
        numerator += match ord {
            1 => 4.0 * phi2 * sigma4 / ((1.0 - phi).powi(6) * (1.0 + phi).powi(2)),
            2 => 4.0 * phi2 * sigma4 / (1.0 - phi).powi(8),
            _ => return Err(InferenceError::OrderNotSupported { ord }),
        };
    }
    if denominator < GENERAL_TOL {
        return Err(InferenceError::DenominatorTooSmall { denominator });
    }
    Ok(numerator / denominator)
}
