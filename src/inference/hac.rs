//! inference::hac: kernel-weighted long-run (co)variance.
//!
//! Purpose
//! -------
//! Estimate the long-run covariance of a (possibly multivariate) series,
//!
//! ```text
//! S  =  Γ₀  +  Σ_{k=1}^{L} w_k ( Γ_k + Γ_kᵀ ),
//! Γ₀ = (1/n) XᵀX,     Γ_k = c_k · X_{k:}ᵀ X_{:n−k},
//! ```
//!
//! with `c_k = 1/n` (plain Newey–West) or `c_k = 1/(n−k)` when the
//! small-sample correction is on. The KPSS test uses the scalar case with a
//! Bartlett taper on the demeaned series.
//!
//! Invariants & assumptions
//! ------------------------
//! - `L` is truncated to `n − 1`.
//! - A plug-in bandwidth is computed on the same (centered, if requested)
//!   series that is aggregated.
//! - Empty input is an error rather than a panic.
use crate::inference::{
    errors::{InferenceError, InferenceResult},
    kernel::KernelType,
};
use ndarray::{Array2, Axis, s};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Configuration for [`long_run_covariance`].
///
/// `bandwidth = None` selects [`KernelType::optimal_bandwidth`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HACOptions {
    pub kernel: KernelType,
    pub bandwidth: Option<usize>,
    pub center: bool,
    pub small_sample_correction: bool,
}

impl HACOptions {
    pub fn new(
        bandwidth: Option<usize>, kernel: KernelType, center: bool, small_sample_correction: bool,
    ) -> HACOptions {
        HACOptions { bandwidth, kernel, center, small_sample_correction }
    }
}

impl Default for HACOptions {
    /// Bartlett, plug-in bandwidth, centered, `c_k = 1/n`: the textbook KPSS
    /// long-run variance.
    fn default() -> Self {
        Self {
            bandwidth: None,
            kernel: KernelType::Bartlett,
            center: true,
            small_sample_correction: false,
        }
    }
}

/// Long-run covariance `S` (`p×p`) of an `n×p` series, plus the bandwidth used.
///
/// # Errors
/// `InferenceError::EmptySeries` when `n == 0`.
pub fn long_run_covariance(
    hac_opts: &HACOptions, raw_series: &Array2<f64>,
) -> InferenceResult<(Array2<f64>, usize)> {
    let n = raw_series.nrows();
    let p = raw_series.ncols();
    if n == 0 {
        return Err(InferenceError::EmptySeries);
    }

    let series: Cow<'_, Array2<f64>> = match (hac_opts.center, raw_series.mean_axis(Axis(0))) {
        (true, Some(col_means)) => Cow::Owned(raw_series - &col_means),
        _ => Cow::Borrowed(raw_series),
    };

    let bandwidth = hac_opts
        .bandwidth
        .unwrap_or_else(|| hac_opts.kernel.optimal_bandwidth(series.as_ref()))
        .min(n - 1);

    let mut cov = Array2::<f64>::zeros((p, p));
    for lag in 0..=bandwidth {
        add_lag_component(&mut cov, series.as_ref(), lag, bandwidth, hac_opts);
    }
    Ok((cov, bandwidth))
}

/// Scalar long-run variance of `data`; see [`long_run_covariance`].
pub fn long_run_variance(hac_opts: &HACOptions, data: &[f64]) -> InferenceResult<(f64, usize)> {
    let mat = Array2::from_shape_vec((data.len(), 1), data.to_vec())
        .map_err(|e| InferenceError::Anyhow(e.to_string()))?;
    let (cov, bandwidth) = long_run_covariance(hac_opts, &mat)?;
    Ok((cov[[0, 0]], bandwidth))
}

fn add_lag_component(
    cov: &mut Array2<f64>, series: &Array2<f64>, lag: usize, bandwidth: usize,
    hac_opts: &HACOptions,
) {
    let n = series.nrows();
    if lag == 0 {
        cov.scaled_add(1.0 / n as f64, &series.t().dot(series));
        return;
    }
    let weight = hac_opts.kernel.weight(lag as f64 / (bandwidth + 1) as f64);
    let scale = if hac_opts.small_sample_correction {
        1.0 / (n - lag) as f64
    } else {
        1.0 / n as f64
    };
    let lagged = series.slice(s![lag.., ..]);
    let leading = series.slice(s![..n - lag, ..]);
    let gamma_k = lagged.t().dot(&leading) * scale;
    cov.scaled_add(weight, &gamma_k);
    cov.scaled_add(weight, &gamma_k.t());
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // - Lag-0 reduction to the sample second moment.
    // - Hand-computed Bartlett / Newey–West value on a short series.
    // - Bandwidth truncation and empty input.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // With `L = 0` the estimate is the (centered) sample variance with
    // denominator n.
    //
    // Given
    // -----
    // - Series [1, 2, 3, 4], centered, bandwidth 0.
    //
    // Expect
    // ------
    // - Variance 1.25.
    fn long_run_variance_lag_zero_is_sample_variance() {
        // Arrange
        let opts = HACOptions::new(Some(0), KernelType::Bartlett, true, false);

        // Act
        let (var, bw) = long_run_variance(&opts, &[1.0, 2.0, 3.0, 4.0]).expect("non-empty");

        // Assert
        assert_eq!(bw, 0);
        assert_relative_eq!(var, 1.25, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Bartlett weights with `c_k = 1/n` reproduce the hand-computed
    // Newey–West value used by KPSS.
    //
    // Given
    // -----
    // - e = [1, -1, 2, -2] (mean zero), L = 1, so w_1 = 1/2.
    // - γ0 = 10/4, γ1 = (-1 - 2 - 4)/4 = -7/4.
    //
    // Expect
    // ------
    // - S = 2.5 + 2 · 0.5 · (-1.75) = 0.75.
    fn long_run_variance_matches_hand_computed_newey_west() {
        // Arrange
        let opts = HACOptions::new(Some(1), KernelType::Bartlett, true, false);

        // Act
        let (var, _) = long_run_variance(&opts, &[1.0, -1.0, 2.0, -2.0]).expect("non-empty");

        // Assert
        assert_relative_eq!(var, 0.75, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Requested bandwidths beyond the sample are truncated, the output is
    // symmetric, and an empty series is rejected.
    //
    // Given
    // -----
    // - A 3×2 series with bandwidth 10; an empty 0×1 series.
    //
    // Expect
    // ------
    // - Bandwidth 2, symmetric S; `EmptySeries` for the empty input.
    fn long_run_covariance_truncates_and_rejects_empty() {
        // Arrange
        let mat = array![[0.5, -1.0], [1.0, 0.25], [-0.5, 1.5]];
        let opts = HACOptions::new(Some(10), KernelType::Parzen, true, true);

        // Act
        let (cov, bw) = long_run_covariance(&opts, &mat).expect("non-empty");
        let empty = long_run_covariance(&opts, &Array2::<f64>::zeros((0, 1)));

        // Assert
        assert_eq!(bw, 2);
        assert_relative_eq!(cov[[0, 1]], cov[[1, 0]], epsilon = 1e-12);
        assert_eq!(empty.err(), Some(InferenceError::EmptySeries));
    }
}
