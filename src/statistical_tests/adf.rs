//! Augmented Dickey–Fuller unit-root test (constant, no trend).
//!
//! Purpose
//! -------
//! Test `H0: unit root` against a stationary alternative through
//!
//! ```text
//! Δy_t = c + γ y_{t−1} + Σ_{i=1}^{k} δ_i Δy_{t−i} + e_t,
//! ```
//!
//! with statistic `τ = γ̂ / se(γ̂)`.
//!
//! Key behaviors
//! -------------
//! - Default lag `k = trunc((n − 1)^{1/3})`.
//! - OLS through `nalgebra`; a singular design surfaces as
//!   `TestError::SingularRegression`.
//! - p-values from MacKinnon's (1994) response surface for the constant-only
//!   regression with one series; continuous in `τ`, clamped to 0 and 1 outside
//!   `[-18.83, 2.74]`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `n ≥ k + 6` so the regression keeps at least three residual degrees of
//!   freedom.
//! - Small p-values reject the unit root.
use crate::statistical_tests::{
    errors::{TestError, TestResult},
    validation::validate_series,
};
use nalgebra::{DMatrix, DVector};
use statrs::distribution::{ContinuousCDF, Normal};

// MacKinnon (1994) response surface, regression "c", N = 1.
const TAU_MAX: f64 = 2.74;
const TAU_MIN: f64 = -18.83;
const TAU_STAR: f64 = -1.61;
const SMALL_P: [f64; 3] = [2.1659, 1.4412, 0.038269];
const LARGE_P: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AdfOutcome {
    stat: f64,
    p_value: f64,
    lag: usize,
    nobs: usize,
}

impl AdfOutcome {
    /// Run the test with `lag` augmentation terms, or the default rule when
    /// `None`.
    ///
    /// # Errors
    /// - Validation errors (finite data, `n ≥ k + 6`).
    /// - `SingularRegression` when `X'X` cannot be inverted or the residual
    ///   variance is zero.
    pub fn adf(data: &[f64], lag: Option<usize>) -> TestResult<Self> {
        let n = data.len();
        let k = lag.unwrap_or_else(|| default_lag(n));
        validate_series(data, k + 6)?;

        let dy: Vec<f64> = data.windows(2).map(|w| w[1] - w[0]).collect();
        let nobs = dy.len() - k;
        let ncols = 2 + k;

        // Row r regresses dy[k + r] on (1, y[k + r], dy[k + r - 1], ..., dy[r]).
        let design = DMatrix::<f64>::from_fn(nobs, ncols, |r, c| {
            let t = k + r;
            match c {
                0 => 1.0,
                1 => data[t],
                _ => dy[t - (c - 1)],
            }
        });
        let response = DVector::<f64>::from_fn(nobs, |r, _| dy[k + r]);

        let xtx = design.transpose() * &design;
        let xtx_inv = xtx.try_inverse().ok_or(TestError::SingularRegression)?;
        let beta = &xtx_inv * (design.transpose() * &response);
        let resid = &response - &design * &beta;
        let s2 = resid.dot(&resid) / (nobs - ncols) as f64;
        let se_gamma = (s2 * xtx_inv[(1, 1)]).sqrt();
        if !(se_gamma.is_finite() && se_gamma > 0.0) {
            return Err(TestError::SingularRegression);
        }
        let stat = beta[1] / se_gamma;

        Ok(Self { stat, p_value: mackinnon_p_value(stat)?, lag: k, nobs })
    }

    pub fn stat(&self) -> f64 {
        self.stat
    }

    pub fn p_value(&self) -> f64 {
        self.p_value
    }

    pub fn lag(&self) -> usize {
        self.lag
    }

    /// Observations used in the test regression.
    pub fn nobs(&self) -> usize {
        self.nobs
    }
}

/// `trunc((n − 1)^{1/3})`.
pub fn default_lag(n: usize) -> usize {
    (n.saturating_sub(1) as f64).cbrt().trunc() as usize
}

/// Approximate asymptotic p-value of a constant-only ADF statistic.
///
/// # Errors
/// `TestError::Distribution` if the standard normal cannot be built.
pub fn mackinnon_p_value(tau: f64) -> TestResult<f64> {
    if tau > TAU_MAX {
        return Ok(1.0);
    }
    if tau < TAU_MIN {
        return Ok(0.0);
    }
    let z = if tau <= TAU_STAR {
        SMALL_P[0] + SMALL_P[1] * tau + SMALL_P[2] * tau * tau
    } else {
        LARGE_P[0] + LARGE_P[1] * tau + LARGE_P[2] * tau * tau + LARGE_P[3] * tau.powi(3)
    };
    let normal = Normal::new(0.0, 1.0).map_err(|e| TestError::Distribution(e.to_string()))?;
    Ok(normal.cdf(z))
}
