//! Automatic ARIMA order search.
//!
//! `d` comes from the stationarity rule of [`determine_difference_order`];
//! `(p, q)` minimize the Gaussian AIC of conditional-sum-of-squares ARMA
//! fits (the `arima` crate) on the differenced series. The winning fit also
//! supplies starting values for the ARMA mean of a GARCH candidate.
use crate::{
    pipeline::{
        errors::{PipelineError, PipelineResult},
        transform::{StationarityOptions, determine_difference_order, difference},
    },
    volatility::core::params::MeanStart,
};
use arima::estimate;
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Search grid for [`auto_select_arima_order`].
///
/// `stationarity` is not read from configuration; the runner copies the
/// pipeline's own stationarity options into it so both searches agree on `d`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArimaSearch {
    pub max_p: usize,
    pub max_q: usize,
    #[serde(skip)]
    pub stationarity: StationarityOptions,
}

impl Default for ArimaSearch {
    fn default() -> Self {
        ArimaSearch { max_p: 3, max_q: 3, stationarity: StationarityOptions::default() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArimaOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
}

impl std::fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ARIMA({},{},{})", self.p, self.d, self.q)
    }
}

/// Conditional-sum-of-squares ARMA(p, q) fit.
#[derive(Debug, Clone, PartialEq)]
pub struct CssFit {
    pub p: usize,
    pub q: usize,
    pub intercept: f64,
    pub ar: Vec<f64>,
    pub ma: Vec<f64>,
    pub sigma2: f64,
    pub aic: f64,
}

impl CssFit {
    /// Mean-equation start `(μ, φ, θ)` with `μ = c / (1 − Σφ)`, falling
    /// back to the sample mean near a unit root.
    pub fn mean_start(&self, sample_mean: f64) -> MeanStart {
        let denom = 1.0 - self.ar.iter().sum::<f64>();
        let mu = if denom.abs() > 1e-3 { self.intercept / denom } else { sample_mean };
        MeanStart { mu, ar: Array1::from(self.ar.clone()), ma: Array1::from(self.ma.clone()) }
    }
}

/// Fit ARMA(p, q) by CSS and score it with
/// `AIC = n ln(2π σ̂²) + n + 2(p + q + 2)`.
///
/// # Errors
/// `ModelFit` when the `arima` crate fails or σ̂² is not positive and
/// finite.
pub fn fit_css(series: ArrayView1<f64>, p: usize, q: usize) -> PipelineResult<CssFit> {
    let label = format!("ARMA({p},{q})");
    let fail = |reason: String| PipelineError::ModelFit { candidate: label.clone(), reason };
    let x = series.to_vec();

    let (intercept, ar, ma, resid) = if p == 0 && q == 0 {
        let mean = x.iter().sum::<f64>() / x.len().max(1) as f64;
        (mean, Vec::new(), Vec::new(), x.iter().map(|v| v - mean).collect::<Vec<f64>>())
    } else {
        let coef = estimate::fit(&x, p, 0, q).map_err(|e| fail(e.to_string()))?;
        if coef.len() != 1 + p + q {
            return Err(fail(format!("expected {} coefficients, got {}", 1 + p + q, coef.len())));
        }
        let ar = coef[1..1 + p].to_vec();
        let ma = coef[1 + p..].to_vec();
        let resid = estimate::residuals(
            &x,
            coef[0],
            (p > 0).then_some(ar.as_slice()),
            (q > 0).then_some(ma.as_slice()),
        )
        .map_err(|e| fail(e.to_string()))?;
        (coef[0], ar, ma, resid)
    };

    let n = resid.len() as f64;
    let sigma2 = resid.iter().map(|e| e * e).sum::<f64>() / n;
    if !(sigma2.is_finite() && sigma2 > 0.0) {
        return Err(fail(format!("residual variance {sigma2} is not positive")));
    }
    let aic = n * (2.0 * PI * sigma2).ln() + n + 2.0 * (p + q + 2) as f64;
    Ok(CssFit { p, q, intercept, ar, ma, sigma2, aic })
}

/// Lowest-AIC ARMA(p, q) over the grid; failed orders are skipped.
///
/// # Errors
/// `ModelFit` when every order fails.
pub fn select_arma(series: ArrayView1<f64>, max_p: usize, max_q: usize) -> PipelineResult<CssFit> {
    let mut best: Option<CssFit> = None;
    for p in 0..=max_p {
        for q in 0..=max_q {
            match fit_css(series, p, q) {
                Ok(fit) => {
                    tracing::debug!(p, q, aic = fit.aic, "ARMA order scored");
                    if best.as_ref().map_or(true, |b| fit.aic < b.aic) {
                        best = Some(fit);
                    }
                }
                Err(err) => tracing::warn!(p, q, %err, "skipping ARMA order"),
            }
        }
    }
    best.ok_or_else(|| PipelineError::ModelFit {
        candidate: format!("ARMA(0..={max_p},0..={max_q})"),
        reason: "no order could be fitted".to_string(),
    })
}

/// Choose `(p, d, q)` for `series` (log levels).
///
/// # Errors
/// Stationarity errors from the `d` search, or `ModelFit` when no ARMA
/// order can be fitted.
pub fn auto_select_arima_order(
    series: ArrayView1<f64>, search: &ArimaSearch,
) -> PipelineResult<ArimaOrder> {
    let d = determine_difference_order(series, &search.stationarity)?;
    let diffed = difference(series, d)?;
    let best = select_arma(diffed.view(), search.max_p, search.max_q)?;
    let order = ArimaOrder { p: best.p, d, q: best.q };
    tracing::info!(%order, aic = best.aic, "selected ARIMA order");
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // The closed-form white-noise fit, the AIC formula and mean starts. The
    // `arima` crate's CSS estimates are not pinned here.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // ARMA(0, 0) is the sample mean with the Gaussian AIC of its residuals.
    //
    // Given
    // -----
    // - x = (1, 3, 1, 3): mean 2, σ̂² = 1, n = 4.
    //
    // Expect
    // ------
    // - intercept 2, AIC = 4 ln(2π) + 4 + 4.
    fn white_noise_fit_closed_form() {
        // Act
        let fit = fit_css(array![1.0, 3.0, 1.0, 3.0].view(), 0, 0).expect("closed form");

        // Assert
        assert_relative_eq!(fit.intercept, 2.0, epsilon = 1e-15);
        assert_relative_eq!(fit.sigma2, 1.0, epsilon = 1e-15);
        assert_relative_eq!(fit.aic, 4.0 * (2.0 * PI).ln() + 8.0, epsilon = 1e-12);
        assert!(fit.ar.is_empty() && fit.ma.is_empty());
    }

    #[test]
    // Purpose
    // -------
    // The mean start divides the intercept by the AR polynomial at one and
    // falls back to the sample mean near a unit root.
    //
    // Given
    // -----
    // - c = 0.3 with φ = 0.4; c = 0.3 with φ = 0.9995.
    //
    // Expect
    // ------
    // - μ = 0.5; μ = sample mean.
    fn mean_start_from_intercept() {
        // Arrange
        let fit = CssFit {
            p: 1,
            q: 0,
            intercept: 0.3,
            ar: vec![0.4],
            ma: vec![],
            sigma2: 1.0,
            aic: 0.0,
        };
        let near_unit = CssFit { ar: vec![0.9995], ..fit.clone() };

        // Act
        let start = fit.mean_start(7.0);
        let fallback = near_unit.mean_start(7.0);

        // Assert
        assert_relative_eq!(start.mu, 0.5, epsilon = 1e-15);
        assert_eq!(start.ar, array![0.4]);
        assert_eq!(fallback.mu, 7.0);
    }
}
