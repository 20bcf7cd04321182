//! Multi-step ARMA–GARCH forecasts from the end of the sample.
//!
//! The mean path sets future shocks to zero; the variance path replaces
//! future `ε²` by their conditional expectation `σ̂²`. In-sample values seed
//! every lag that reaches back before the forecast origin.
use crate::volatility::{
    core::{guards::VarianceGuards, params::GarchParams},
    errors::{VolError, VolResult},
};
use ndarray::{Array1, ArrayView1};

/// Forecast paths; index `h − 1` holds the `h`-step-ahead value.
#[derive(Debug, Clone, PartialEq)]
pub struct GarchForecast {
    pub mean: Array1<f64>,
    pub variance: Array1<f64>,
}

impl GarchForecast {
    pub fn horizon(&self) -> usize {
        self.mean.len()
    }
}

/// Roll both recursions `horizon` steps past the end of the sample.
///
/// `data`, `resid` and `variances` are the in-sample observations, mean
/// residuals and conditional variances; all three must have the same length
/// and cover the largest lag.
///
/// # Errors
/// - `InvalidHorizon` when `horizon == 0`.
/// - `SeriesTooShort` when the in-sample paths do not cover every lag.
/// - `NonFiniteVariance` if a variance forecast is NaN.
pub fn forecast_recursion(
    params: &GarchParams, data: ArrayView1<f64>, resid: ArrayView1<f64>,
    variances: ArrayView1<f64>, horizon: usize, guards: &VarianceGuards,
) -> VolResult<GarchForecast> {
    if horizon == 0 {
        return Err(VolError::InvalidHorizon { horizon });
    }
    let max_lag = params
        .ar
        .len()
        .max(params.ma.len())
        .max(params.alpha.len())
        .max(params.beta.len());
    let n = data.len();
    let required = max_lag.max(1);
    if n < required || resid.len() != n || variances.len() != n {
        return Err(VolError::SeriesTooShort {
            len: n.min(resid.len()).min(variances.len()),
            required,
        });
    }

    let mu = params.mu;
    // Extended histories: in-sample values followed by forecasts.
    let mut y: Vec<f64> = data.iter().copied().collect();
    let mut e: Vec<f64> = resid.iter().copied().collect();
    let mut e2: Vec<f64> = resid.iter().map(|v| v * v).collect();
    let mut s2: Vec<f64> = variances.iter().copied().collect();
    let mut mean = Array1::<f64>::zeros(horizon);
    let mut variance = Array1::<f64>::zeros(horizon);

    for h in 0..horizon {
        let t = n + h;
        let mut m = mu;
        for (i, phi) in params.ar.iter().enumerate() {
            m += phi * (y[t - i - 1] - mu);
        }
        for (j, theta) in params.ma.iter().enumerate() {
            m += theta * e[t - j - 1];
        }
        let mut v = params.omega;
        for (i, alpha) in params.alpha.iter().enumerate() {
            v += alpha * e2[t - i - 1];
        }
        for (j, beta) in params.beta.iter().enumerate() {
            v += beta * s2[t - j - 1];
        }
        let v = guards.clamp(v);
        if v.is_nan() {
            return Err(VolError::NonFiniteVariance { index: t, value: v });
        }
        y.push(m);
        e.push(0.0);
        e2.push(v);
        s2.push(v);
        mean[h] = m;
        variance[h] = v;
    }
    Ok(GarchForecast { mean, variance })
}
