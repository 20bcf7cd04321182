//! In-sample ARMA–GARCH recursions and the log-likelihood driver.
//!
//! ```text
//! ε_t  = y_t − μ − Σ φ_i (y_{t−i} − μ) − Σ θ_j ε_{t−j}
//! σ²_t = ω + Σ α_i ε²_{t−i} + Σ β_j σ²_{t−j}
//! ℓ    = Σ_t ln f(ε_t | σ²_t)
//! ```
//!
//! Pre-sample `y − μ` and `ε` lags are zero. Pre-sample `ε²` and `σ²` lags
//! all take the seed chosen by [`VarianceInit`]. Every σ²_t is clamped by
//! [`VarianceGuards`](crate::volatility::core::guards::VarianceGuards)
//! before it is stored.
use crate::volatility::{
    core::{
        data::ReturnSeries, options::GarchOptions, params::GarchParams,
        workspace::GarchScratch,
    },
    errors::{VolError, VolResult},
};
use ndarray::{ArrayView1, ArrayViewMut1};

/// Fill `out` with mean residuals ε_t.
///
/// # Errors
/// `NonFiniteResidual` at the first non-finite ε_t.
pub fn compute_residuals(
    params: &GarchParams, data: ArrayView1<f64>, mut out: ArrayViewMut1<f64>,
) -> VolResult<()> {
    let mu = params.mu;
    for t in 0..data.len() {
        let mut mean = mu;
        for (i, phi) in params.ar.iter().enumerate() {
            if let Some(lag) = t.checked_sub(i + 1) {
                mean += phi * (data[lag] - mu);
            }
        }
        for (j, theta) in params.ma.iter().enumerate() {
            if let Some(lag) = t.checked_sub(j + 1) {
                mean += theta * out[lag];
            }
        }
        let resid = data[t] - mean;
        if !resid.is_finite() {
            return Err(VolError::NonFiniteResidual { index: t, value: resid });
        }
        out[t] = resid;
    }
    Ok(())
}

/// Fill `out` with guarded conditional variances σ²_t given residuals.
///
/// # Errors
/// `NonFiniteVariance` at the first σ²_t that is NaN after clamping.
pub fn compute_variances(
    params: &GarchParams, resid: ArrayView1<f64>, options: &GarchOptions,
    mut out: ArrayViewMut1<f64>,
) -> VolResult<()> {
    let n = resid.len();
    let mean_sq = resid.iter().map(|e| e * e).sum::<f64>() / n.max(1) as f64;
    let seed = options.guards.clamp(options.init.seed(mean_sq, params.uncond_variance()));
    for t in 0..n {
        let mut sigma2 = params.omega;
        for (i, alpha) in params.alpha.iter().enumerate() {
            sigma2 += alpha * t.checked_sub(i + 1).map_or(seed, |lag| resid[lag] * resid[lag]);
        }
        for (j, beta) in params.beta.iter().enumerate() {
            sigma2 += beta * t.checked_sub(j + 1).map_or(seed, |lag| out[lag]);
        }
        let guarded = options.guards.clamp(sigma2);
        if guarded.is_nan() {
            return Err(VolError::NonFiniteVariance { index: t, value: sigma2 });
        }
        out[t] = guarded;
    }
    Ok(())
}

/// Run both recursions into `scratch` and sum the innovation log-densities.
///
/// # Errors
/// Propagates recursion failures and `InvalidDensity`.
pub fn likelihood_driver(
    params: &GarchParams, data: &ReturnSeries, options: &GarchOptions, scratch: &GarchScratch,
) -> VolResult<f64> {
    fill_paths(params, data, options, scratch)?;
    let resid = scratch.resid_buf.borrow();
    let var = scratch.var_buf.borrow();
    resid
        .iter()
        .zip(var.iter())
        .try_fold(0.0, |acc, (e, s2)| Ok(acc + params.innovation.log_density(*e, *s2)?))
}

/// Recompute ε and σ² for `data` into `scratch`.
pub fn fill_paths(
    params: &GarchParams, data: &ReturnSeries, options: &GarchOptions, scratch: &GarchScratch,
) -> VolResult<()> {
    scratch.ensure_len(data.len());
    let mut resid = scratch.resid_buf.borrow_mut();
    compute_residuals(params, data.data.view(), resid.view_mut())?;
    let mut var = scratch.var_buf.borrow_mut();
    compute_variances(params, resid.view(), options, var.view_mut())
}
