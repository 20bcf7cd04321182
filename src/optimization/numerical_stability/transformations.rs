//! numerical_stability::transformations: maps between unconstrained θ and
//! constrained GARCH parameters.
//!
//! - `ω > 0` through [`safe_softplus`] / [`safe_softplus_inv`].
//! - `α, β ≥ 0` with `Σα + Σβ = 1 - STATIONARITY_MARGIN - slack` through
//!   [`safe_softmax`] with an implicit zero slack logit.
//! - ARMA coefficients through partial autocorrelations:
//!   [`pacf_to_coeffs`] / [`coeffs_to_pacf`] keep every iterate stationary
//!   (AR) or invertible (MA).
//! - [`delta_method`] carries a θ-space covariance into parameter space.
use crate::optimization::{errors::OptResult, loglik_optimizer::types::Hessian};
use ndarray::{Array1, ArrayView1};

/// Reserved gap below the unit-persistence boundary `Σα + Σβ = 1`.
pub const STATIONARITY_MARGIN: f64 = 1e-6;

/// Floor for probabilities before taking logs when inverting the softmax.
pub const LOGIT_EPS: f64 = 1e-12;

/// Eigenvalues below this are treated as zero in pseudo-inverses.
pub const EIGEN_EPS: f64 = 1e-10;

/// Generic comparison tolerance for parameter-space identities.
pub const GENERAL_TOL: f64 = 1e-10;

/// `ln(1 + e^x)` without overflow; identity above `x = 20`.
pub fn safe_softplus(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp().ln_1p() }
}

/// Inverse of [`safe_softplus`] on `(0, ∞)`.
pub fn safe_softplus_inv(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp_m1().ln() }
}

/// Softmax over `logits` plus an implicit slack logit fixed at zero, scaled
/// to `total`.
///
/// Returns `(weights, slack)` with `weights.sum() + slack == total`. The
/// maximum logit is subtracted before exponentiating.
pub fn safe_softmax(logits: ArrayView1<f64>, total: f64) -> (Array1<f64>, f64) {
    let max = logits.iter().copied().fold(0.0_f64, f64::max);
    let exps = logits.mapv(|z| (z - max).exp());
    let slack_exp = (-max).exp();
    let denom = exps.sum() + slack_exp;
    (exps.mapv(|e| total * e / denom), total * slack_exp / denom)
}

/// Inverse of [`safe_softmax`]: logits `ln(w_i / slack)`.
///
/// Entries are floored at [`LOGIT_EPS`] so zero coefficients map to a very
/// negative but finite logit.
pub fn safe_softmax_inv(weights: ArrayView1<f64>, slack: f64) -> Array1<f64> {
    let slack = slack.max(LOGIT_EPS);
    weights.mapv(|w| (w.max(LOGIT_EPS) / slack).ln())
}

/// Largest partial autocorrelation produced by [`coeffs_to_pacf`].
pub const PACF_BOUND: f64 = 0.99;

/// Durbin–Levinson map from partial autocorrelations `r_k ∈ (-1, 1)` to the
/// coefficients of a stable polynomial `1 − Σ φ_i z^i`.
///
/// The `k`-th step is `φ_j ← φ_j − r_k φ_{k−j}` for `j < k` and `φ_k = r_k`.
pub fn pacf_to_coeffs(pacf: ArrayView1<f64>) -> Array1<f64> {
    let mut coeffs = Array1::<f64>::zeros(pacf.len());
    for (k, &r) in pacf.iter().enumerate() {
        let prev = coeffs.clone();
        for j in 0..k {
            coeffs[j] = prev[j] - r * prev[k - 1 - j];
        }
        coeffs[k] = r;
    }
    coeffs
}

/// Inverse of [`pacf_to_coeffs`].
///
/// Partial autocorrelations of a non-stable polynomial are clamped to
/// `±PACF_BOUND` step by step, so the result is always a valid input for
/// [`pacf_to_coeffs`].
pub fn coeffs_to_pacf(coeffs: ArrayView1<f64>) -> Array1<f64> {
    let order = coeffs.len();
    let mut work = coeffs.to_owned();
    let mut pacf = Array1::<f64>::zeros(order);
    for k in (0..order).rev() {
        let r = work[k].clamp(-PACF_BOUND, PACF_BOUND);
        pacf[k] = r;
        let denom = 1.0 - r * r;
        let prev = work.clone();
        for j in 0..k {
            work[j] = (prev[j] + r * prev[k - 1 - j]) / denom;
        }
    }
    pacf
}

/// Delta method: `Cov_φ = J Cov_θ Jᵀ` with `J[r, c] = ∂φ_r / ∂θ_c`.
///
/// # Errors
/// Dimension mismatches surface as
/// [`OptError::HessianDimMismatch`](crate::optimization::errors::OptError::HessianDimMismatch).
pub fn delta_method(jacobian: &Hessian, cov_theta: &Hessian) -> OptResult<Hessian> {
    let k = cov_theta.nrows();
    if cov_theta.ncols() != k || jacobian.ncols() != k {
        return Err(crate::optimization::errors::OptError::HessianDimMismatch {
            expected: k,
            found: (jacobian.nrows(), jacobian.ncols()),
        });
    }
    Ok(jacobian.dot(cov_theta).dot(&jacobian.t()))
}
