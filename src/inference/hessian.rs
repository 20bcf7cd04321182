//! inference::hessian: observed-information covariance of an MLE.
//!
//! Purpose
//! -------
//! Turn a maximized log-likelihood into a parameter covariance:
//! `I(θ̂) = -∇²ℓ(θ̂)` by central second differences, then
//! `Cov(θ̂) = I(θ̂)⁺` through an eigen pseudo-inverse that drops directions
//! with eigenvalue below `max(EIGEN_EPS, 1e-6 λ_max)`.
//!
//! Conventions
//! -----------
//! - θ is the optimizer's unconstrained vector. Model-space covariances go
//!   through [`delta_method`](crate::optimization::numerical_stability::delta_method).
//! - Flat or concave-up directions (near-boundary GARCH fits) get zero
//!   variance contribution rather than a panic; the caller sees tiny or
//!   zero standard errors for them.
use crate::optimization::{
    errors::OptResult, loglik_optimizer::finite_diff::compute_hessian,
    numerical_stability::transformations::EIGEN_EPS,
};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// Pseudo-inverse of the observed information of `loglik` at `theta_hat`.
///
/// # Errors
/// Propagates [`compute_hessian`] failures (non-finite probes).
pub fn calc_covariance<F: Fn(&Array1<f64>) -> f64>(
    loglik: &F, theta_hat: &Array1<f64>,
) -> OptResult<Array2<f64>> {
    let hess = compute_hessian(loglik, theta_hat)?;
    let k = hess.nrows();
    let mut obs_info = DMatrix::<f64>::zeros(k, k);
    for i in 0..k {
        for j in 0..k {
            obs_info[(i, j)] = -hess[[i, j]];
        }
    }
    Ok(pseudo_inverse(obs_info))
}

/// Square roots of the diagonal of a covariance matrix.
pub fn standard_errors(cov: &Array2<f64>) -> Array1<f64> {
    cov.diag().mapv(|v| v.max(0.0).sqrt())
}

/// Eigenvalues below this fraction of the largest one are treated as zero;
/// second differences leave noise of about `1e-8` relative in flat directions.
const RANK_REL_TOL: f64 = 1e-6;

fn pseudo_inverse(sym: DMatrix<f64>) -> Array2<f64> {
    let k = sym.nrows();
    let eigen = sym.symmetric_eigen();
    let lambda_max = eigen.eigenvalues.iter().copied().fold(0.0_f64, f64::max);
    let cutoff = EIGEN_EPS.max(RANK_REL_TOL * lambda_max);
    let q = eigen.eigenvectors;
    let mut inv = Array2::<f64>::zeros((k, k));
    for (m, &lambda) in eigen.eigenvalues.iter().enumerate() {
        if lambda <= cutoff {
            continue;
        }
        for i in 0..k {
            for j in 0..k {
                inv[[i, j]] += q[(i, m)] * q[(j, m)] / lambda;
            }
        }
    }
    inv
}
