//! Finite-difference helpers for gradients and Hessians of the likelihood.
//!
//! The gradient fallback used by the adapter lives here together with the
//! Hessian routine used for standard errors of fitted GARCH parameters.
//!
//! The Hessian is built from second differences of `ℓ` itself rather than
//! from differences of a finite-difference gradient: with `ℓ` of order
//! `10⁴` on a few thousand daily returns, nested differencing would leave
//! only noise in the curvature.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        Grad, Theta,
        types::Hessian,
        validation::{validate_grad, validate_hessian},
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use ndarray::Array2;
use std::cell::RefCell;

/// Relative step for second differences, roughly `eps^(1/4)`.
const HESSIAN_REL_STEP: f64 = 1e-4;

/// Relative step for first differences, roughly `eps^(1/3)`.
const JACOBIAN_REL_STEP: f64 = 6e-6;

/// Forward-difference gradient of `func` with error capture.
///
/// `func` parks the first failure in `closure_err` and returns `NaN`; that
/// captured error wins over any validation error of the gradient.
///
/// # Errors
/// - The captured evaluation error, converted to `OptError`.
/// - [`validate_grad`] failures.
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}

/// Central second-difference Hessian of a scalar function.
///
/// Step for coordinate `i` is `h_i = 1e-4 · max(1, |θ_i|)`. Diagonal terms
/// use the three-point rule, off-diagonal terms the four-point rule; the
/// result is symmetrized and validated.
///
/// # Errors
/// - [`OptError::InvalidHessian`] when any entry is non-finite (typically a probe left the domain).
pub fn compute_hessian<F: Fn(&Theta) -> f64>(f: &F, theta: &Theta) -> OptResult<Hessian> {
    let dim = theta.len();
    let steps: Vec<f64> = theta.iter().map(|t| HESSIAN_REL_STEP * t.abs().max(1.0)).collect();
    let f0 = f(theta);
    let mut hess = Array2::<f64>::zeros((dim, dim));
    let mut probe = theta.clone();

    for i in 0..dim {
        let hi = steps[i];
        probe[i] = theta[i] + hi;
        let f_plus = f(&probe);
        probe[i] = theta[i] - hi;
        let f_minus = f(&probe);
        probe[i] = theta[i];
        hess[[i, i]] = (f_plus - 2.0 * f0 + f_minus) / (hi * hi);

        for j in 0..i {
            let hj = steps[j];
            let mut corner = |si: f64, sj: f64| {
                probe[i] = theta[i] + si * hi;
                probe[j] = theta[j] + sj * hj;
                let v = f(&probe);
                probe[i] = theta[i];
                probe[j] = theta[j];
                v
            };
            let pp = corner(1.0, 1.0);
            let pm = corner(1.0, -1.0);
            let mp = corner(-1.0, 1.0);
            let mm = corner(-1.0, -1.0);
            let value = (pp - pm - mp + mm) / (4.0 * hi * hj);
            hess[[i, j]] = value;
            hess[[j, i]] = value;
        }
    }
    validate_hessian(&hess, dim)?;
    symmetrize_hess(&mut hess);
    Ok(hess)
}

/// Central-difference Jacobian `J[r, c] = ∂g_r / ∂θ_c` of a vector map.
///
/// Used by the delta method to carry a covariance from θ-space into model
/// parameter space.
pub fn compute_jacobian<F: Fn(&Theta) -> Theta>(g: &F, theta: &Theta) -> OptResult<Hessian> {
    let base = g(theta);
    let mut jac = Array2::<f64>::zeros((base.len(), theta.len()));
    let mut probe = theta.clone();
    for c in 0..theta.len() {
        let h = JACOBIAN_REL_STEP * theta[c].abs().max(1.0);
        probe[c] = theta[c] + h;
        let up = g(&probe);
        probe[c] = theta[c] - h;
        let down = g(&probe);
        probe[c] = theta[c];
        for r in 0..base.len() {
            let value = (up[r] - down[r]) / (2.0 * h);
            if !value.is_finite() {
                return Err(OptError::InvalidHessian { row: r, col: c, value });
            }
            jac[[r, c]] = value;
        }
    }
    Ok(jac)
}

fn symmetrize_hess(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}
