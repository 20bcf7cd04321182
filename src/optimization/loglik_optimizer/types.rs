//! loglik_optimizer::types: numeric aliases and pre-wired L-BFGS solvers.
//!
//! Every optimizer module refers to these aliases rather than to `ndarray`
//! or argmin generics directly. `Theta` is the unconstrained parameter vector
//! of a volatility model (mean, variance and innovation blocks laid out by
//! `volatility::core::shape::ModelShape`).
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Unconstrained parameter vector `θ`.
pub type Theta = Array1<f64>;

/// Gradient vector, same length as [`Theta`].
pub type Grad = Array1<f64>;

/// Dense `k × k` Hessian.
pub type Hessian = Array2<f64>;

/// Scalar objective; inside argmin this is `c(θ) = -ℓ(θ)`.
pub type Cost = f64;

/// Function-evaluation counters reported by argmin (`"cost_count"`, ...).
pub type FnEvalMap = HashMap<String, u64>;

/// Default L-BFGS history size.
pub const DEFAULT_LBFGS_MEM: usize = 7;

pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;
