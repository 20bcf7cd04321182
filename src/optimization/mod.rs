//! optimization: maximum-likelihood machinery for the volatility models.
//!
//! Purpose
//! -------
//! Fit ARMA-GARCH candidates by maximizing their log-likelihood with an
//! argmin L-BFGS solver, keeping argmin's generics and error types out of
//! the model code.
//!
//! Key behaviors
//! -------------
//! - [`loglik_optimizer`]: the [`LogLikelihood`](loglik_optimizer::LogLikelihood)
//!   trait, [`maximize`](loglik_optimizer::maximize), solver builders,
//!   finite-difference gradients and Hessians.
//! - [`numerical_stability`]: softplus / softmax parameter maps and the
//!   delta method.
//! - [`errors`]: [`OptError`](errors::OptError), the single error surface of
//!   this layer.
//!
//! Conventions
//! -----------
//! - Solvers minimize `c(θ) = -ℓ(θ)`; every public value is reported as `ℓ`.
//! - θ is unconstrained; constraint handling lives in the model parameter
//!   maps.
//! - Model and backend failures arrive as `OptError`, never as panics.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
