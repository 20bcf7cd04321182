//! loglik_optimizer: argmin-backed maximization of log-likelihoods.
//!
//! Purpose
//! -------
//! Models implement [`LogLikelihood`] and call [`maximize`]; this module
//! turns that into an L-BFGS run with the configured line search and
//! stopping rules, and returns a validated [`OptimOutcome`].
//!
//! Key behaviors
//! -------------
//! - [`adapter::ArgMinAdapter`] exposes `c(θ) = -ℓ(θ)` to argmin and falls
//!   back to finite-difference gradients when a model has no analytic one.
//! - [`builders`] construct the L-BFGS solver, [`run::run_lbfgs`] executes it.
//! - [`finite_diff`] also provides the Hessian and Jacobian used for
//!   standard errors after a fit.
//! - [`validation`] keeps tolerances, gradients and estimates finite.
//!
//! Testing notes
//! -------------
//! - `api` tests run full optimizations on a Gaussian likelihood with both
//!   line searches; GARCH fits are exercised in `volatility::models`.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
