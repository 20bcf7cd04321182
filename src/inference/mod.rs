//! inference: long-run variances, bandwidths and MLE covariances.
//!
//! - [`kernel`]: tapers and Andrews plug-in bandwidths.
//! - [`hac`]: kernel-weighted long-run (co)variance, used by KPSS.
//! - [`hessian`]: observed-information covariance and standard errors of
//!   fitted volatility models.
//! - [`errors`]: [`InferenceError`] / [`InferenceResult`].

pub mod errors;
pub mod hac;
pub mod hessian;
pub mod kernel;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::errors::{InferenceError, InferenceResult};
pub use self::hac::{HACOptions, long_run_covariance, long_run_variance};
pub use self::hessian::{calc_covariance, standard_errors};
pub use self::kernel::KernelType;

pub mod prelude {
    pub use super::errors::{InferenceError, InferenceResult};
    pub use super::hac::{HACOptions, long_run_variance};
    pub use super::hessian::{calc_covariance, standard_errors};
    pub use super::kernel::KernelType;
}
