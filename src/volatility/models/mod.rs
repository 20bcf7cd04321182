//! models: user-facing ARMA–GARCH model API.
//!
//! [`ArmaGarchModel`] implements [`LogLikelihood`](crate::optimization::loglik_optimizer::LogLikelihood)
//! on top of `volatility::core` and adds fitting, forecasting, information
//! criteria and standard errors.

pub mod arma_garch;

pub use self::arma_garch::{ArmaGarchModel, FittedPaths};

pub mod prelude {
    pub use super::arma_garch::ArmaGarchModel;
}
