//! core: data, parameters and recursions shared by ARMA–GARCH models.
//!
//! Purpose
//! -------
//! Hold the numeric building blocks the model layer wires together: the
//! validated return series, model orders and θ layout, innovation
//! densities, the θ ↔ parameter map, the in-sample recursions, and
//! out-of-sample forecasting.
//!
//! Conventions
//! -----------
//! - Indexing is 0-based; the oldest observation sits at index 0.
//! - Variance orders follow the `GARCH(p, q)` convention: `q` α-lags on ε²,
//!   `p` β-lags on σ².
//! - Nothing here performs I/O or logs; failures are
//!   [`VolResult`](crate::volatility::errors::VolResult) /
//!   [`ParamResult`](crate::volatility::errors::ParamResult) values.
pub mod data;
pub mod forecasts;
pub mod guards;
pub mod init;
pub mod innovations;
pub mod options;
pub mod params;
pub mod recursion;
pub mod shape;
pub mod validation;
pub mod workspace;

pub use self::data::ReturnSeries;
pub use self::forecasts::{GarchForecast, forecast_recursion};
pub use self::guards::VarianceGuards;
pub use self::init::VarianceInit;
pub use self::innovations::{Innovation, InnovationShape};
pub use self::options::GarchOptions;
pub use self::params::{GarchParams, MeanStart};
pub use self::recursion::{compute_residuals, compute_variances, likelihood_driver};
pub use self::shape::{ArmaOrder, GarchOrder, ModelShape};
pub use self::workspace::GarchScratch;
