//! garch_pipeline: ARIMA/GARCH forecasting of daily price series.
//!
//! Purpose
//! -------
//! Forecast a daily price series (the reference run uses Apple adjusted
//! closes) over a held-out window: difference log prices until ADF and KPSS
//! agree the series is stationary, fit ARMA–GARCH candidates by maximum
//! likelihood, keep the lowest-AIC candidate whose standardized residuals
//! pass Ljung–Box, and score its price forecast by RMSE.
//!
//! Key behaviors
//! -------------
//! - [`pipeline`]: loading, splitting, transforms, candidate selection,
//!   evaluation and the end-to-end runner.
//! - [`volatility`]: ARMA(p, q)–GARCH(p, q) models with Normal, Student-t
//!   and skewed Student-t innovations.
//! - [`optimization`]: L-BFGS likelihood maximization on top of `argmin`.
//! - [`statistical_tests`]: ADF, KPSS, Ljung–Box and Jarque–Bera.
//! - [`inference`]: HAC long-run variances and observed-information
//!   covariances.
//!
//! Conventions
//! -----------
//! - Series are `ndarray` vectors indexed from 0 in time order.
//! - Each subtree owns one error enum and result alias; the pipeline wraps
//!   them in [`pipeline::PipelineError`] at its boundary.
//! - Library code logs through `tracing` and never installs a subscriber;
//!   the `garch-pipeline` binary does.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to the code they cover.
//! - `tests/integration_garch_pipeline.rs` runs the full pipeline on a
//!   simulated GARCH price path written to a temporary CSV file.

pub mod inference;
pub mod optimization;
pub mod pipeline;
pub mod statistical_tests;
pub mod volatility;
