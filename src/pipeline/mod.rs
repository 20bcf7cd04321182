//! pipeline: from a price file to a holdout RMSE.
//!
//! Purpose
//! -------
//! Drive a full forecasting run on a daily price series: load, split off a
//! holdout, make the log series stationary, fit and diagnose ARMA–GARCH
//! candidates, pick one, forecast the holdout and score it.
//!
//! Key behaviors
//! -------------
//! - [`loader`]: CSV input into [`PriceSeries`].
//! - [`split`]: train/holdout split.
//! - [`transform`]: logs, differencing order by ADF + KPSS, inverse maps.
//! - [`arima_order`]: automatic ARIMA order search used for ARMA means.
//! - [`backend`]: the [`VolatilityBackend`] seam and [`NativeBackend`].
//! - [`selection`]: Ljung–Box adequacy and lowest-AIC selection.
//! - [`evaluate`]: RMSE on the holdout.
//! - [`runner`]: [`run_pipeline`] ties the stages together.
//! - [`config`]: [`PipelineConfig`], loadable from JSON.
//!
//! Conventions
//! -----------
//! - Every failure is a [`PipelineError`] tagged with its [`Stage`] and is
//!   terminal for the run.
//! - Stages log through `tracing`; nothing in this module prints.

pub mod arima_order;
pub mod backend;
pub mod config;
pub mod errors;
pub mod evaluate;
pub mod loader;
pub mod runner;
pub mod selection;
pub mod split;
pub mod transform;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::arima_order::{ArimaOrder, ArimaSearch, auto_select_arima_order};
pub use self::backend::{Diagnostics, NativeBackend, VolatilityBackend};
pub use self::config::{CandidateSpec, MeanSpec, PipelineConfig};
pub use self::errors::{PipelineError, PipelineResult, Stage};
pub use self::evaluate::evaluate;
pub use self::loader::{LoaderOptions, PriceSeries, load_price_csv};
pub use self::runner::{PipelineReport, run_from_csv, run_pipeline};
pub use self::selection::{AdequacyRule, CandidateReport};
pub use self::split::{Split, split};
pub use self::transform::{StationarityOptions, StationarityReport};

pub mod prelude {
    pub use super::backend::{NativeBackend, VolatilityBackend};
    pub use super::config::{CandidateSpec, PipelineConfig};
    pub use super::errors::{PipelineError, PipelineResult};
    pub use super::loader::{PriceSeries, load_price_csv};
    pub use super::runner::{PipelineReport, run_from_csv, run_pipeline};
}
