//! statistical_tests: unit-root, stationarity and residual diagnostics.
//!
//! Purpose
//! -------
//! Hypothesis tests used by the forecasting pipeline:
//!
//! - [`AdfOutcome`]: augmented Dickey–Fuller (H0: unit root).
//! - [`KpssOutcome`]: KPSS level test (H0: stationary).
//! - [`LjungBoxOutcome`]: portmanteau test on residuals (H0: no serial
//!   correlation up to the lag).
//! - [`JarqueBeraOutcome`]: normality of standardized residuals.
//!
//! Conventions
//! -----------
//! - Every entry point validates its input through [`validate_series`] and
//!   reports failures as [`TestError`]; none of them panic on user data.
//! - Outcomes are small `Copy` structs with accessor methods.

pub mod adf;
pub mod errors;
pub mod jarque_bera;
pub mod kpss;
pub mod ljung_box;
pub mod validation;

pub use self::adf::AdfOutcome;
pub use self::errors::{TestError, TestResult};
pub use self::jarque_bera::JarqueBeraOutcome;
pub use self::kpss::{KpssLag, KpssOutcome};
pub use self::ljung_box::{BoundaryRule, LjungBoxOutcome};
pub use self::validation::validate_series;

pub mod prelude {
    pub use super::adf::AdfOutcome;
    pub use super::errors::{TestError, TestResult};
    pub use super::kpss::{KpssLag, KpssOutcome};
    pub use super::ljung_box::{BoundaryRule, LjungBoxOutcome};
}
