//! volatility::errors: error types for the ARMA–GARCH stack.
//!
//! - [`VolError`]: data validation, recursion failures, options, fit state.
//! - [`ParamError`]: construction and validation of model-space parameters.
//!
//! Both convert into `OptError` so a failure raised inside the likelihood
//! keeps its identity after crossing the optimizer boundary.
use crate::optimization::errors::OptError;

pub type VolResult<T> = Result<T, VolError>;

pub type ParamResult<T> = Result<T, ParamError>;

#[derive(Debug, Clone, PartialEq)]
pub enum VolError {
    // ---- Input/data validation ----
    /// A return is NaN/±inf.
    NonFiniteData { index: usize, value: f64 },

    /// Not enough observations for the requested orders.
    SeriesTooShort { len: usize, required: usize },

    /// Zero sample variance; the likelihood scale is undefined.
    DegenerateSeries,

    // ---- Model specification / options ----
    /// Variance orders `p = q = 0`.
    InvalidModelOrder { p: usize, q: usize, reason: &'static str },

    /// Variance guards must be finite with `0 < min < max`.
    InvalidVarianceGuards { min: f64, max: f64, reason: &'static str },

    /// `VarianceInit::Fixed(v)` must be finite and > 0.
    InvalidInitFixed { value: f64 },

    /// Forecast horizon must be at least one.
    InvalidHorizon { horizon: usize },

    // ---- Recursion ----
    NonFiniteResidual { index: usize, value: f64 },
    NonFiniteVariance { index: usize, value: f64 },
    InvalidDensity { value: f64 },

    // ---- Estimation ----
    ModelNotFitted,
    Optimization(OptError),

    // ---- Nested ----
    Param(ParamError),
}

impl std::error::Error for VolError {}

impl std::fmt::Display for VolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VolError::NonFiniteData { index, value } => {
                write!(f, "Non-finite return {value} at index {index}")
            }
            VolError::SeriesTooShort { len, required } => {
                write!(f, "Series of length {len} is too short, need at least {required}")
            }
            VolError::DegenerateSeries => write!(f, "Return series has zero variance"),
            VolError::InvalidModelOrder { p, q, reason } => {
                write!(f, "Invalid variance order ({p}, {q}): {reason}")
            }
            VolError::InvalidVarianceGuards { min, max, reason } => {
                write!(f, "Invalid variance guards ({min}, {max}): {reason}")
            }
            VolError::InvalidInitFixed { value } => {
                write!(f, "Invalid fixed pre-sample variance {value}, must be finite and > 0")
            }
            VolError::InvalidHorizon { horizon } => {
                write!(f, "Invalid forecast horizon {horizon}, must be at least 1")
            }
            VolError::NonFiniteResidual { index, value } => {
                write!(f, "Non-finite mean residual at t={index}: {value}")
            }
            VolError::NonFiniteVariance { index, value } => {
                write!(f, "Non-finite or non-positive conditional variance at t={index}: {value}")
            }
            VolError::InvalidDensity { value } => {
                write!(f, "Innovation log-density is not finite: {value}")
            }
            VolError::ModelNotFitted => write!(f, "Model has not been fitted"),
            VolError::Optimization(err) => write!(f, "Optimization failed: {err}"),
            VolError::Param(err) => write!(f, "{err}"),
        }
    }
}

impl From<ParamError> for VolError {
    fn from(err: ParamError) -> Self {
        VolError::Param(err)
    }
}

impl From<OptError> for VolError {
    fn from(err: OptError) -> Self {
        VolError::Optimization(err)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    /// `Σα + Σβ` not below `1 − margin`.
    StationarityViolated { coeff_sum: f64 },

    ThetaLengthMismatch { expected: usize, actual: usize },

    /// ω must be finite and > 0.
    InvalidOmega { value: f64 },

    AlphaLengthMismatch { expected: usize, actual: usize },
    InvalidAlpha { index: usize, value: f64 },
    BetaLengthMismatch { expected: usize, actual: usize },
    InvalidBeta { index: usize, value: f64 },

    /// Slack must be non-negative.
    InvalidSlack { value: f64 },

    /// Mean-equation coefficient (`mu`, `phi`, `theta`) is not finite.
    InvalidMeanCoefficient { name: &'static str, index: usize, value: f64 },

    /// Innovation shape (`nu > 2`, `xi > 0`) out of domain.
    InvalidShape { name: &'static str, value: f64 },

    /// Unconstrained optimizer input must be finite.
    InvalidThetaInput { index: usize, value: f64 },
}

impl std::error::Error for ParamError {}

impl std::fmt::Display for ParamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamError::StationarityViolated { coeff_sum } => {
                write!(f, "Variance recursion not stationary: sum(alpha) + sum(beta) = {coeff_sum}")
            }
            ParamError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, actual {actual}")
            }
            ParamError::InvalidOmega { value } => {
                write!(f, "Invalid omega: {value}, must be finite and > 0")
            }
            ParamError::AlphaLengthMismatch { expected, actual } => {
                write!(f, "Alpha length mismatch: expected {expected}, actual {actual}")
            }
            ParamError::InvalidAlpha { index, value } => {
                write!(f, "Invalid alpha at index {index}: {value}, must be non-negative")
            }
            ParamError::BetaLengthMismatch { expected, actual } => {
                write!(f, "Beta length mismatch: expected {expected}, actual {actual}")
            }
            ParamError::InvalidBeta { index, value } => {
                write!(f, "Invalid beta at index {index}: {value}, must be non-negative")
            }
            ParamError::InvalidSlack { value } => {
                write!(f, "Invalid slack: {value}, must be non-negative")
            }
            ParamError::InvalidMeanCoefficient { name, index, value } => {
                write!(f, "Invalid mean coefficient {name}[{index}]: {value}, must be finite")
            }
            ParamError::InvalidShape { name, value } => {
                write!(f, "Invalid innovation parameter {name}: {value}")
            }
            ParamError::InvalidThetaInput { index, value } => {
                write!(f, "Invalid theta input at index {index}: {value}, must be finite")
            }
        }
    }
}
