//! optimization::errors: unified error surface for likelihood maximization.
//!
//! Purpose
//! -------
//! Collect every failure the optimizer can observe into one enum,
//! [`OptError`]: configuration mistakes (tolerances, line search, memory),
//! numerical failures (non-finite cost, gradient or Hessian), backend errors
//! raised by `argmin`, and model-side errors raised while a GARCH likelihood
//! is being evaluated.
//!
//! Conventions
//! -----------
//! - Model errors ([`VolError`], [`ParamError`]) are mapped variant by
//!   variant so the caller still sees *which* constraint failed after the
//!   error has crossed the optimizer boundary.
//! - `argmin::core::Error` is downcast to `ArgminError` when possible; any
//!   other payload becomes [`OptError::BackendError`] with its message.
use argmin::core::{ArgminError, Error};

use crate::volatility::errors::{ParamError, VolError};

pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Gradient ----
    GradientNotImplemented,
    GradientDimMismatch { expected: usize, found: usize },
    InvalidGradient { index: usize, value: f64, reason: &'static str },

    // ---- MLEOptions ----
    InvalidTolGrad { tol: f64, reason: &'static str },
    InvalidTolCost { tol: f64, reason: &'static str },
    InvalidMaxIter { max_iter: usize, reason: &'static str },
    NoTolerancesProvided,
    InvalidLineSearch { name: String, reason: &'static str },
    InvalidLBFGSMem { mem: usize, reason: &'static str },

    // ---- Cost function ----
    NonFiniteCost { value: f64 },

    // ---- Optimizer outcome ----
    InvalidThetaHat { index: usize, value: f64, reason: &'static str },
    MissingThetaHat,

    // ---- Argmin ----
    InvalidParameter { text: String },
    NotImplemented { text: String },
    NotInitialized { text: String },
    ConditionViolated { text: String },
    CheckPointNotFound { text: String },
    PotentialBug { text: String },
    ImpossibleError { text: String },
    BackendError { text: String },

    // ---- Finite differences ----
    HessianDimMismatch { expected: usize, found: (usize, usize) },
    InvalidHessian { row: usize, col: usize, value: f64 },

    // ---- Volatility model ----
    NonFiniteResidual { index: usize, value: f64 },
    NonFiniteVariance { index: usize, value: f64 },
    InvalidDensity { value: f64 },
    SeriesTooShort { len: usize, required: usize },

    // ---- Parameters ----
    StationarityViolated { coeff_sum: f64 },
    ThetaLengthMismatch { expected: usize, actual: usize },
    InvalidOmega { value: f64 },
    AlphaLengthMismatch { expected: usize, actual: usize },
    InvalidAlpha { index: usize, value: f64 },
    BetaLengthMismatch { expected: usize, actual: usize },
    InvalidBeta { index: usize, value: f64 },
    InvalidShape { name: &'static str, value: f64 },
    InvalidThetaInput { index: usize, value: f64 },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Gradient ----
            OptError::GradientNotImplemented => write!(f, "Analytic gradient not implemented"),
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid gradient at index {index}: {value}: {reason}")
            }

            // ---- MLEOptions ----
            OptError::InvalidTolGrad { tol, reason } => {
                write!(f, "Invalid gradient tolerance {tol}: {reason}")
            }
            OptError::InvalidTolCost { tol, reason } => {
                write!(f, "Invalid cost change tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::NoTolerancesProvided => write!(f, "No stopping rule provided"),
            OptError::InvalidLineSearch { name, reason } => {
                write!(f, "Invalid line searcher '{name}': {reason}")
            }
            OptError::InvalidLBFGSMem { mem, reason } => {
                write!(f, "Invalid L-BFGS memory {mem}: {reason}")
            }

            // ---- Cost function ----
            OptError::NonFiniteCost { value } => write!(f, "Non-finite log-likelihood: {value}"),

            // ---- Optimizer outcome ----
            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Invalid estimate at index {index}: {value}: {reason}")
            }
            OptError::MissingThetaHat => write!(f, "Solver returned no parameter estimate"),

            // ---- Argmin ----
            OptError::InvalidParameter { text } => write!(f, "Invalid parameter: {text}"),
            OptError::NotImplemented { text } => write!(f, "Not implemented: {text}"),
            OptError::NotInitialized { text } => write!(f, "Not initialized: {text}"),
            OptError::ConditionViolated { text } => write!(f, "Condition violated: {text}"),
            OptError::CheckPointNotFound { text } => write!(f, "Checkpoint not found: {text}"),
            OptError::PotentialBug { text } => write!(f, "Potential bug: {text}"),
            OptError::ImpossibleError { text } => write!(f, "Impossible error: {text}"),
            OptError::BackendError { text } => write!(f, "Backend error: {text}"),

            // ---- Finite differences ----
            OptError::HessianDimMismatch { expected, found } => {
                write!(
                    f,
                    "Hessian dimension mismatch: expected ({expected}, {expected}), found {found:?}"
                )
            }
            OptError::InvalidHessian { row, col, value } => {
                write!(f, "Invalid Hessian at ({row}, {col}): {value}, must be finite")
            }

            // ---- Volatility model ----
            OptError::NonFiniteResidual { index, value } => {
                write!(f, "Non-finite mean residual at t={index}: {value}")
            }
            OptError::NonFiniteVariance { index, value } => {
                write!(f, "Non-finite or non-positive conditional variance at t={index}: {value}")
            }
            OptError::InvalidDensity { value } => {
                write!(f, "Innovation log-density is not finite: {value}")
            }
            OptError::SeriesTooShort { len, required } => {
                write!(f, "Series of length {len} is too short, need at least {required}")
            }

            // ---- Parameters ----
            OptError::StationarityViolated { coeff_sum } => {
                write!(f, "Variance recursion not stationary: sum(alpha) + sum(beta) = {coeff_sum}")
            }
            OptError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, actual {actual}")
            }
            OptError::InvalidOmega { value } => {
                write!(f, "Invalid omega: {value}, must be finite and > 0")
            }
            OptError::AlphaLengthMismatch { expected, actual } => {
                write!(f, "Alpha length mismatch: expected {expected}, actual {actual}")
            }
            OptError::InvalidAlpha { index, value } => {
                write!(f, "Invalid alpha at index {index}: {value}, must be non-negative")
            }
            OptError::BetaLengthMismatch { expected, actual } => {
                write!(f, "Beta length mismatch: expected {expected}, actual {actual}")
            }
            OptError::InvalidBeta { index, value } => {
                write!(f, "Invalid beta at index {index}: {value}, must be non-negative")
            }
            OptError::InvalidShape { name, value } => {
                write!(f, "Invalid innovation parameter {name}: {value}")
            }
            OptError::InvalidThetaInput { index, value } => {
                write!(f, "Invalid theta input at index {index}: {value}, must be finite")
            }

            OptError::UnknownError => write!(f, "Unknown error"),
        }
    }
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        match original_err.downcast::<ArgminError>() {
            Ok(argmin_err) => match argmin_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => match err.downcast::<OptError>() {
                Ok(opt_err) => opt_err,
                Err(other) => OptError::BackendError { text: other.to_string() },
            },
        }
    }
}

impl From<VolError> for OptError {
    fn from(err: VolError) -> Self {
        match err {
            VolError::NonFiniteResidual { index, value } => {
                OptError::NonFiniteResidual { index, value }
            }
            VolError::NonFiniteVariance { index, value } => {
                OptError::NonFiniteVariance { index, value }
            }
            VolError::InvalidDensity { value } => OptError::InvalidDensity { value },
            VolError::SeriesTooShort { len, required } => {
                OptError::SeriesTooShort { len, required }
            }
            VolError::Param(param_err) => param_err.into(),
            VolError::Optimization(opt_err) => opt_err,
            _ => OptError::UnknownError,
        }
    }
}

impl From<ParamError> for OptError {
    fn from(err: ParamError) -> Self {
        match err {
            ParamError::StationarityViolated { coeff_sum } => {
                OptError::StationarityViolated { coeff_sum }
            }
            ParamError::ThetaLengthMismatch { expected, actual } => {
                OptError::ThetaLengthMismatch { expected, actual }
            }
            ParamError::InvalidOmega { value } => OptError::InvalidOmega { value },
            ParamError::AlphaLengthMismatch { expected, actual } => {
                OptError::AlphaLengthMismatch { expected, actual }
            }
            ParamError::InvalidAlpha { index, value } => OptError::InvalidAlpha { index, value },
            ParamError::BetaLengthMismatch { expected, actual } => {
                OptError::BetaLengthMismatch { expected, actual }
            }
            ParamError::InvalidBeta { index, value } => OptError::InvalidBeta { index, value },
            ParamError::InvalidShape { name, value } => OptError::InvalidShape { name, value },
            ParamError::InvalidThetaInput { index, value } => {
                OptError::InvalidThetaInput { index, value }
            }
            _ => OptError::UnknownError,
        }
    }
}
