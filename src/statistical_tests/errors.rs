//! statistical_tests::errors: error surface of the diagnostic tests.
//!
//! Purpose
//! -------
//! One enum, [`TestError`], for the unit-root, stationarity and residual
//! tests in this subtree, with the [`TestResult`] alias.
//!
//! Conventions
//! -----------
//! - Messages name the violated constraint ("lag must satisfy 1 ≤ lag < n")
//!   rather than internal details.
//! - Long-run variance failures from `inference` are wrapped, not
//!   flattened, so callers can still match on them.
use crate::inference::errors::InferenceError;

pub type TestResult<T> = Result<T, TestError>;

#[derive(Debug, Clone, PartialEq)]
pub enum TestError {
    // ---- Input validation ----
    InsufficientData { len: usize, required: usize },
    InvalidData { index: usize, value: f64 },
    InvalidLag { lag: usize, len: usize },
    InvalidDegreesOfFreedom { lag: usize, fitdf: usize },

    // ---- Numerical ----
    ZeroVariance,
    SingularRegression,
    Distribution(String),

    // ---- Nested ----
    Inference(InferenceError),
}

impl std::error::Error for TestError {}

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestError::InsufficientData { len, required } => {
                write!(f, "Need at least {required} observations, got {len}.")
            }
            TestError::InvalidData { index, value } => {
                write!(f, "Invalid data value {value} at index {index}. Must be a finite number.")
            }
            TestError::InvalidLag { lag, len } => {
                write!(f, "Invalid lag {lag}. Must satisfy 1 ≤ lag < n (n = {len}).")
            }
            TestError::InvalidDegreesOfFreedom { lag, fitdf } => {
                write!(f, "Fitted degrees of freedom {fitdf} must be smaller than the lag {lag}.")
            }
            TestError::ZeroVariance => write!(f, "Series has zero variance."),
            TestError::SingularRegression => {
                write!(f, "Test regression is singular; the design matrix is rank deficient.")
            }
            TestError::Distribution(msg) => write!(f, "Reference distribution error: {msg}"),
            TestError::Inference(err) => write!(f, "{err}"),
        }
    }
}

impl From<InferenceError> for TestError {
    fn from(err: InferenceError) -> Self {
        TestError::Inference(err)
    }
}
