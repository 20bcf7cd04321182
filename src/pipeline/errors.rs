//! Pipeline-level errors.
//!
//! Every failure is terminal for a run and names the stage it came from, so
//! the binary can report where the run stopped and with which candidate.
use crate::{statistical_tests::TestError, volatility::errors::VolError};

pub type PipelineResult<T> = Result<T, PipelineError>;

/// The five pipeline stages, with the fitter and forecaster split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Loader,
    Splitter,
    Stationarity,
    ModelFitter,
    Forecaster,
    Evaluator,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Loader => "loader",
            Stage::Splitter => "splitter",
            Stage::Stationarity => "stationarity",
            Stage::ModelFitter => "model fitter",
            Stage::Forecaster => "forecaster",
            Stage::Evaluator => "evaluator",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    // ---- Loader ----
    DataFormat { line: usize, reason: String },
    Io { path: String, reason: String },

    // ---- Length checks (any stage) ----
    InsufficientData { stage: Stage, len: usize, required: usize },

    // ---- Stationarity ----
    NonPositivePrice { index: usize, value: f64 },
    NonStationary { max_order: usize, adf_pvalue: f64, kpss_pvalue: f64 },

    // ---- Model fitting and forecasting ----
    ModelFit { candidate: String, reason: String },
    NoAdequateCandidate { evaluated: usize },
    Forecast { candidate: String, reason: String },

    // ---- Evaluation ----
    LengthMismatch { forecast: usize, actual: usize },

    // ---- Configuration ----
    InvalidConfig { reason: String },

    // ---- Wrapped test failures ----
    Statistical { stage: Stage, source: TestError },
}

impl PipelineError {
    /// Stage that raised the error.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::DataFormat { .. }
            | PipelineError::Io { .. }
            | PipelineError::InvalidConfig { .. } => Stage::Loader,
            PipelineError::InsufficientData { stage, .. }
            | PipelineError::Statistical { stage, .. } => *stage,
            PipelineError::NonPositivePrice { .. } | PipelineError::NonStationary { .. } => {
                Stage::Stationarity
            }
            PipelineError::ModelFit { .. } | PipelineError::NoAdequateCandidate { .. } => {
                Stage::ModelFitter
            }
            PipelineError::Forecast { .. } => Stage::Forecaster,
            PipelineError::LengthMismatch { .. } => Stage::Evaluator,
        }
    }

    /// Wrap a model error raised while fitting `candidate`.
    pub fn model_fit(candidate: &str, err: VolError) -> Self {
        PipelineError::ModelFit { candidate: candidate.to_string(), reason: err.to_string() }
    }

    /// Wrap a model error raised while forecasting `candidate`.
    pub fn forecast(candidate: &str, err: VolError) -> Self {
        PipelineError::Forecast { candidate: candidate.to_string(), reason: err.to_string() }
    }

    pub fn statistical(stage: Stage, source: TestError) -> Self {
        PipelineError::Statistical { stage, source }
    }
}

impl std::error::Error for PipelineError {}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stage = self.stage();
        match self {
            PipelineError::DataFormat { line, reason } => {
                write!(f, "[{stage}] malformed input at line {line}: {reason}")
            }
            PipelineError::Io { path, reason } => {
                write!(f, "[{stage}] cannot read '{path}': {reason}")
            }
            PipelineError::InsufficientData { len, required, .. } => {
                write!(f, "[{stage}] series of length {len} is too short, need at least {required}")
            }
            PipelineError::NonPositivePrice { index, value } => {
                write!(f, "[{stage}] price {value} at index {index} is not positive")
            }
            PipelineError::NonStationary { max_order, adf_pvalue, kpss_pvalue } => write!(
                f,
                "[{stage}] series not stationary after differencing {max_order} times \
                 (ADF p = {adf_pvalue:.4}, KPSS p = {kpss_pvalue:.4})"
            ),
            PipelineError::ModelFit { candidate, reason } => {
                write!(f, "[{stage}] fitting {candidate} failed: {reason}")
            }
            PipelineError::NoAdequateCandidate { evaluated } => write!(
                f,
                "[{stage}] none of the {evaluated} fitted candidates passed the Ljung-Box check"
            ),
            PipelineError::Forecast { candidate, reason } => {
                write!(f, "[{stage}] forecasting with {candidate} failed: {reason}")
            }
            PipelineError::LengthMismatch { forecast, actual } => write!(
                f,
                "[{stage}] forecast has {forecast} values but {actual} observations were held out"
            ),
            PipelineError::InvalidConfig { reason } => {
                write!(f, "[{stage}] invalid configuration: {reason}")
            }
            PipelineError::Statistical { source, .. } => write!(f, "[{stage}] {source}"),
        }
    }
}
