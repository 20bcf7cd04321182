//! Errors for long-run variance, bandwidth selection and covariance
//! estimation. `InferenceResult<T>` is the shared alias.

#[derive(Debug, Clone, PartialEq)]
pub enum InferenceError {
    // ---- Bandwidth selection ----
    StationarityViolated { phi: f64 },
    DenominatorTooSmall { denominator: f64 },
    OrderNotSupported { ord: usize },

    // ---- Long-run variance ----
    EmptySeries,

    // ---- Anyhow catchall (arima crate) ----
    Anyhow(String),

    UnknownError,
}

pub type InferenceResult<T> = Result<T, InferenceError>;

impl std::error::Error for InferenceError {}

impl From<anyhow::Error> for InferenceError {
    fn from(err: anyhow::Error) -> Self {
        InferenceError::Anyhow(err.to_string())
    }
}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InferenceError::StationarityViolated { phi } => {
                write!(f, "Inference Error: AR(1) coefficient {phi} too close to a unit root")
            }
            InferenceError::DenominatorTooSmall { denominator } => write!(
                f,
                "Inference Error: Denominator too small ({denominator}) in bandwidth calculation"
            ),
            InferenceError::OrderNotSupported { ord } => {
                write!(f, "Inference Error: Order {ord} not supported for bandwidth calculation")
            }
            InferenceError::EmptySeries => {
                write!(f, "Inference Error: long-run variance of an empty series")
            }
            InferenceError::Anyhow(msg) => write!(f, "Inference Error: {msg}"),
            InferenceError::UnknownError => write!(f, "Inference Error: Unknown error occurred"),
        }
    }
}
