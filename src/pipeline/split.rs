//! Train/holdout split: the last `horizon` observations are held out.
use crate::pipeline::{
    errors::{PipelineError, PipelineResult, Stage},
    loader::PriceSeries,
};

/// Holdout length of the reference run.
pub const DEFAULT_HOLDOUT: usize = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    train: PriceSeries,
    test: PriceSeries,
}

impl Split {
    pub fn train(&self) -> &PriceSeries {
        &self.train
    }

    pub fn test(&self) -> &PriceSeries {
        &self.test
    }
}

/// Split `series` into its first `N − horizon` and last `horizon` points.
///
/// # Errors
/// - `InvalidConfig` when `horizon == 0`.
/// - `InsufficientData` when `N <= horizon`.
pub fn split(series: &PriceSeries, horizon: usize) -> PipelineResult<Split> {
    if horizon == 0 {
        return Err(PipelineError::InvalidConfig {
            reason: "holdout horizon must be positive".to_string(),
        });
    }
    let n = series.len();
    if n <= horizon {
        return Err(PipelineError::InsufficientData {
            stage: Stage::Splitter,
            len: n,
            required: horizon + 1,
        });
    }
    let cut = n - horizon;
    Ok(Split { train: series.slice(0..cut), test: series.slice(cut..n) })
}
