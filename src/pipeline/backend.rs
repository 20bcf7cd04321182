//! Estimation backend used by the pipeline.
//!
//! The pipeline never touches likelihoods or optimizers directly: it asks a
//! [`VolatilityBackend`] to fit, forecast and diagnose candidates. This keeps
//! selection, back-transformation and evaluation testable with a mock that
//! returns canned numbers. [`NativeBackend`] is the production implementation
//! on top of [`ArmaGarchModel`].
use crate::{
    optimization::loglik_optimizer::OptimOutcome,
    pipeline::{
        arima_order::{self, ArimaOrder, ArimaSearch, fit_css},
        errors::{PipelineError, PipelineResult, Stage},
    },
    statistical_tests::{JarqueBeraOutcome, LjungBoxOutcome},
    volatility::{
        core::{GarchForecast, GarchOptions, ModelShape, ReturnSeries},
        errors::VolError,
        models::ArmaGarchModel,
    },
};
use ndarray::{Array1, ArrayView1};
use tracing::{debug, warn};

/// Residual diagnostics of one fitted candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diagnostics {
    pub ljung_box_stat: f64,
    pub ljung_box_pvalue: f64,
    pub jarque_bera_stat: f64,
    pub jarque_bera_pvalue: f64,
}

/// Narrow interface between the pipeline and an estimation library.
///
/// `series` arguments are always the transformed (log, differenced) training
/// series. `diagnostic_tests` and `auto_select_arima_order` have defaults
/// built on this crate's tests and CSS search.
pub trait VolatilityBackend {
    type Model;

    /// Fit one candidate.
    ///
    /// # Errors
    /// `ModelFit` naming the candidate.
    fn fit_variance_model(
        &self, series: ArrayView1<f64>, spec: &ModelShape,
    ) -> PipelineResult<Self::Model>;

    /// `horizon`-step mean and variance forecast in the transformed space.
    ///
    /// # Errors
    /// `Forecast` naming the candidate.
    fn forecast(&self, model: &mut Self::Model, horizon: usize) -> PipelineResult<GarchForecast>;

    /// Per-observation AIC of a fitted model.
    fn information_criterion(&self, model: &Self::Model) -> PipelineResult<f64>;

    fn standardized_residuals(&self, model: &Self::Model) -> PipelineResult<Array1<f64>>;

    /// Ljung–Box (raw residuals, `fitdf = 0`) and Jarque–Bera on `residuals`.
    ///
    /// # Errors
    /// `Statistical` at the model-fitter stage.
    fn diagnostic_tests(
        &self, residuals: ArrayView1<f64>, lag: usize,
    ) -> PipelineResult<Diagnostics> {
        let data = residuals.to_vec();
        let wrap = |e| PipelineError::statistical(Stage::ModelFitter, e);
        let lb = LjungBoxOutcome::ljung_box(&data, lag, 0).map_err(wrap)?;
        let jb = JarqueBeraOutcome::jarque_bera(&data).map_err(wrap)?;
        Ok(Diagnostics {
            ljung_box_stat: lb.stat(),
            ljung_box_pvalue: lb.p_value(),
            jarque_bera_stat: jb.stat(),
            jarque_bera_pvalue: jb.p_value(),
        })
    }

    /// `(p, d, q)` for the log-level series `series`.
    fn auto_select_arima_order(
        &self, series: ArrayView1<f64>, search: &ArimaSearch,
    ) -> PipelineResult<ArimaOrder> {
        arima_order::auto_select_arima_order(series, search)
    }
}

/// Maximum-likelihood ARMA–GARCH backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NativeBackend {
    pub options: GarchOptions,
}

impl NativeBackend {
    pub fn new(options: GarchOptions) -> Self {
        NativeBackend { options }
    }
}

/// Reject optimizer runs whose `θ̂` is not a maximum-likelihood estimate:
/// no termination reason, an early solver exit, or the iteration cap.
fn ensure_converged(label: &str, outcome: &OptimOutcome) -> PipelineResult<()> {
    if outcome.converged && !outcome.hit_max_iter() {
        return Ok(());
    }
    Err(PipelineError::ModelFit {
        candidate: label.to_string(),
        reason: format!(
            "optimizer did not converge after {} iterations ({})",
            outcome.iterations, outcome.status
        ),
    })
}

impl VolatilityBackend for NativeBackend {
    type Model = ArmaGarchModel;

    /// Starts the ARMA block from a CSS fit when the mean has lags; a failed
    /// CSS fit falls back to the default start.
    ///
    /// A run that stops at the iteration cap, exits the solver early or ends
    /// without a termination reason is reported as a fit failure.
    fn fit_variance_model(
        &self, series: ArrayView1<f64>, spec: &ModelShape,
    ) -> PipelineResult<ArmaGarchModel> {
        let label = spec.to_string();
        let data = ReturnSeries::new(series.to_owned())
            .map_err(|e| PipelineError::model_fit(&label, e))?;

        let mean_start = if spec.mean.n_params() > 0 {
            match fit_css(series, spec.mean.p, spec.mean.q) {
                Ok(css) => Some(css.mean_start(data.mean())),
                Err(err) => {
                    warn!(candidate = %label, %err, "CSS start failed, using default mean start");
                    None
                }
            }
        } else {
            None
        };

        let mut model = ArmaGarchModel::new(*spec, self.options.clone());
        let theta0 = model
            .initial_theta(&data, mean_start.as_ref())
            .map_err(|e| PipelineError::model_fit(&label, e))?;
        model.fit(theta0, &data).map_err(|e| PipelineError::model_fit(&label, e))?;

        let outcome = model
            .results
            .as_ref()
            .ok_or_else(|| PipelineError::model_fit(&label, VolError::ModelNotFitted))?;
        ensure_converged(&label, outcome)?;
        let loglik = model.log_likelihood().map_err(|e| PipelineError::model_fit(&label, e))?;
        if !loglik.is_finite() {
            return Err(PipelineError::ModelFit {
                candidate: label,
                reason: format!("log-likelihood {loglik} at the optimum"),
            });
        }
        debug!(
            candidate = %label,
            loglik,
            iterations = outcome.iterations,
            status = %outcome.status,
            "fitted candidate"
        );
        Ok(model)
    }

    fn forecast(
        &self, model: &mut ArmaGarchModel, horizon: usize,
    ) -> PipelineResult<GarchForecast> {
        let label = model.shape.to_string();
        model.forecast(horizon).map_err(|e| PipelineError::forecast(&label, e))
    }

    fn information_criterion(&self, model: &ArmaGarchModel) -> PipelineResult<f64> {
        model.aic().map_err(|e| PipelineError::model_fit(&model.shape.to_string(), e))
    }

    fn standardized_residuals(&self, model: &ArmaGarchModel) -> PipelineResult<Array1<f64>> {
        model
            .standardized_residuals()
            .map_err(|e| PipelineError::model_fit(&model.shape.to_string(), e))
    }
}
