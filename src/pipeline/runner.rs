//! End-to-end run: split, transform, fit candidates, select, forecast and
//! evaluate against the holdout.
//!
//! ```text
//! prices ─ split ─ train ─ ln ─ Δ^d ─ candidates ─ select ─ forecast ─ Σ/exp ─ RMSE
//!                └ test ───────────────────────────────────────────────────────┘
//! ```
//!
//! The forecast horizon equals the holdout length. Mean forecasts live on
//! the differenced log scale and are mapped back to prices from the last
//! training levels before they are compared with the held-out prices.
use crate::pipeline::{
    arima_order::ArimaOrder,
    backend::VolatilityBackend,
    config::{CandidateSpec, PipelineConfig},
    errors::{PipelineError, PipelineResult, Stage},
    evaluate::evaluate,
    loader::{PriceSeries, load_price_csv},
    selection::{CandidateReport, Selection, select_model},
    split::split,
    transform::{
        StationarityReport, determine_difference_order, difference, invert_transform,
        log_transform, test_stationarity, undifference,
    },
};
use crate::volatility::core::{ArmaOrder, GarchForecast};
use chrono::NaiveDate;
use ndarray::{Array1, ArrayView1, s};
use std::path::Path;
use tracing::info;

/// Everything a run produced.
#[derive(Debug)]
pub struct PipelineReport<M> {
    pub train_len: usize,
    pub difference_order: usize,
    /// ADF/KPSS on the transformed training series.
    pub stationarity: StationarityReport,
    /// Present when a candidate asked for the automatic mean order.
    pub arima_order: Option<ArimaOrder>,
    pub candidates: Vec<CandidateReport>,
    pub selected: usize,
    pub model: M,
    /// Forecast on the transformed scale.
    pub forecast: GarchForecast,
    pub forecast_prices: Array1<f64>,
    pub test_dates: Vec<NaiveDate>,
    pub test_prices: Array1<f64>,
    pub rmse: f64,
}

impl<M> PipelineReport<M> {
    pub fn selected_report(&self) -> &CandidateReport {
        &self.candidates[self.selected]
    }
}

/// Load `path` with the configured loader options and run the pipeline.
///
/// # Errors
/// Loader errors, then anything [`run_pipeline`] returns.
pub fn run_from_csv<B: VolatilityBackend, P: AsRef<Path>>(
    path: P, config: &PipelineConfig, backend: &B,
) -> PipelineResult<PipelineReport<B::Model>> {
    config.validate()?;
    let series = load_price_csv(path, &config.loader)?;
    run_pipeline(&series, config, backend)
}

/// Run every stage on an already loaded price series.
///
/// # Errors
/// The first stage error; every failure is terminal.
pub fn run_pipeline<B: VolatilityBackend>(
    series: &PriceSeries, config: &PipelineConfig, backend: &B,
) -> PipelineResult<PipelineReport<B::Model>> {
    config.validate()?;
    let parts = split(series, config.holdout)?;
    let (train, test) = (parts.train(), parts.test());
    info!(train = train.len(), test = test.len(), "split series");

    let log_train = log_transform(train.prices().view())?;
    let d = determine_difference_order(log_train.view(), &config.stationarity)?;
    let transformed = difference(log_train.view(), d)?;
    let stationarity = test_stationarity(transformed.view(), &config.stationarity)?;
    info!(
        d,
        adf_p = stationarity.adf_pvalue,
        kpss_p = stationarity.kpss_pvalue,
        "chose differencing order"
    );

    let arima_order = if config.candidates.iter().any(CandidateSpec::needs_auto_order) {
        Some(backend.auto_select_arima_order(log_train.view(), &config.arima_search())?)
    } else {
        None
    };
    let auto_mean = arima_order.map(|o| ArmaOrder::new(o.p, o.q));
    let shapes = config
        .candidates
        .iter()
        .map(|c| c.resolve(auto_mean))
        .collect::<PipelineResult<Vec<_>>>()?;
    info!(candidates = shapes.len(), "fitting candidates");

    let Selection { selected, mut model, reports } =
        select_model(backend, transformed.view(), &shapes, &config.adequacy_rule())?;

    let forecast = backend.forecast(&mut model, config.holdout)?;
    let forecast_prices = forecast_to_prices(forecast.mean.view(), log_train.view(), d)?;
    let rmse = evaluate(forecast_prices.view(), test.prices().view())?;
    info!(candidate = %reports[selected].label, horizon = config.holdout, rmse, "evaluated holdout");

    Ok(PipelineReport {
        train_len: train.len(),
        difference_order: d,
        stationarity,
        arima_order,
        candidates: reports,
        selected,
        model,
        forecast,
        forecast_prices,
        test_dates: test.dates().to_vec(),
        test_prices: test.prices().clone(),
        rmse,
    })
}

/// Map a mean forecast of the `d`-times differenced log series to prices.
///
/// For `d = 1` this is [`invert_transform`] without its anchor element; other
/// orders undo each difference from the last training value of the
/// corresponding partial difference.
///
/// # Errors
/// `InsufficientData` at the forecaster stage when the training series is
/// too short to supply the anchors.
pub fn forecast_to_prices(
    mean: ArrayView1<f64>, log_train: ArrayView1<f64>, d: usize,
) -> PipelineResult<Array1<f64>> {
    let short = || PipelineError::InsufficientData {
        stage: Stage::Forecaster,
        len: log_train.len(),
        required: d.max(1),
    };
    if d == 1 {
        let last = log_train.iter().next_back().copied().ok_or_else(short)?;
        return Ok(invert_transform(mean, last).slice(s![1..]).to_owned());
    }
    let anchors = (0..d)
        .map(|k| {
            let partial = difference(log_train, k)?;
            partial.iter().next_back().copied().ok_or_else(short)
        })
        .collect::<PipelineResult<Vec<f64>>>()?;
    Ok(undifference(mean, &anchors).mapv(f64::exp))
}
