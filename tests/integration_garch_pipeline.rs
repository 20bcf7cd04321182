//! Integration tests for the forecasting pipeline.
//!
//! Purpose
//! -------
//! - Run the whole pipeline through the public API on a simulated price
//!   path written to a CSV file: loading, splitting, stationarity, the
//!   automatic ARIMA order, maximum-likelihood ARMA–GARCH fits, selection,
//!   forecasting and RMSE.
//! - Check that failures surface with the stage that raised them.
//!
//! Coverage
//! --------
//! - `pipeline::runner::run_from_csv` with `NativeBackend`.
//! - `pipeline::config::PipelineConfig` loaded from JSON.
//! - `volatility::models::ArmaGarchModel` accessors on the selected model.
//!
//! Exclusions
//! ----------
//! - Exact parameter values and the reference RMSE, which depend on the
//!   real price file; the simulated path only fixes orders of magnitude.
//! - Selection and back-transformation logic in isolation, covered by unit
//!   tests with mock backends.
use chrono::{Duration, NaiveDate};
use garch_pipeline::pipeline::{
    NativeBackend, PipelineConfig, PipelineError, Stage, run_from_csv,
};
use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, StandardNormal};
use std::{fs, path::PathBuf};
use tempfile::TempDir;

const HEADER: &str = "Date,Open,High,Low,Close,Adj Close,Volume";

/// Purpose
/// -------
/// Simulate daily prices whose log returns follow a constant-mean
/// GARCH(1, 1) with Gaussian shocks.
///
/// Parameters
/// ----------
/// - `n`: number of prices.
/// - `seed`: `StdRng` seed.
///
/// Returns
/// -------
/// - `n` prices starting at 150 with `μ = 5e-4`, `ω = 4.5e-6`, `α = 0.08`,
///   `β = 0.90` (unconditional daily volatility 1.5%).
fn simulate_prices(n: usize, seed: u64) -> Vec<f64> {
    let (mu, omega, alpha, beta) = (5e-4, 4.5e-6, 0.08, 0.90);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut sigma2 = omega / (1.0 - alpha - beta);
    let mut eps_prev = 0.0_f64;
    let mut log_p = 150.0_f64.ln();
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        sigma2 = omega + alpha * eps_prev * eps_prev + beta * sigma2;
        let z: f64 = StandardNormal.sample(&mut rng);
        eps_prev = sigma2.sqrt() * z;
        log_p += mu + eps_prev;
        out.push(log_p.exp());
    }
    out
}

/// Purpose
/// -------
/// Write `prices` as a Yahoo-style CSV with consecutive calendar dates.
///
/// Returns
/// -------
/// - The path of the file inside `dir`.
fn write_price_csv(dir: &TempDir, name: &str, prices: &[f64]) -> PathBuf {
    let start = NaiveDate::from_ymd_opt(2018, 1, 2).expect("valid date");
    let mut text = String::from(HEADER);
    text.push('\n');
    for (i, p) in prices.iter().enumerate() {
        let date = start + Duration::days(i as i64);
        text.push_str(&format!(
            "{},{p:.6},{p:.6},{p:.6},{p:.6},{p:.6},1000000\n",
            date.format("%Y-%m-%d")
        ));
    }
    let path = dir.path().join(name);
    fs::write(&path, text).expect("temp file is writable");
    path
}

#[test]
// Purpose
// -------
// A full run on 1000 simulated prices selects an adequate candidate and
// produces a finite holdout RMSE.
//
// Given
// -----
// - GARCH(1, 1) log returns, seed 2024, written to CSV.
// - JSON config: holdout 30, candidates constant:1,1 and auto:1,1 (skewed
//   t), Ljung–Box threshold 0.01.
//
// Expect
// ------
// - d ∈ {1, 2}, the automatic order uses the same d.
// - Two candidate reports; the selected one is adequate.
// - 30 positive forecast prices and a finite, positive RMSE.
// - Fitted persistence below one and finite standard errors for ω.
fn pipeline_runs_end_to_end_on_simulated_prices() {
    // Arrange
    let dir = TempDir::new().expect("temp dir");
    let path = write_price_csv(&dir, "prices.csv", &simulate_prices(1000, 2024));
    let config = PipelineConfig::from_json_str(
        r#"{
            "holdout": 30,
            "adequacy_threshold": 0.01,
            "candidates": [
                { "mean": "constant", "variance": { "p": 1, "q": 1 } },
                { "mean": "auto", "variance": { "p": 1, "q": 1 } }
            ]
        }"#,
    )
    .expect("valid config");
    let backend = NativeBackend::new(config.garch.clone());

    // Act
    let report = run_from_csv(&path, &config, &backend).expect("pipeline runs");

    // Assert
    assert!((1..=2).contains(&report.difference_order), "d = {}", report.difference_order);
    let order = report.arima_order.expect("auto candidate requested an order");
    assert_eq!(order.d, report.difference_order);
    assert!(order.p <= 3 && order.q <= 3);

    assert_eq!(report.train_len, 970);
    assert_eq!(report.candidates.len(), 2);
    assert!(report.selected_report().adequate);
    assert!(report.candidates.iter().all(|c| c.aic.is_finite()));

    assert_eq!(report.forecast.horizon(), 30);
    assert_eq!(report.forecast_prices.len(), 30);
    assert!(report.forecast_prices.iter().all(|p| p.is_finite() && *p > 0.0));
    assert!(report.forecast.variance.iter().all(|v| *v > 0.0));
    assert!(report.rmse.is_finite() && report.rmse > 0.0);

    let params = report.model.fitted_params.as_ref().expect("selected model is fitted");
    assert!(params.persistence() < 1.0);
    assert!(params.omega > 0.0);
    let resid = report.model.standardized_residuals().expect("fitted");
    assert_eq!(resid.len(), 970 - report.difference_order);
}

#[test]
// Purpose
// -------
// A non-positive price stops the run at the stationarity stage, after the
// loader has accepted the file.
//
// Given
// -----
// - 200 simulated prices with the 50th set to 0.
//
// Expect
// ------
// - `NonPositivePrice { index: 49 }`, stage Stationarity.
fn non_positive_price_fails_in_transform() {
    // Arrange
    let dir = TempDir::new().expect("temp dir");
    let mut prices = simulate_prices(200, 3);
    prices[49] = 0.0;
    let path = write_price_csv(&dir, "zero.csv", &prices);
    let config = PipelineConfig::default();

    // Act
    let err = run_from_csv(&path, &config, &NativeBackend::default()).unwrap_err();

    // Assert
    assert!(matches!(err, PipelineError::NonPositivePrice { index: 49, .. }), "got {err:?}");
    assert_eq!(err.stage(), Stage::Stationarity);
}

#[test]
// Purpose
// -------
// Malformed input and missing files are loader errors.
//
// Given
// -----
// - A CSV whose third data row has a non-numeric price; a path that does
//   not exist.
//
// Expect
// ------
// - `DataFormat` at file line 4; `Io` for the missing file; both at the
//   loader stage.
fn loader_errors_carry_stage_and_line() {
    // Arrange
    let dir = TempDir::new().expect("temp dir");
    let bad = dir.path().join("bad.csv");
    fs::write(
        &bad,
        format!(
            "{HEADER}\n2020-01-02,1,1,1,1,10.0,5\n2020-01-03,1,1,1,1,10.5,5\n\
             2020-01-06,1,1,1,1,n/a,5\n"
        ),
    )
    .expect("temp file is writable");
    let config = PipelineConfig::default();
    let backend = NativeBackend::default();

    // Act
    let format_err = run_from_csv(&bad, &config, &backend).unwrap_err();
    let io_err = run_from_csv(dir.path().join("missing.csv"), &config, &backend).unwrap_err();

    // Assert
    assert!(matches!(format_err, PipelineError::DataFormat { line: 4, .. }), "got {format_err:?}");
    assert!(matches!(io_err, PipelineError::Io { .. }), "got {io_err:?}");
    assert_eq!(format_err.stage(), Stage::Loader);
    assert_eq!(io_err.stage(), Stage::Loader);
}
