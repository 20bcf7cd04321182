//! garch-pipeline: forecast a daily price series with ARIMA/GARCH models.
//!
//! # Reference run (30-day holdout, default candidates)
//! garch-pipeline data/AAPL.csv
//!
//! # Custom configuration and candidates
//! garch-pipeline data/AAPL.csv --config run.json --holdout 20 \
//!     --candidate constant:1,1 --candidate auto:1,1:std
//!
//! Progress is logged to stderr (`RUST_LOG` overrides the default `info`);
//! the candidate table and the RMSE are printed to stdout.

use anyhow::Context;
use clap::Parser;
use garch_pipeline::{
    pipeline::{CandidateSpec, NativeBackend, PipelineConfig, PipelineReport, run_from_csv},
    volatility::{ArmaGarchModel, GarchParams},
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "garch-pipeline")]
#[command(about = "ARIMA/GARCH holdout forecast of a daily price series")]
#[command(version)]
struct Cli {
    /// CSV file with a date column and an adjusted-close column
    data: PathBuf,

    /// JSON configuration; missing fields take their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of trailing observations held out and forecast
    #[arg(long)]
    holdout: Option<usize>,

    /// Candidate as MEAN:P,Q[:DIST], e.g. constant:1,1 or auto:1,1:sstd (repeatable)
    #[arg(long = "candidate")]
    candidates: Vec<CandidateSpec>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
                .add_directive("argmin=warn".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(holdout) = cli.holdout {
        config.holdout = holdout;
    }
    if !cli.candidates.is_empty() {
        config.candidates = cli.candidates;
    }

    let backend = NativeBackend::new(config.garch.clone());
    let report = run_from_csv(&cli.data, &config, &backend)
        .with_context(|| format!("pipeline run on {}", cli.data.display()))?;

    print_report(&report);
    Ok(())
}

fn print_report(report: &PipelineReport<ArmaGarchModel>) {
    println!("Differencing order: {}", report.difference_order);
    println!(
        "  ADF p = {:.4}, KPSS p = {:.4} on the transformed series",
        report.stationarity.adf_pvalue, report.stationarity.kpss_pvalue
    );
    if let Some(order) = report.arima_order {
        println!("Automatic mean order: {order}");
    }

    println!();
    println!(
        "{:<28} {:>10} {:>10} {:>10} {:>9}",
        "candidate", "AIC", "LB p", "JB p", "adequate"
    );
    for (i, row) in report.candidates.iter().enumerate() {
        let mark = if i == report.selected { "*" } else { " " };
        println!(
            "{mark}{:<27} {:>10.4} {:>10.4} {:>10.4} {:>9}",
            row.label, row.aic, row.ljung_box_pvalue, row.jarque_bera_pvalue, row.adequate
        );
    }

    let model = &report.model;
    if let Some(params) = &model.fitted_params {
        println!();
        println!("Selected {}", model.shape);
        let values = params.to_vec();
        let errors = model.standard_errors().ok();
        for (i, name) in GarchParams::names(&model.shape).iter().enumerate() {
            match errors.as_ref().map(|se| se[i]) {
                Some(se) if se.is_finite() => println!("  {name:<6} {:>12.6} ({se:.6})", values[i]),
                _ => println!("  {name:<6} {:>12.6}", values[i]),
            }
        }
        println!("  persistence {:.6}", params.persistence());
    }

    println!();
    println!("{:<12} {:>12} {:>12}", "date", "forecast", "actual");
    for ((date, f), a) in report
        .test_dates
        .iter()
        .zip(report.forecast_prices.iter())
        .zip(report.test_prices.iter())
    {
        println!("{:<12} {f:>12.4} {a:>12.4}", date.to_string());
    }
    println!();
    println!("RMSE: {:.4}", report.rmse);
}
