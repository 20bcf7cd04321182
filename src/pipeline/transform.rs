//! Stationarity transform: log prices, differencing and its inverse.
//!
//! The differencing order is the smallest `d` for which the ADF test
//! rejects a unit root *and* the KPSS test does not reject stationarity.
//! Forecasts made on the differenced log scale are mapped back to prices by
//! cumulative summation from the last observed level(s) and exponentiation.
use crate::{
    pipeline::errors::{PipelineError, PipelineResult, Stage},
    statistical_tests::{AdfOutcome, KpssLag, KpssOutcome},
};
use ndarray::{Array1, ArrayView1, s};
use serde::{Deserialize, Serialize};

/// Acceptance rule and search range for the differencing order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationarityOptions {
    /// ADF must reject at this level (`p < adf_alpha`).
    pub adf_alpha: f64,
    /// KPSS must not reject at this level (`p > kpss_alpha`).
    pub kpss_alpha: f64,
    /// Largest differencing order tried.
    pub max_order: usize,
    /// ADF augmentation lags; `None` uses `trunc((n − 1)^{1/3})`.
    pub adf_lag: Option<usize>,
    pub kpss_lag: KpssLag,
}

impl Default for StationarityOptions {
    fn default() -> Self {
        StationarityOptions {
            adf_alpha: 0.01,
            kpss_alpha: 0.10,
            max_order: 2,
            adf_lag: None,
            kpss_lag: KpssLag::Short,
        }
    }
}

impl StationarityOptions {
    /// # Errors
    /// `InvalidConfig` unless both significance levels lie in `(0, 1)`.
    pub fn validate(&self) -> PipelineResult<()> {
        for (name, alpha) in [("adf_alpha", self.adf_alpha), ("kpss_alpha", self.kpss_alpha)] {
            if !(alpha > 0.0 && alpha < 1.0) {
                return Err(PipelineError::InvalidConfig {
                    reason: format!("{name} = {alpha} must lie in (0, 1)"),
                });
            }
        }
        Ok(())
    }
}

/// ADF and KPSS results for one series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationarityReport {
    pub adf_stat: f64,
    pub adf_pvalue: f64,
    pub adf_lag: usize,
    pub kpss_stat: f64,
    pub kpss_pvalue: f64,
    pub kpss_lag: usize,
    adf_alpha: f64,
    kpss_alpha: f64,
}

impl StationarityReport {
    /// ADF rejects a unit root and KPSS does not reject stationarity.
    pub fn is_stationary(&self) -> bool {
        self.adf_pvalue < self.adf_alpha && self.kpss_pvalue > self.kpss_alpha
    }
}

/// Natural log of every price.
///
/// # Errors
/// `NonPositivePrice` at the first `price <= 0` (or NaN).
pub fn log_transform(prices: ArrayView1<f64>) -> PipelineResult<Array1<f64>> {
    if let Some((index, &value)) = prices.iter().enumerate().find(|(_, p)| !(**p > 0.0)) {
        return Err(PipelineError::NonPositivePrice { index, value });
    }
    Ok(prices.mapv(f64::ln))
}

/// `order`-th difference; `order == 0` returns a copy.
///
/// # Errors
/// `InsufficientData` when `order >= len`.
pub fn difference(series: ArrayView1<f64>, order: usize) -> PipelineResult<Array1<f64>> {
    if order > 0 && order >= series.len() {
        return Err(PipelineError::InsufficientData {
            stage: Stage::Stationarity,
            len: series.len(),
            required: order + 1,
        });
    }
    let mut out = series.to_owned();
    for _ in 0..order {
        let next = &out.slice(s![1..]) - &out.slice(s![..-1]);
        out = next;
    }
    Ok(out)
}

/// Undo one difference: `cumsum([anchor] ++ diffs)`, length `h + 1`.
pub fn invert_differencing(diffs: ArrayView1<f64>, anchor: f64) -> Array1<f64> {
    let mut out = Array1::<f64>::zeros(diffs.len() + 1);
    out[0] = anchor;
    for (i, d) in diffs.iter().enumerate() {
        out[i + 1] = out[i] + d;
    }
    out
}

/// Map a forecast of log returns back to prices; element 0 is the anchor
/// price `exp(last_log_price)`.
pub fn invert_transform(mean_forecast: ArrayView1<f64>, last_log_price: f64) -> Array1<f64> {
    invert_differencing(mean_forecast, last_log_price).mapv(f64::exp)
}

/// Undo `d = anchors.len()` differences of a forecast.
///
/// `anchors[k]` is the last in-sample value of the `k`-times differenced
/// series. The result holds the `h` forecast levels without the anchor.
pub fn undifference(forecast: ArrayView1<f64>, anchors: &[f64]) -> Array1<f64> {
    anchors.iter().rev().fold(forecast.to_owned(), |level, &anchor| {
        invert_differencing(level.view(), anchor).slice(s![1..]).to_owned()
    })
}

/// Run ADF and KPSS on `series`.
///
/// # Errors
/// `Statistical` for test failures (too short, constant, non-finite).
pub fn test_stationarity(
    series: ArrayView1<f64>, opts: &StationarityOptions,
) -> PipelineResult<StationarityReport> {
    let data = series.to_vec();
    let wrap = |e| PipelineError::statistical(Stage::Stationarity, e);
    let adf = AdfOutcome::adf(&data, opts.adf_lag).map_err(wrap)?;
    let kpss = KpssOutcome::kpss_level(&data, opts.kpss_lag).map_err(wrap)?;
    Ok(StationarityReport {
        adf_stat: adf.stat(),
        adf_pvalue: adf.p_value(),
        adf_lag: adf.lag(),
        kpss_stat: kpss.stat(),
        kpss_pvalue: kpss.p_value(),
        kpss_lag: kpss.lag(),
        adf_alpha: opts.adf_alpha,
        kpss_alpha: opts.kpss_alpha,
    })
}

/// Smallest `d ∈ 0..=max_order` whose `d`-th difference is stationary.
///
/// # Errors
/// - `NonStationary` with the last p-values when no order qualifies.
/// - Differencing and test errors.
pub fn determine_difference_order(
    series: ArrayView1<f64>, opts: &StationarityOptions,
) -> PipelineResult<usize> {
    let mut last = None;
    for d in 0..=opts.max_order {
        let diffed = difference(series, d)?;
        let report = test_stationarity(diffed.view(), opts)?;
        tracing::debug!(
            d,
            adf_p = report.adf_pvalue,
            kpss_p = report.kpss_pvalue,
            stationary = report.is_stationary(),
            "stationarity check"
        );
        if report.is_stationary() {
            return Ok(d);
        }
        last = Some(report);
    }
    let (adf_pvalue, kpss_pvalue) =
        last.map_or((f64::NAN, f64::NAN), |r| (r.adf_pvalue, r.kpss_pvalue));
    Err(PipelineError::NonStationary { max_order: opts.max_order, adf_pvalue, kpss_pvalue })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use rand::{SeedableRng, rngs::StdRng};
    use rand_distr::{Distribution, StandardNormal};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // - Log transform domain and differencing arithmetic.
    // - Inverse transforms: single and multiple differences.
    // - Order selection on a simulated log-price random walk.
    // -------------------------------------------------------------------------

    fn log_random_walk(n: usize, seed: u64) -> Array1<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut level = 4.0;
        let mut out = Array1::<f64>::zeros(n);
        for t in 0..n {
            let z: f64 = StandardNormal.sample(&mut rng);
            level += 0.0005 + 0.02 * z;
            out[t] = level;
        }
        out
    }

    #[test]
    // Purpose
    // -------
    // Non-positive prices are refused instead of producing NaN or -inf.
    //
    // Given
    // -----
    // - (1, e, 0, 2) and (1, -3).
    //
    // Expect
    // ------
    // - `NonPositivePrice` at index 2 and 1; (1, e) maps to (0, 1).
    fn log_transform_rejects_non_positive_prices() {
        // Act / Assert
        assert_eq!(
            log_transform(array![1.0, std::f64::consts::E, 0.0, 2.0].view()),
            Err(PipelineError::NonPositivePrice { index: 2, value: 0.0 })
        );
        assert_eq!(
            log_transform(array![1.0, -3.0].view()),
            Err(PipelineError::NonPositivePrice { index: 1, value: -3.0 })
        );
        let ok = log_transform(array![1.0, std::f64::consts::E].view()).expect("positive");
        assert_relative_eq!(ok[1], 1.0, epsilon = 1e-15);
    }

    #[test]
    // Purpose
    // -------
    // Differencing shortens the series by its order and rejects orders that
    // consume the whole series.
    //
    // Given
    // -----
    // - (1, 4, 9, 16).
    //
    // Expect
    // ------
    // - d = 0 copy, d = 1 (3, 5, 7), d = 2 (2, 2); d = 4 fails.
    fn difference_orders() {
        // Arrange
        let x = array![1.0, 4.0, 9.0, 16.0];

        // Act / Assert
        assert_eq!(difference(x.view(), 0).expect("copy"), x);
        assert_eq!(difference(x.view(), 1).expect("d = 1"), array![3.0, 5.0, 7.0]);
        assert_eq!(difference(x.view(), 2).expect("d = 2"), array![2.0, 2.0]);
        assert!(matches!(
            difference(x.view(), 4),
            Err(PipelineError::InsufficientData { len: 4, required: 5, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Differencing a log-price path and inverting from its first value
    // reproduces the path; the price inverse exponentiates it.
    //
    // Given
    // -----
    // - log S = ln(100, 101.5, 99.8, 102.3).
    //
    // Expect
    // ------
    // - `invert_differencing(difference(log S, 1), log S[0]) == log S`.
    // - `invert_transform` returns the prices, anchor first.
    fn invert_differencing_round_trip() {
        // Arrange
        let prices = array![100.0, 101.5, 99.8, 102.3];
        let log_s = log_transform(prices.view()).expect("positive");

        // Act
        let diffs = difference(log_s.view(), 1).expect("d = 1");
        let back = invert_differencing(diffs.view(), log_s[0]);
        let back_prices = invert_transform(diffs.view(), log_s[0]);

        // Assert
        assert_eq!(back.len(), log_s.len());
        for i in 0..4 {
            assert_relative_eq!(back[i], log_s[i], epsilon = 1e-12);
            assert_relative_eq!(back_prices[i], prices[i], max_relative = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // `undifference` reverses a second difference given both anchors.
    //
    // Given
    // -----
    // - x = (1, 4, 9, 16, 25); history (1, 4, 9) with anchors
    //   (9, 9 − 4 = 5); the true second differences of the tail (2, 2).
    //
    // Expect
    // ------
    // - Forecast levels (16, 25).
    fn undifference_second_order() {
        // Act
        let levels = undifference(array![2.0, 2.0].view(), &[9.0, 5.0]);

        // Assert
        assert_eq!(levels, array![16.0, 25.0]);
    }

    /// Log prices whose returns are `0.0005 + 0.02 (z_t − 0.9 z_{t−1})`: an
    /// IMA(1, 1) walk, unit root in levels with strongly mean-reverting
    /// first differences.
    fn log_ima_walk(n: usize, seed: u64) -> Array1<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut level = 4.0;
        let mut z_prev = 0.0_f64;
        let mut out = Array1::<f64>::zeros(n);
        for t in 0..n {
            let z: f64 = StandardNormal.sample(&mut rng);
            level += 0.0005 + 0.02 * (z - 0.9 * z_prev);
            z_prev = z;
            out[t] = level;
        }
        out
    }

    #[test]
    // Purpose
    // -------
    // A drifting log-price walk is rejected in levels and settles on the
    // first difference.
    //
    // Given
    // -----
    // - 1500 steps of an IMA(1, 1) walk with drift, seed 3, default options.
    //
    // Expect
    // ------
    // - The level fails the joint rule (the drift alone drives KPSS to its
    //   1% floor).
    // - d = 1, and the once-differenced series passes both tests.
    fn random_walk_is_differenced_once() {
        // Arrange
        let log_prices = log_ima_walk(1500, 3);
        let opts = StationarityOptions::default();

        // Act
        let level = test_stationarity(log_prices.view(), &opts).expect("valid series");
        let d = determine_difference_order(log_prices.view(), &opts).expect("stationary");
        let once = difference(log_prices.view(), 1).expect("long enough");
        let first = test_stationarity(once.view(), &opts).expect("valid series");

        // Assert
        assert!(!level.is_stationary());
        assert_eq!(d, 1);
        assert!(first.is_stationary(), "adf p = {}, kpss p = {}", first.adf_pvalue, first.kpss_pvalue);
    }

    #[test]
    // Purpose
    // -------
    // With `max_order = 0` a random walk cannot be accepted and the error
    // carries the last p-values.
    //
    // Given
    // -----
    // - The same random walk.
    //
    // Expect
    // ------
    // - `NonStationary { max_order: 0, .. }` with finite p-values.
    fn non_stationary_reports_last_attempt() {
        // Arrange
        let log_prices = log_random_walk(1500, 3);
        let opts = StationarityOptions { max_order: 0, ..StationarityOptions::default() };

        // Act
        let err = determine_difference_order(log_prices.view(), &opts).expect_err("rejected");

        // Assert
        match err {
            PipelineError::NonStationary { max_order, adf_pvalue, kpss_pvalue } => {
                assert_eq!(max_order, 0);
                assert!(adf_pvalue.is_finite() && kpss_pvalue.is_finite());
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
