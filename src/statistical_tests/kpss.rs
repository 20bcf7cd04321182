//! KPSS level-stationarity test.
//!
//! Purpose
//! -------
//! Test `H0: level stationary` against a unit root via
//!
//! ```text
//! η = Σ_t S_t² / (n² σ̂²_LR),    S_t = Σ_{s ≤ t} (y_s − ȳ),
//! ```
//!
//! where `σ̂²_LR` is the kernel long-run variance of the demeaned series,
//! computed by [`long_run_variance`].
//!
//! Key behaviors
//! -------------
//! - Truncation lag picked by [`KpssLag`]; the default is the short rule
//!   `trunc(4 (n/100)^{1/4})` with Bartlett weights.
//! - p-values interpolate linearly in an extended KPSS (1992) / Hobijn et
//!   al. table and are clamped to `[0.01, 0.90]`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Large `η` (small p) rejects stationarity, the reverse of ADF.
use crate::{
    inference::{
        hac::{HACOptions, long_run_variance},
        kernel::KernelType,
    },
    statistical_tests::{
        errors::{TestError, TestResult},
        validation::{mean, validate_series},
    },
};
use serde::{Deserialize, Serialize};

const MIN_OBS: usize = 10;

// Asymptotic upper-tail quantiles of η for the level case.
const CRIT_STATS: [f64; 11] =
    [0.0459, 0.0701, 0.1188, 0.1842, 0.2093, 0.2411, 0.2839, 0.347, 0.463, 0.574, 0.739];
const CRIT_PVALUES: [f64; 11] = [0.90, 0.75, 0.50, 0.30, 0.25, 0.20, 0.15, 0.10, 0.05, 0.025, 0.01];

/// Truncation lag rule for the long-run variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum KpssLag {
    /// `trunc(4 (n/100)^{1/4})`.
    #[default]
    Short,
    /// `trunc(12 (n/100)^{1/4})`.
    Long,
    Fixed(usize),
    /// Andrews plug-in bandwidth for the given kernel.
    PlugIn(KernelType),
}

impl KpssLag {
    fn hac_options(self, n: usize) -> HACOptions {
        let quarter = (n as f64 / 100.0).powf(0.25);
        match self {
            KpssLag::Short => {
                HACOptions::new(Some((4.0 * quarter) as usize), KernelType::Bartlett, true, false)
            }
            KpssLag::Long => {
                HACOptions::new(Some((12.0 * quarter) as usize), KernelType::Bartlett, true, false)
            }
            KpssLag::Fixed(lag) => HACOptions::new(Some(lag), KernelType::Bartlett, true, false),
            KpssLag::PlugIn(kernel) => HACOptions::new(None, kernel, true, false),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct KpssOutcome {
    stat: f64,
    p_value: f64,
    lag: usize,
}

impl KpssOutcome {
    /// Level KPSS statistic with the chosen lag rule.
    ///
    /// # Errors
    /// - Validation errors (finite data, at least 10 observations).
    /// - `ZeroVariance` when the long-run variance is not positive.
    /// - `Inference` when the long-run variance cannot be computed.
    pub fn kpss_level(data: &[f64], lag: KpssLag) -> TestResult<Self> {
        validate_series(data, MIN_OBS)?;
        let n = data.len();
        let y_bar = mean(data);

        let mut partial = 0.0;
        let mut sum_sq = 0.0;
        for &y in data {
            partial += y - y_bar;
            sum_sq += partial * partial;
        }

        let (lrv, used_lag) = long_run_variance(&lag.hac_options(n), data)?;
        if !(lrv.is_finite() && lrv > 0.0) {
            return Err(TestError::ZeroVariance);
        }
        let stat = sum_sq / ((n * n) as f64 * lrv);
        Ok(Self { stat, p_value: kpss_p_value(stat), lag: used_lag })
    }

    pub fn stat(&self) -> f64 {
        self.stat
    }

    pub fn p_value(&self) -> f64 {
        self.p_value
    }

    /// Bandwidth actually used, after clamping to `n − 1`.
    pub fn lag(&self) -> usize {
        self.lag
    }
}

/// Interpolated p-value for a level-KPSS statistic, clamped to `[0.01, 0.90]`.
pub fn kpss_p_value(stat: f64) -> f64 {
    if stat <= CRIT_STATS[0] {
        return CRIT_PVALUES[0];
    }
    let last = CRIT_STATS.len() - 1;
    if stat >= CRIT_STATS[last] {
        return CRIT_PVALUES[last];
    }
    let upper = CRIT_STATS.partition_point(|&c| c < stat);
    let (x0, x1) = (CRIT_STATS[upper - 1], CRIT_STATS[upper]);
    let (p0, p1) = (CRIT_PVALUES[upper - 1], CRIT_PVALUES[upper]);
    p0 + (stat - x0) * (p1 - p0) / (x1 - x0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{SeedableRng, rngs::StdRng};
    use rand_distr::{Distribution, StandardNormal};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // - Table interpolation and clamping.
    // - Lag rules.
    // - Statistic on deterministic stationary and trending series, and on a
    //   simulated random walk.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // `kpss_p_value` hits table nodes exactly, interpolates between them and
    // clamps outside.
    //
    // Given
    // -----
    // - The 10% and 5% nodes, their midpoint, and values beyond both ends.
    //
    // Expect
    // ------
    // - 0.10, 0.05, 0.075, 0.90, 0.01.
    fn kpss_p_value_interpolates_and_clamps() {
        // Act / Assert
        assert_relative_eq!(kpss_p_value(0.347), 0.10, epsilon = 1e-12);
        assert_relative_eq!(kpss_p_value(0.463), 0.05, epsilon = 1e-12);
        assert_relative_eq!(kpss_p_value(0.405), 0.075, epsilon = 1e-12);
        assert_eq!(kpss_p_value(0.01), 0.90);
        assert_eq!(kpss_p_value(5.0), 0.01);
    }

    #[test]
    // Purpose
    // -------
    // Lag rules produce the expected truncation for n = 200.
    //
    // Given
    // -----
    // - Short, Long and Fixed(3) on an alternating series of length 200.
    //
    // Expect
    // ------
    // - Lags 4, 14 and 3.
    fn kpss_lag_rules() {
        // Arrange
        let data: Vec<f64> = (0..200).map(|t| if t % 2 == 0 { 1.0 } else { -1.0 }).collect();

        // Act
        let short = KpssOutcome::kpss_level(&data, KpssLag::Short).expect("valid");
        let long = KpssOutcome::kpss_level(&data, KpssLag::Long).expect("valid");
        let fixed = KpssOutcome::kpss_level(&data, KpssLag::Fixed(3)).expect("valid");

        // Assert
        assert_eq!(short.lag(), 4);
        assert_eq!(long.lag(), 14);
        assert_eq!(fixed.lag(), 3);
    }

    #[test]
    // Purpose
    // -------
    // A mean-reverting series is accepted and a linear trend is rejected.
    //
    // Given
    // -----
    // - y_t = (−1)^t and y_t = t, n = 200, short lag.
    //
    // Expect
    // ------
    // - η ≈ 0.0125 and p = 0.90 for the alternating series; p = 0.01 for the
    //   trend.
    fn kpss_level_on_deterministic_series() {
        // Arrange
        let alternating: Vec<f64> =
            (0..200).map(|t| if t % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let trend: Vec<f64> = (0..200).map(|t| t as f64).collect();

        // Act
        let calm = KpssOutcome::kpss_level(&alternating, KpssLag::Short).expect("valid");
        let drifting = KpssOutcome::kpss_level(&trend, KpssLag::Short).expect("valid");

        // Assert
        assert_relative_eq!(calm.stat(), 0.0125, epsilon = 2e-4);
        assert_eq!(calm.p_value(), 0.90);
        assert_eq!(drifting.p_value(), 0.01);
    }

    #[test]
    // Purpose
    // -------
    // A Gaussian random walk is flagged as non-stationary.
    //
    // Given
    // -----
    // - 1000 cumulative N(0, 1) draws, fixed seed.
    //
    // Expect
    // ------
    // - p < 0.05.
    fn kpss_level_rejects_random_walk() {
        // Arrange
        let mut rng = StdRng::seed_from_u64(21);
        let mut level = 0.0;
        let walk: Vec<f64> = (0..1000)
            .map(|_| {
                let e: f64 = StandardNormal.sample(&mut rng);
                level += e;
                level
            })
            .collect();

        // Act
        let out = KpssOutcome::kpss_level(&walk, KpssLag::Short).expect("valid");

        // Assert
        assert!(out.p_value() < 0.05, "p = {}", out.p_value());
    }

    #[test]
    // Purpose
    // -------
    // A constant series has no long-run variance.
    //
    // Given
    // -----
    // - 20 equal values.
    //
    // Expect
    // ------
    // - `ZeroVariance`.
    fn kpss_level_rejects_constant_series() {
        // Act / Assert
        assert_eq!(KpssOutcome::kpss_level(&[2.0; 20], KpssLag::Short), Err(TestError::ZeroVariance));
    }
}
