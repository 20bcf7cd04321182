//! Jarque–Bera normality test, reported for fitted candidates but never
//! used to accept or reject one.
//!
//! `JB = n/6 · (S² + (K − 3)²/4)` with population moments, referred to
//! `χ²(2)`.
use crate::statistical_tests::{
    errors::{TestError, TestResult},
    validation::{mean, validate_series},
};
use statrs::distribution::{ChiSquared, ContinuousCDF};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct JarqueBeraOutcome {
    stat: f64,
    p_value: f64,
    skewness: f64,
    kurtosis: f64,
}

impl JarqueBeraOutcome {
    /// # Errors
    /// Validation errors (`n ≥ 3`, finite) and `ZeroVariance`.
    pub fn jarque_bera(data: &[f64]) -> TestResult<Self> {
        validate_series(data, 3)?;
        let n = data.len() as f64;
        let m = mean(data);
        let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
        for x in data {
            let d = x - m;
            let d2 = d * d;
            m2 += d2;
            m3 += d2 * d;
            m4 += d2 * d2;
        }
        m2 /= n;
        m3 /= n;
        m4 /= n;
        if m2 <= 0.0 {
            return Err(TestError::ZeroVariance);
        }
        let skewness = m3 / m2.powf(1.5);
        let kurtosis = m4 / (m2 * m2);
        let stat = n / 6.0 * (skewness * skewness + (kurtosis - 3.0).powi(2) / 4.0);
        let chi2 = ChiSquared::new(2.0).map_err(|e| TestError::Distribution(e.to_string()))?;
        Ok(Self { stat, p_value: chi2.sf(stat), skewness, kurtosis })
    }

    pub fn stat(&self) -> f64 {
        self.stat
    }

    pub fn p_value(&self) -> f64 {
        self.p_value
    }

    pub fn skewness(&self) -> f64 {
        self.skewness
    }

    /// Raw (non-excess) kurtosis.
    pub fn kurtosis(&self) -> f64 {
        self.kurtosis
    }
}
