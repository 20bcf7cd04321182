//! Ljung–Box portmanteau test for residual autocorrelation.
//!
//! `Q = n(n+2) Σ_{k=1}^{h} ρ̂_k² / (n − k)`, referred to `χ²(h − fitdf)`.
//! Model selection calls this on standardized residuals with `h = 20` and
//! treats a non-rejection as evidence that the mean dynamics are adequate.
//!
//! The adequacy decision at the threshold itself is fixed by
//! [`BoundaryRule`]: under the default `Exclusive` rule a p-value exactly
//! equal to the threshold counts as a rejection, matching the usual
//! "reject when p ≤ α" convention.
use crate::statistical_tests::{
    errors::{TestError, TestResult},
    validation::{mean, validate_lag, validate_series},
};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// How a p-value equal to the threshold is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoundaryRule {
    /// Adequate iff `p > threshold`.
    #[default]
    Exclusive,
    /// Adequate iff `p >= threshold`.
    Inclusive,
}

impl BoundaryRule {
    /// Whether `p_value` fails to reject the null at `threshold`.
    pub fn accepts(self, p_value: f64, threshold: f64) -> bool {
        match self {
            BoundaryRule::Exclusive => p_value > threshold,
            BoundaryRule::Inclusive => p_value >= threshold,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LjungBoxOutcome {
    lag: usize,
    df: usize,
    stat: f64,
    p_value: f64,
}

impl LjungBoxOutcome {
    /// Run the test on `data` with `lag` autocorrelations; `fitdf` is
    /// subtracted from the degrees of freedom (0 for raw residuals).
    ///
    /// # Errors
    /// - Validation errors (`n ≥ lag + 1`, finite data, `1 ≤ lag < n`).
    /// - `InvalidDegreesOfFreedom` when `fitdf ≥ lag`.
    /// - `ZeroVariance` for a constant series.
    pub fn ljung_box(data: &[f64], lag: usize, fitdf: usize) -> TestResult<Self> {
        validate_series(data, 2)?;
        validate_lag(lag, data.len())?;
        if fitdf >= lag {
            return Err(TestError::InvalidDegreesOfFreedom { lag, fitdf });
        }
        let n = data.len();
        let m = mean(data);
        let denom: f64 = data.iter().map(|x| (x - m).powi(2)).sum();
        if denom <= 0.0 {
            return Err(TestError::ZeroVariance);
        }

        let sum: f64 = (1..=lag)
            .map(|k| {
                let rho = data[k..]
                    .iter()
                    .zip(data)
                    .map(|(x_t, x_lag)| (x_t - m) * (x_lag - m))
                    .sum::<f64>()
                    / denom;
                rho * rho / (n - k) as f64
            })
            .sum();
        let stat = (n * (n + 2)) as f64 * sum;
        let df = lag - fitdf;
        let chi2 = ChiSquared::new(df as f64).map_err(|e| TestError::Distribution(e.to_string()))?;
        Ok(Self { lag, df, stat, p_value: chi2.sf(stat) })
    }

    pub fn lag(&self) -> usize {
        self.lag
    }

    pub fn df(&self) -> usize {
        self.df
    }

    pub fn stat(&self) -> f64 {
        self.stat
    }

    pub fn p_value(&self) -> f64 {
        self.p_value
    }

    /// No significant autocorrelation at `threshold` under `rule`.
    pub fn passes(&self, threshold: f64, rule: BoundaryRule) -> bool {
        rule.accepts(self.p_value, threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // - Statistic and p-value against a hand computation.
    // - The boundary rule at exactly the threshold.
    // - Input errors.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Q and its p-value match a hand computation.
    //
    // Given
    // -----
    // - x = [1, 3, 2, 5, 4, 6, 5, 8, 7, 9], lag 2, fitdf 0.
    // - ρ̂₁ = 0.45, ρ̂₂ = 0.5 ⇒ Q = 120 (0.2025/9 + 0.25/8) = 6.45.
    //
    // Expect
    // ------
    // - stat = 6.45, p = exp(-Q/2) ≈ 0.039756 (χ² with 2 df).
    fn ljung_box_matches_hand_computation() {
        // Arrange
        let x = [1.0, 3.0, 2.0, 5.0, 4.0, 6.0, 5.0, 8.0, 7.0, 9.0];

        // Act
        let out = LjungBoxOutcome::ljung_box(&x, 2, 0).expect("valid input");

        // Assert
        assert!((out.stat() - 6.45).abs() < 1e-10, "Q = {}", out.stat());
        assert!((out.p_value() - (-6.45_f64 / 2.0).exp()).abs() < 1e-9);
        assert_eq!(out.df(), 2);
        assert!(!out.passes(0.05, BoundaryRule::Exclusive));
    }

    #[test]
    // Purpose
    // -------
    // A p-value exactly at the threshold is inadequate under the default
    // rule and adequate under the inclusive one; values on either side are
    // classified the same way by both rules.
    //
    // Given
    // -----
    // - p ∈ {0.0499, 0.05, 0.0501} with threshold 0.05.
    //
    // Expect
    // ------
    // - Exclusive: false, false, true. Inclusive: false, true, true.
    fn boundary_rule_at_threshold() {
        // Arrange
        let alpha = 0.05;

        // Act / Assert
        assert!(!BoundaryRule::Exclusive.accepts(0.0499, alpha));
        assert!(!BoundaryRule::Exclusive.accepts(0.05, alpha));
        assert!(BoundaryRule::Exclusive.accepts(0.0501, alpha));
        assert!(!BoundaryRule::Inclusive.accepts(0.0499, alpha));
        assert!(BoundaryRule::Inclusive.accepts(0.05, alpha));
        assert!(BoundaryRule::Inclusive.accepts(0.0501, alpha));
        assert_eq!(BoundaryRule::default(), BoundaryRule::Exclusive);
    }

    #[test]
    // Purpose
    // -------
    // Invalid configurations are rejected before any computation.
    //
    // Given
    // -----
    // - fitdf equal to the lag; a constant series; lag ≥ n.
    //
    // Expect
    // ------
    // - `InvalidDegreesOfFreedom`, `ZeroVariance`, `InvalidLag`.
    fn ljung_box_rejects_invalid_input() {
        // Arrange
        let x = [0.3, -0.1, 0.4, 0.2, -0.5];

        // Act / Assert
        assert_eq!(
            LjungBoxOutcome::ljung_box(&x, 2, 2),
            Err(TestError::InvalidDegreesOfFreedom { lag: 2, fitdf: 2 })
        );
        assert_eq!(LjungBoxOutcome::ljung_box(&[1.0; 6], 2, 0), Err(TestError::ZeroVariance));
        assert!(matches!(
            LjungBoxOutcome::ljung_box(&x, 5, 0),
            Err(TestError::InvalidLag { lag: 5, len: 5 })
        ));
    }
}
