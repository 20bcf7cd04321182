//! Innovation laws for ARMA–GARCH models.
//!
//! Every law is standardized (zero mean, unit variance) so that
//! `ε_t = σ_t z_t` and the conditional log-density of a residual is
//!
//! ```text
//! log f(ε_t | σ_t) = log f_z(ε_t / σ_t) − ½ ln σ²_t.
//! ```
//!
//! - [`Innovation`]: the family, chosen in configuration.
//! - [`InnovationShape`]: the family together with fitted shape parameters.
//!
//! The skewed Student-t is the Fernández–Steel construction re-centred and
//! re-scaled to unit variance: with `m₁ = 2√(ν−2) Γ((ν+1)/2) / (√π (ν−1) Γ(ν/2))`,
//! `μ_ξ = m₁ (ξ − 1/ξ)` and `σ_ξ² = (1 − m₁²)(ξ² + 1/ξ²) + 2m₁² − 1`,
//!
//! ```text
//! f_z(z) = 2 σ_ξ / (ξ + 1/ξ) · t_ν((σ_ξ z + μ_ξ) / ξ^{sgn(σ_ξ z + μ_ξ)}),
//! ```
//!
//! where `t_ν` is the unit-variance Student-t density.
use crate::volatility::{
    core::validation::{validate_nu, validate_xi},
    errors::{ParamResult, VolError, VolResult},
};
use serde::{Deserialize, Serialize};
use statrs::function::gamma::ln_gamma;
use std::f64::consts::PI;

const LN_2PI: f64 = 1.837_877_066_409_345_5;

/// Innovation family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Innovation {
    Normal,
    StudentT,
    #[default]
    SkewedStudentT,
}

impl Innovation {
    /// Number of estimated shape parameters (ν, ξ).
    pub fn n_shape_params(&self) -> usize {
        match self {
            Innovation::Normal => 0,
            Innovation::StudentT => 1,
            Innovation::SkewedStudentT => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Innovation::Normal => "norm",
            Innovation::StudentT => "std",
            Innovation::SkewedStudentT => "sstd",
        }
    }
}

/// Innovation family with its shape parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InnovationShape {
    Normal,
    StudentT { nu: f64 },
    SkewedStudentT { nu: f64, xi: f64 },
}

impl InnovationShape {
    /// Student-t with validated `ν > 2`.
    pub fn student_t(nu: f64) -> ParamResult<Self> {
        Ok(InnovationShape::StudentT { nu: validate_nu(nu)? })
    }

    /// Skewed Student-t with validated `ν > 2`, `ξ > 0`.
    pub fn skewed_student_t(nu: f64, xi: f64) -> ParamResult<Self> {
        Ok(InnovationShape::SkewedStudentT { nu: validate_nu(nu)?, xi: validate_xi(xi)? })
    }

    pub fn family(&self) -> Innovation {
        match self {
            InnovationShape::Normal => Innovation::Normal,
            InnovationShape::StudentT { .. } => Innovation::StudentT,
            InnovationShape::SkewedStudentT { .. } => Innovation::SkewedStudentT,
        }
    }

    /// Shape parameters in θ order (`ν`, then `ξ`).
    pub fn params(&self) -> Vec<f64> {
        match *self {
            InnovationShape::Normal => Vec::new(),
            InnovationShape::StudentT { nu } => vec![nu],
            InnovationShape::SkewedStudentT { nu, xi } => vec![nu, xi],
        }
    }

    /// Log-density of the standardized innovation at `z`.
    pub fn ln_pdf(&self, z: f64) -> f64 {
        match *self {
            InnovationShape::Normal => -0.5 * (LN_2PI + z * z),
            InnovationShape::StudentT { nu } => ln_std_t(z, nu),
            InnovationShape::SkewedStudentT { nu, xi } => {
                let m1 = skew_m1(nu);
                let mu = m1 * (xi - 1.0 / xi);
                let sigma = ((1.0 - m1 * m1) * (xi * xi + 1.0 / (xi * xi)) + 2.0 * m1 * m1 - 1.0)
                    .sqrt();
                let shifted = sigma * z + mu;
                let xi_side = if shifted >= 0.0 { xi } else { 1.0 / xi };
                (2.0 / (xi + 1.0 / xi)).ln() + sigma.ln() + ln_std_t(shifted / xi_side, nu)
            }
        }
    }

    /// Conditional log-density of a residual with variance `sigma2`.
    ///
    /// # Errors
    /// `InvalidDensity` when the result is not finite.
    pub fn log_density(&self, resid: f64, sigma2: f64) -> VolResult<f64> {
        let value = self.ln_pdf(resid / sigma2.sqrt()) - 0.5 * sigma2.ln();
        if !value.is_finite() {
            return Err(VolError::InvalidDensity { value });
        }
        Ok(value)
    }
}

/// Unit-variance Student-t log-density.
fn ln_std_t(z: f64, nu: f64) -> f64 {
    ln_gamma(0.5 * (nu + 1.0))
        - ln_gamma(0.5 * nu)
        - 0.5 * (PI * (nu - 2.0)).ln()
        - 0.5 * (nu + 1.0) * (z * z / (nu - 2.0)).ln_1p()
}

/// `E|z|` of the unit-variance Student-t.
fn skew_m1(nu: f64) -> f64 {
    2.0 * (nu - 2.0).sqrt() * (ln_gamma(0.5 * (nu + 1.0)) - ln_gamma(0.5 * nu)).exp()
        / (PI.sqrt() * (nu - 1.0))
}
