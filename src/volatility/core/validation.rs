//! Validation helpers for ARMA–GARCH parameters and optimizer input.
//!
//! Each helper checks one invariant and reports the first violation as a
//! [`ParamError`]; none of them panic.
use crate::{
    optimization::numerical_stability::transformations::{GENERAL_TOL, STATIONARITY_MARGIN},
    volatility::{
        core::shape::ModelShape,
        errors::{ParamError, ParamResult},
    },
};
use ndarray::ArrayView1;

/// θ has the layout length for `shape` and finite entries.
pub fn validate_theta(theta: ArrayView1<f64>, shape: &ModelShape) -> ParamResult<()> {
    let expected = shape.n_params();
    if theta.len() != expected {
        return Err(ParamError::ThetaLengthMismatch { expected, actual: theta.len() });
    }
    if let Some((index, &value)) = theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(ParamError::InvalidThetaInput { index, value });
    }
    Ok(())
}

pub fn validate_omega(omega: f64) -> ParamResult<()> {
    if !omega.is_finite() || omega <= 0.0 {
        return Err(ParamError::InvalidOmega { value: omega });
    }
    Ok(())
}

/// α has length `q` and finite, non-negative entries.
pub fn validate_alpha(alpha: ArrayView1<f64>, q: usize) -> ParamResult<()> {
    if alpha.len() != q {
        return Err(ParamError::AlphaLengthMismatch { expected: q, actual: alpha.len() });
    }
    if let Some((index, &value)) =
        alpha.iter().enumerate().find(|(_, v)| !v.is_finite() || **v < 0.0)
    {
        return Err(ParamError::InvalidAlpha { index, value });
    }
    Ok(())
}

/// β has length `p` and finite, non-negative entries.
pub fn validate_beta(beta: ArrayView1<f64>, p: usize) -> ParamResult<()> {
    if beta.len() != p {
        return Err(ParamError::BetaLengthMismatch { expected: p, actual: beta.len() });
    }
    if let Some((index, &value)) =
        beta.iter().enumerate().find(|(_, v)| !v.is_finite() || **v < 0.0)
    {
        return Err(ParamError::InvalidBeta { index, value });
    }
    Ok(())
}

/// `slack ≥ 0` and `Σα + Σβ + slack = 1 − margin` up to [`GENERAL_TOL`].
pub fn validate_stationarity_and_slack(
    alpha: ArrayView1<f64>, beta: ArrayView1<f64>, slack: f64,
) -> ParamResult<()> {
    if !slack.is_finite() || slack < 0.0 {
        return Err(ParamError::InvalidSlack { value: slack });
    }
    let coeff_sum = alpha.sum() + beta.sum();
    if coeff_sum >= 1.0 - STATIONARITY_MARGIN + GENERAL_TOL
        || (coeff_sum + slack - (1.0 - STATIONARITY_MARGIN)).abs() > GENERAL_TOL
    {
        return Err(ParamError::StationarityViolated { coeff_sum });
    }
    Ok(())
}

/// Mean coefficients are finite.
pub fn validate_mean_coefficients(
    name: &'static str, coeffs: ArrayView1<f64>,
) -> ParamResult<()> {
    if let Some((index, &value)) = coeffs.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(ParamError::InvalidMeanCoefficient { name, index, value });
    }
    Ok(())
}

/// Student-t degrees of freedom: finite and `> 2` so the variance exists.
pub fn validate_nu(nu: f64) -> ParamResult<f64> {
    if !nu.is_finite() || nu <= 2.0 {
        return Err(ParamError::InvalidShape { name: "nu", value: nu });
    }
    Ok(nu)
}

/// Fernández–Steel skew: finite and `> 0`.
pub fn validate_xi(xi: f64) -> ParamResult<f64> {
    if !xi.is_finite() || xi <= 0.0 {
        return Err(ParamError::InvalidShape { name: "xi", value: xi });
    }
    Ok(xi)
}
