//! ARMA–GARCH parameterization: model space ↔ optimizer space.
//!
//! Model space ([`GarchParams`]):
//!
//! ```text
//! m_t  = μ + Σ φ_i (y_{t−i} − μ) + Σ θ_j ε_{t−j}
//! σ²_t = ω + Σ α_i ε²_{t−i} + Σ β_j σ²_{t−j}
//! ```
//!
//! Optimizer space (θ, layout fixed by [`ModelShape`]):
//!
//! - `μ = θ_μ · s` with `s` the sample standard deviation.
//! - `φ = D(tanh θ_φ)` and `θ = −D(tanh θ_θ)` where `D` is the
//!   Durbin–Levinson map, so the AR part is stationary and the MA part
//!   invertible for every θ.
//! - `ω = softplus(θ_ω) · s²`.
//! - `(α, β, slack)` = softmax of `(θ_α, θ_β, 0)` scaled to `1 − margin`.
//! - `ν = 2.05 + softplus(θ_ν)`, `ξ = exp(θ_ξ)`, with the raw coordinates
//!   clamped so extreme line-search probes stay finite.
//!
//! The sample moments make θ roughly unit-free, so one set of optimizer
//! tolerances fits any return scale.
use crate::{
    optimization::numerical_stability::transformations::{
        PACF_BOUND, STATIONARITY_MARGIN, coeffs_to_pacf, pacf_to_coeffs, safe_softmax,
        safe_softmax_inv, safe_softplus, safe_softplus_inv,
    },
    volatility::{
        core::{
            data::ReturnSeries,
            innovations::{Innovation, InnovationShape},
            shape::ModelShape,
            validation::{
                validate_alpha, validate_beta, validate_mean_coefficients, validate_omega,
                validate_stationarity_and_slack, validate_theta,
            },
        },
        errors::{ParamError, ParamResult},
    },
};
use ndarray::{Array1, ArrayView1, s};

/// Lower bound of the Student-t degrees of freedom.
pub const NU_FLOOR: f64 = 2.05;

/// Raw shape coordinates are clamped to these bounds so every finite θ maps
/// to a finite density: `ν ≤ 2.05 + 200`, `ξ ∈ [e⁻³, e³]`, `ω > 0`.
const NU_THETA_MAX: f64 = 200.0;
const OMEGA_THETA_MIN: f64 = -40.0;
const LN_XI_BOUND: f64 = 3.0;

/// Starting persistence split: `Σα = 0.05`, `Σβ = 0.90`, `ω = 0.05 s²`.
const INIT_ALPHA_TOTAL: f64 = 0.05;
const INIT_BETA_TOTAL: f64 = 0.90;
const INIT_OMEGA_RATIO: f64 = 0.05;
const INIT_NU: f64 = 6.0;
const INIT_XI: f64 = 1.0;

/// Starting values for the mean equation, e.g. from a least-squares ARMA fit.
#[derive(Debug, Clone, PartialEq)]
pub struct MeanStart {
    pub mu: f64,
    pub ar: Array1<f64>,
    pub ma: Array1<f64>,
}

/// Validated model-space parameters of an ARMA–GARCH model.
#[derive(Debug, Clone, PartialEq)]
pub struct GarchParams {
    pub mu: f64,
    /// AR coefficients φ₁..φ_{p_m}.
    pub ar: Array1<f64>,
    /// MA coefficients θ₁..θ_{q_m}.
    pub ma: Array1<f64>,
    pub omega: f64,
    pub alpha: Array1<f64>,
    pub beta: Array1<f64>,
    /// `1 − margin − Σα − Σβ ≥ 0`.
    pub slack: f64,
    pub innovation: InnovationShape,
}

impl GarchParams {
    /// Build validated parameters directly in model space.
    ///
    /// # Errors
    /// The first violated invariant (finite mean coefficients, `ω > 0`,
    /// non-negative α/β with the right lengths, persistence below
    /// `1 − margin`).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mu: f64, ar: Array1<f64>, ma: Array1<f64>, omega: f64, alpha: Array1<f64>,
        beta: Array1<f64>, innovation: InnovationShape, shape: &ModelShape,
    ) -> ParamResult<Self> {
        if !mu.is_finite() {
            return Err(ParamError::InvalidMeanCoefficient { name: "mu", index: 0, value: mu });
        }
        validate_mean_coefficients("ar", ar.view())?;
        validate_mean_coefficients("ma", ma.view())?;
        validate_omega(omega)?;
        validate_alpha(alpha.view(), shape.variance.q)?;
        validate_beta(beta.view(), shape.variance.p)?;
        let slack = 1.0 - STATIONARITY_MARGIN - alpha.sum() - beta.sum();
        validate_stationarity_and_slack(alpha.view(), beta.view(), slack)?;
        Ok(GarchParams { mu, ar, ma, omega, alpha, beta, slack, innovation })
    }

    /// Map an optimizer vector to model space.
    ///
    /// # Errors
    /// Layout/finiteness errors on θ and any domain violation after mapping.
    pub fn from_theta(
        theta: ArrayView1<f64>, shape: &ModelShape, data: &ReturnSeries,
    ) -> ParamResult<Self> {
        validate_theta(theta, shape)?;
        let (pm, qm) = (shape.mean.p, shape.mean.q);
        let (p, q) = (shape.variance.p, shape.variance.q);

        let mu = theta[0] * data.scale();
        let ar = pacf_to_coeffs(theta.slice(s![1..1 + pm]).mapv(f64::tanh).view());
        let ma = -pacf_to_coeffs(theta.slice(s![1 + pm..1 + pm + qm]).mapv(f64::tanh).view());

        let oi = shape.omega_idx();
        let omega = safe_softplus(theta[oi].max(OMEGA_THETA_MIN)) * data.variance();
        validate_omega(omega)?;
        let (weights, slack) =
            safe_softmax(theta.slice(s![oi + 1..oi + 1 + q + p]), 1.0 - STATIONARITY_MARGIN);
        let alpha = weights.slice(s![..q]).to_owned();
        let beta = weights.slice(s![q..]).to_owned();
        validate_alpha(alpha.view(), q)?;
        validate_beta(beta.view(), p)?;
        validate_stationarity_and_slack(alpha.view(), beta.view(), slack)?;

        let si = shape.shape_idx();
        let innovation = match shape.innovation {
            Innovation::Normal => InnovationShape::Normal,
            Innovation::StudentT => InnovationShape::student_t(nu_from_theta(theta[si]))?,
            Innovation::SkewedStudentT => InnovationShape::skewed_student_t(
                nu_from_theta(theta[si]),
                theta[si + 1].clamp(-LN_XI_BOUND, LN_XI_BOUND).exp(),
            )?,
        };
        Ok(GarchParams { mu, ar, ma, omega, alpha, beta, slack, innovation })
    }

    /// Map to optimizer space; inverse of [`GarchParams::from_theta`] up to
    /// the clamping of tiny weights and of partial autocorrelations at
    /// `±PACF_BOUND`.
    pub fn to_theta(&self, shape: &ModelShape, data: &ReturnSeries) -> Array1<f64> {
        let mut theta = Vec::with_capacity(shape.n_params());
        theta.push(self.mu / data.scale());
        theta.extend(coeffs_to_pacf(self.ar.view()).iter().map(|r| bounded_atanh(*r)));
        let neg_ma = self.ma.mapv(|c| -c);
        theta.extend(coeffs_to_pacf(neg_ma.view()).iter().map(|r| bounded_atanh(*r)));
        theta.push(safe_softplus_inv(self.omega / data.variance()));
        let weights: Array1<f64> = self.alpha.iter().chain(self.beta.iter()).copied().collect();
        theta.extend(safe_softmax_inv(weights.view(), self.slack));
        match self.innovation {
            InnovationShape::Normal => {}
            InnovationShape::StudentT { nu } => theta.push(safe_softplus_inv(nu - NU_FLOOR)),
            InnovationShape::SkewedStudentT { nu, xi } => {
                theta.push(safe_softplus_inv(nu - NU_FLOOR));
                theta.push(xi.ln());
            }
        }
        Array1::from(theta)
    }

    /// Starting point for estimation.
    ///
    /// Mean block from `mean_start` when its lengths match the shape,
    /// otherwise `μ = ȳ` and zero ARMA coefficients. Variance block at
    /// `Σα = 0.05`, `Σβ = 0.90` split evenly over the lags, `ω = 0.05 s²`;
    /// `ν = 6`, `ξ = 1`.
    ///
    /// # Errors
    /// Propagates [`GarchParams::new`] failures (e.g. a non-finite start).
    pub fn initial(
        shape: &ModelShape, data: &ReturnSeries, mean_start: Option<&MeanStart>,
    ) -> ParamResult<Self> {
        let (pm, qm) = (shape.mean.p, shape.mean.q);
        let (mu, ar, ma) = match mean_start {
            Some(start) if start.ar.len() == pm && start.ma.len() == qm => {
                (start.mu, start.ar.clone(), start.ma.clone())
            }
            _ => (data.mean(), Array1::zeros(pm), Array1::zeros(qm)),
        };
        let (p, q) = (shape.variance.p, shape.variance.q);
        let alpha = Array1::from_elem(q, INIT_ALPHA_TOTAL / q.max(1) as f64);
        let beta = Array1::from_elem(p, INIT_BETA_TOTAL / p.max(1) as f64);
        let innovation = match shape.innovation {
            Innovation::Normal => InnovationShape::Normal,
            Innovation::StudentT => InnovationShape::student_t(INIT_NU)?,
            Innovation::SkewedStudentT => InnovationShape::skewed_student_t(INIT_NU, INIT_XI)?,
        };
        GarchParams::new(
            mu,
            ar,
            ma,
            INIT_OMEGA_RATIO * data.variance(),
            alpha,
            beta,
            innovation,
            shape,
        )
    }

    /// `Σα + Σβ`.
    pub fn persistence(&self) -> f64 {
        self.alpha.sum() + self.beta.sum()
    }

    /// Long-run variance `ω / (1 − Σα − Σβ)`.
    pub fn uncond_variance(&self) -> f64 {
        self.omega / (1.0 - self.persistence())
    }

    /// Natural parameters in θ order:
    /// `[μ, φ.., θ.., ω, α.., β.., ν?, ξ?]`.
    pub fn to_vec(&self) -> Array1<f64> {
        let mut out = vec![self.mu];
        out.extend(self.ar.iter());
        out.extend(self.ma.iter());
        out.push(self.omega);
        out.extend(self.alpha.iter());
        out.extend(self.beta.iter());
        out.extend(self.innovation.params());
        Array1::from(out)
    }

    /// Labels matching [`GarchParams::to_vec`].
    pub fn names(shape: &ModelShape) -> Vec<String> {
        let mut names = vec!["mu".to_string()];
        names.extend((1..=shape.mean.p).map(|i| format!("ar{i}")));
        names.extend((1..=shape.mean.q).map(|j| format!("ma{j}")));
        names.push("omega".to_string());
        names.extend((1..=shape.variance.q).map(|i| format!("alpha{i}")));
        names.extend((1..=shape.variance.p).map(|j| format!("beta{j}")));
        match shape.innovation {
            Innovation::Normal => {}
            Innovation::StudentT => names.push("shape".to_string()),
            Innovation::SkewedStudentT => {
                names.push("shape".to_string());
                names.push("skew".to_string());
            }
        }
        names
    }
}

fn nu_from_theta(raw: f64) -> f64 {
    NU_FLOOR + safe_softplus(raw.min(NU_THETA_MAX))
}

fn bounded_atanh(r: f64) -> f64 {
    r.clamp(-PACF_BOUND, PACF_BOUND).atanh()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volatility::core::shape::{ArmaOrder, GarchOrder};
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // - θ ↔ model-space round trip for a full ARMA(1, 1)–GARCH(1, 1) with
    //   skewed Student-t innovations.
    // - Starting values and derived quantities.
    // - Rejection of non-stationary persistence in `GarchParams::new`.
    // -------------------------------------------------------------------------

    fn full_shape() -> ModelShape {
        ModelShape::new(
            ArmaOrder::new(1, 1),
            GarchOrder::new(1, 1).expect("valid order"),
            Innovation::SkewedStudentT,
        )
    }

    fn sample() -> ReturnSeries {
        ReturnSeries::new(array![0.01, -0.02, 0.015, 0.003, -0.007, 0.012]).expect("valid")
    }

    #[test]
    // Purpose
    // -------
    // `from_theta(to_theta(p)) == p` for interior parameters.
    //
    // Given
    // -----
    // - μ = 0.001, φ = 0.3, θ = -0.2, ω = 1e-5, α = 0.08, β = 0.9, ν = 7,
    //   ξ = 1.1.
    //
    // Expect
    // ------
    // - Every field recovered within 1e-10 (relative for ω).
    fn theta_round_trip() {
        // Arrange
        let shape = full_shape();
        let data = sample();
        let params = GarchParams::new(
            0.001,
            array![0.3],
            array![-0.2],
            1e-5,
            array![0.08],
            array![0.9],
            InnovationShape::skewed_student_t(7.0, 1.1).expect("valid shape"),
            &shape,
        )
        .expect("valid params");

        // Act
        let theta = params.to_theta(&shape, &data);
        let back = GarchParams::from_theta(theta.view(), &shape, &data).expect("valid theta");

        // Assert
        assert_eq!(theta.len(), shape.n_params());
        assert_relative_eq!(back.mu, 0.001, epsilon = 1e-12);
        assert_relative_eq!(back.ar[0], 0.3, epsilon = 1e-10);
        assert_relative_eq!(back.ma[0], -0.2, epsilon = 1e-10);
        assert_relative_eq!(back.omega, 1e-5, max_relative = 1e-10);
        assert_relative_eq!(back.alpha[0], 0.08, epsilon = 1e-10);
        assert_relative_eq!(back.beta[0], 0.9, epsilon = 1e-10);
        match back.innovation {
            InnovationShape::SkewedStudentT { nu, xi } => {
                assert_relative_eq!(nu, 7.0, epsilon = 1e-10);
                assert_relative_eq!(xi, 1.1, epsilon = 1e-10);
            }
            other => panic!("unexpected innovation {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Starting values follow the documented split and derived quantities
    // follow from them.
    //
    // Given
    // -----
    // - Constant-mean GARCH(2, 2), Student-t.
    //
    // Expect
    // ------
    // - α = (0.025, 0.025), β = (0.45, 0.45), ω = 0.05 s², persistence 0.95,
    //   unconditional variance s², μ = ȳ; labels in θ order.
    fn initial_values_and_derived_quantities() {
        // Arrange
        let shape = ModelShape::new(
            ArmaOrder::default(),
            GarchOrder::new(2, 2).expect("valid order"),
            Innovation::StudentT,
        );
        let data = sample();

        // Act
        let init = GarchParams::initial(&shape, &data, None).expect("valid start");

        // Assert
        assert_eq!(init.alpha, array![0.025, 0.025]);
        assert_eq!(init.beta, array![0.45, 0.45]);
        assert_relative_eq!(init.omega, 0.05 * data.variance(), max_relative = 1e-14);
        assert_relative_eq!(init.persistence(), 0.95, epsilon = 1e-14);
        assert_relative_eq!(init.uncond_variance(), data.variance(), max_relative = 1e-12);
        assert_relative_eq!(init.mu, data.mean(), epsilon = 1e-16);
        assert_eq!(init.to_vec().len(), shape.n_params());
        assert_eq!(
            GarchParams::names(&shape),
            vec!["mu", "omega", "alpha1", "alpha2", "beta1", "beta2", "shape"]
        );
    }

    #[test]
    // Purpose
    // -------
    // Model-space construction refuses persistence at or above one.
    //
    // Given
    // -----
    // - α = 0.3, β = 0.75.
    //
    // Expect
    // ------
    // - `InvalidSlack` (the implied slack is negative).
    fn new_rejects_explosive_persistence() {
        // Act
        let result = GarchParams::new(
            0.0,
            array![],
            array![],
            1e-5,
            array![0.3],
            array![0.75],
            InnovationShape::Normal,
            &ModelShape::new(
                ArmaOrder::default(),
                GarchOrder::new(1, 1).expect("valid order"),
                Innovation::Normal,
            ),
        );

        // Assert
        assert!(matches!(result, Err(ParamError::InvalidSlack { .. })));
    }
}
