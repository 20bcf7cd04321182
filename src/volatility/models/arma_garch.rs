//! ARMA(p_m, q_m)–GARCH(p, q) model: estimation, diagnostics inputs and
//! forecasting.
//!
//! Estimation maximizes the average log-likelihood `ℓ(θ)/n` in the
//! unconstrained θ-space of [`GarchParams::from_theta`] with the crate's
//! L-BFGS driver and finite-difference gradients. Averaging keeps the
//! objective O(1) regardless of sample length, so the default gradient and
//! cost tolerances apply unchanged.
//!
//! After a successful [`ArmaGarchModel::fit`] the model owns a copy of the
//! sample together with the filtered residuals and variances, so forecasts,
//! information criteria and standard errors need no further input.
use crate::{
    inference::hessian::{calc_covariance, standard_errors},
    optimization::{
        errors::OptResult,
        loglik_optimizer::{
            LogLikelihood, OptimOutcome, Theta, finite_diff::compute_jacobian, maximize,
        },
        numerical_stability::transformations::delta_method,
    },
    volatility::{
        core::{
            data::ReturnSeries,
            forecasts::{GarchForecast, forecast_recursion},
            options::GarchOptions,
            params::{GarchParams, MeanStart},
            recursion::likelihood_driver,
            shape::ModelShape,
            validation::validate_theta,
            workspace::GarchScratch,
        },
        errors::{VolError, VolResult},
    },
};
use ndarray::Array1;

/// In-sample output of a fit.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedPaths {
    pub sample: ReturnSeries,
    pub residuals: Array1<f64>,
    pub variances: Array1<f64>,
    pub loglik: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArmaGarchModel {
    pub shape: ModelShape,
    pub options: GarchOptions,
    pub scratch: GarchScratch,
    pub results: Option<OptimOutcome>,
    pub fitted_params: Option<GarchParams>,
    pub fitted: Option<FittedPaths>,
    pub forecast: Option<GarchForecast>,
}

impl ArmaGarchModel {
    pub fn new(shape: ModelShape, options: GarchOptions) -> ArmaGarchModel {
        ArmaGarchModel {
            shape,
            options,
            scratch: GarchScratch::new(0),
            results: None,
            fitted_params: None,
            fitted: None,
            forecast: None,
        }
    }

    /// Starting θ from [`GarchParams::initial`].
    ///
    /// # Errors
    /// Parameter errors when the mean start is not finite.
    pub fn initial_theta(
        &self, data: &ReturnSeries, mean_start: Option<&MeanStart>,
    ) -> VolResult<Theta> {
        let params = GarchParams::initial(&self.shape, data, mean_start)?;
        Ok(params.to_theta(&self.shape, data))
    }

    /// Maximum-likelihood fit from `theta0`.
    ///
    /// Stores the optimizer outcome, the fitted parameters and the filtered
    /// paths, and clears any earlier forecast. Whether the optimizer
    /// converged is left to the caller to judge through
    /// [`OptimOutcome::converged`] and [`OptimOutcome::hit_max_iter`].
    ///
    /// # Errors
    /// - Option validation errors.
    /// - `SeriesTooShort` below [`ModelShape::min_obs`].
    /// - Optimizer errors, wrapped in `VolError::Optimization`.
    /// - Recursion or density errors at θ̂.
    pub fn fit(&mut self, theta0: Theta, data: &ReturnSeries) -> VolResult<()> {
        self.options.validate()?;
        let required = self.shape.min_obs();
        if data.len() < required {
            return Err(VolError::SeriesTooShort { len: data.len(), required });
        }
        let outcome = maximize(&*self, theta0, data, &self.options.mle_opts)?;
        let params = GarchParams::from_theta(outcome.theta_hat.view(), &self.shape, data)?;
        let loglik = likelihood_driver(&params, data, &self.options, &self.scratch)?;
        self.fitted = Some(FittedPaths {
            sample: data.clone(),
            residuals: self.scratch.resid_buf.borrow().clone(),
            variances: self.scratch.var_buf.borrow().clone(),
            loglik,
        });
        self.fitted_params = Some(params);
        self.results = Some(outcome);
        self.forecast = None;
        Ok(())
    }

    /// `horizon`-step forecast from the end of the fitted sample.
    ///
    /// # Errors
    /// `ModelNotFitted`, `InvalidHorizon`, or recursion failures.
    pub fn forecast(&mut self, horizon: usize) -> VolResult<GarchForecast> {
        let params = self.fitted_params.as_ref().ok_or(VolError::ModelNotFitted)?;
        let fitted = self.fitted.as_ref().ok_or(VolError::ModelNotFitted)?;
        let forecast = forecast_recursion(
            params,
            fitted.sample.data.view(),
            fitted.residuals.view(),
            fitted.variances.view(),
            horizon,
            &self.options.guards,
        )?;
        self.forecast = Some(forecast.clone());
        Ok(forecast)
    }

    /// `ε_t / σ_t` over the fitted sample.
    ///
    /// # Errors
    /// `ModelNotFitted`.
    pub fn standardized_residuals(&self) -> VolResult<Array1<f64>> {
        let fitted = self.fitted.as_ref().ok_or(VolError::ModelNotFitted)?;
        Ok(&fitted.residuals / &fitted.variances.mapv(f64::sqrt))
    }

    /// Maximized log-likelihood `ℓ(θ̂)`.
    ///
    /// # Errors
    /// `ModelNotFitted`.
    pub fn log_likelihood(&self) -> VolResult<f64> {
        self.fitted.as_ref().map(|f| f.loglik).ok_or(VolError::ModelNotFitted)
    }

    /// Per-observation Akaike criterion `(−2ℓ + 2k) / n`.
    ///
    /// # Errors
    /// `ModelNotFitted`.
    pub fn aic(&self) -> VolResult<f64> {
        let fitted = self.fitted.as_ref().ok_or(VolError::ModelNotFitted)?;
        let n = fitted.sample.len() as f64;
        let k = self.shape.n_params() as f64;
        Ok((-2.0 * fitted.loglik + 2.0 * k) / n)
    }

    /// Standard errors of the natural parameters, ordered as
    /// [`GarchParams::to_vec`].
    ///
    /// The θ-space covariance is the pseudo-inverse of the observed
    /// information of the total log-likelihood; the delta method with a
    /// finite-difference Jacobian of θ ↦ parameters carries it over.
    ///
    /// # Errors
    /// `ModelNotFitted`, or optimizer errors from non-finite probes.
    pub fn standard_errors(&self) -> VolResult<Array1<f64>> {
        let outcome = self.results.as_ref().ok_or(VolError::ModelNotFitted)?;
        let fitted = self.fitted.as_ref().ok_or(VolError::ModelNotFitted)?;
        let data = &fitted.sample;
        let n = data.len() as f64;
        let k = self.shape.n_params();

        let total_loglik =
            |theta: &Array1<f64>| self.value(theta, data).map_or(f64::NAN, |avg| avg * n);
        let cov_theta = calc_covariance(&total_loglik, &outcome.theta_hat)?;
        let to_natural = |theta: &Theta| {
            GarchParams::from_theta(theta.view(), &self.shape, data)
                .map_or_else(|_| Array1::from_elem(k, f64::NAN), |p| p.to_vec())
        };
        let jacobian = compute_jacobian(&to_natural, &outcome.theta_hat)?;
        let cov = delta_method(&jacobian, &cov_theta)?;
        Ok(standard_errors(&cov))
    }
}

impl LogLikelihood for ArmaGarchModel {
    type Data = ReturnSeries;

    /// Average log-likelihood `ℓ(θ)/n`.
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<f64> {
        let params = GarchParams::from_theta(theta.view(), &self.shape, data)?;
        let loglik = likelihood_driver(&params, data, &self.options, &self.scratch)?;
        Ok(loglik / data.len() as f64)
    }

    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()> {
        validate_theta(theta.view(), &self.shape)?;
        let required = self.shape.min_obs();
        if data.len() < required {
            return Err(VolError::SeriesTooShort { len: data.len(), required }.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptError;
    use crate::volatility::core::{
        innovations::Innovation,
        shape::{ArmaOrder, GarchOrder},
    };
    use approx::assert_relative_eq;
    use ndarray::array;
    use rand::{SeedableRng, rngs::StdRng};
    use rand_distr::{Distribution, StandardNormal};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // - `LogLikelihood` conformance: `check` and the averaged `value`.
    // - Fit on a simulated GARCH(1, 1) path: parameter recovery, paths,
    //   AIC, standard errors and forecasts.
    // - Accessors before fitting.
    // -------------------------------------------------------------------------

    /// Gaussian GARCH(1, 1) returns with ω = 0.05, α = 0.1, β = 0.85.
    fn simulate_garch11(n: usize, seed: u64) -> ReturnSeries {
        let mut rng = StdRng::seed_from_u64(seed);
        let (omega, alpha, beta) = (0.05, 0.1, 0.85);
        let mut sigma2: f64 = omega / (1.0 - alpha - beta);
        let mut out = Array1::<f64>::zeros(n);
        for t in 0..n {
            let z: f64 = StandardNormal.sample(&mut rng);
            let eps = sigma2.sqrt() * z;
            out[t] = eps;
            sigma2 = omega + alpha * eps * eps + beta * sigma2;
        }
        ReturnSeries::new(out).expect("simulated series is valid")
    }

    fn garch11(innovation: Innovation) -> ArmaGarchModel {
        ArmaGarchModel::new(
            ModelShape::new(
                ArmaOrder::default(),
                GarchOrder::new(1, 1).expect("valid order"),
                innovation,
            ),
            GarchOptions::default(),
        )
    }

    #[test]
    // Purpose
    // -------
    // `value` is the average of the per-observation log-densities and
    // `check` enforces the θ layout and the minimum sample length.
    //
    // Given
    // -----
    // - Constant-mean GARCH(1, 1), Normal, on 200 simulated returns.
    //
    // Expect
    // ------
    // - value · n equals `likelihood_driver` at the same θ.
    // - A 3-element θ and a 3-observation sample are rejected.
    fn value_is_average_loglik_and_check_guards_inputs() {
        // Arrange
        let model = garch11(Innovation::Normal);
        let data = simulate_garch11(200, 1);
        let theta = model.initial_theta(&data, None).expect("valid start");
        let params = GarchParams::from_theta(theta.view(), &model.shape, &data).expect("valid");
        let short = ReturnSeries::new(array![0.1, -0.2, 0.3]).expect("valid");

        // Act
        let avg = model.value(&theta, &data).expect("finite");
        let total =
            likelihood_driver(&params, &data, &model.options, &model.scratch).expect("finite");

        // Assert
        assert_relative_eq!(avg * 200.0, total, max_relative = 1e-12);
        assert!(matches!(
            model.check(&array![0.0, 0.0, 0.0], &data),
            Err(OptError::ThetaLengthMismatch { expected: 4, actual: 3 })
        ));
        assert!(matches!(
            model.check(&theta, &short),
            Err(OptError::SeriesTooShort { len: 3, required: 5 })
        ));
    }

    #[test]
    // Purpose
    // -------
    // A fit on a long simulated path recovers the variance dynamics and
    // fills every post-fit accessor consistently.
    //
    // Given
    // -----
    // - 3000 Gaussian GARCH(1, 1) returns, seed 42.
    //
    // Expect
    // ------
    // - α̂ ∈ (0.03, 0.2), β̂ ∈ (0.7, 0.97), persistence < 1.
    // - AIC = (−2ℓ + 8)/n; standardized residuals have length n and sample
    //   variance near one; standard errors finite and positive.
    // - A 10-step forecast has positive variances moving toward the
    //   unconditional level.
    fn fit_recovers_garch11_dynamics() {
        // Arrange
        let data = simulate_garch11(3000, 42);
        let mut model = garch11(Innovation::Normal);
        let theta0 = model.initial_theta(&data, None).expect("valid start");

        // Act
        model.fit(theta0, &data).expect("fit succeeds");
        let params = model.fitted_params.clone().expect("fitted");
        let aic = model.aic().expect("fitted");
        let loglik = model.log_likelihood().expect("fitted");
        let z = model.standardized_residuals().expect("fitted");
        let se = model.standard_errors().expect("covariance available");
        let fc = model.forecast(10).expect("forecast");

        // Assert
        assert!(params.alpha[0] > 0.03 && params.alpha[0] < 0.2, "alpha = {}", params.alpha[0]);
        assert!(params.beta[0] > 0.7 && params.beta[0] < 0.97, "beta = {}", params.beta[0]);
        assert!(params.persistence() < 1.0);
        assert_relative_eq!(aic, (-2.0 * loglik + 8.0) / 3000.0, epsilon = 1e-12);
        assert_eq!(z.len(), 3000);
        let z_var = z.mapv(|v| v * v).mean().expect("non-empty");
        assert!((z_var - 1.0).abs() < 0.1, "standardized variance = {z_var}");
        assert_eq!(se.len(), 4);
        assert!(se.iter().all(|s| s.is_finite() && *s > 0.0), "se = {se:?}");
        assert_eq!(fc.horizon(), 10);
        assert!(fc.variance.iter().all(|v| *v > 0.0));
        let uncond = params.uncond_variance();
        assert!((fc.variance[9] - uncond).abs() <= (fc.variance[0] - uncond).abs() + 1e-12);
        assert!(model.forecast.is_some());
    }

    #[test]
    // Purpose
    // -------
    // Post-fit accessors refuse to run on an unfitted model.
    //
    // Given
    // -----
    // - A freshly constructed model.
    //
    // Expect
    // ------
    // - `ModelNotFitted` from `forecast`, `aic`, `standardized_residuals`
    //   and `standard_errors`.
    fn accessors_require_fit() {
        // Arrange
        let mut model = garch11(Innovation::StudentT);

        // Act / Assert
        assert_eq!(model.forecast(5), Err(VolError::ModelNotFitted));
        assert_eq!(model.aic(), Err(VolError::ModelNotFitted));
        assert_eq!(model.standardized_residuals(), Err(VolError::ModelNotFitted));
        assert_eq!(model.standard_errors(), Err(VolError::ModelNotFitted));
    }
}
