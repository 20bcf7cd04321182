//! Entry point for maximizing a [`LogLikelihood`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, LogLikelihood, MLEOptions},
    },
};

/// Maximize `ℓ(θ)` with L-BFGS, starting from `theta0`.
///
/// Runs `f.check(theta0, data)` first, wraps `(f, data)` in an
/// [`ArgMinAdapter`] that minimizes `-ℓ(θ)`, builds the solver for
/// `opts.line_searcher` and hands everything to [`run_lbfgs`].
///
/// # Errors
/// - Anything returned by `f.check`.
/// - Solver construction errors (invalid tolerances rejected by argmin).
/// - Runtime errors from the executor, including model errors raised while
///   evaluating the likelihood.
///
/// # Example
/// ```no_run
/// use garch_pipeline::optimization::errors::OptResult;
/// use garch_pipeline::optimization::loglik_optimizer::{
///     maximize, LogLikelihood, MLEOptions, Theta,
/// };
/// use ndarray::array;
///
/// struct Quadratic;
/// impl LogLikelihood for Quadratic {
///     type Data = ();
///     fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
///         Ok(-theta.dot(theta))
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let out = maximize(&Quadratic, array![0.5, -0.25], &(), &MLEOptions::default())?;
/// assert!(out.theta_hat.iter().all(|v| v.abs() < 1e-4));
/// # Ok::<(), garch_pipeline::optimization::errors::OptError>(())
/// ```
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptError;
    use crate::optimization::loglik_optimizer::Tolerances;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // `maximize` on small closed-form likelihoods, with both line searches
    // and with the finite-difference gradient path.
    // -------------------------------------------------------------------------

    /// Gaussian log-likelihood in (mu, log sigma) for a fixed sample.
    ///
    /// Written in log form so a long line-search step in `log sigma` stays
    /// finite instead of overflowing `sigma^2`.
    struct GaussianLL;

    impl LogLikelihood for GaussianLL {
        type Data = Vec<f64>;

        fn value(&self, theta: &Theta, data: &Vec<f64>) -> OptResult<f64> {
            let mu = theta[0];
            let log_sigma = theta[1];
            let n = data.len() as f64;
            let ss: f64 = data.iter().map(|x| (x - mu).powi(2)).sum();
            Ok(-n * (0.5 * (2.0 * std::f64::consts::PI).ln() + log_sigma)
                - 0.5 * ss * (-2.0 * log_sigma).exp())
        }

        fn check(&self, theta: &Theta, _: &Vec<f64>) -> OptResult<()> {
            if theta.len() != 2 {
                return Err(OptError::ThetaLengthMismatch { expected: 2, actual: theta.len() });
            }
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // The finite-difference fallback must recover the closed-form Gaussian
    // MLE with either line search.
    //
    // Given
    // -----
    // - Sample [1, 2, 3, 4, 5] (mean 3, MLE variance 2).
    // - theta0 = (2, 0.5), inside the region where the likelihood is
    //   well-scaled.
    //
    // Expect
    // ------
    // - Both runs converged (no early solver exit).
    // - mu_hat ≈ 3 and exp(2 log_sigma_hat) ≈ 2 for both line searches.
    fn maximize_recovers_gaussian_mle_with_both_line_searches() {
        // Arrange
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let tols = Tolerances::new(Some(1e-6), Some(1e-12), Some(500)).expect("valid tolerances");

        for ls in [LineSearcher::MoreThuente, LineSearcher::HagerZhang] {
            let opts = MLEOptions::new(tols, ls, false, None).expect("valid options");

            // Act
            let out = maximize(&GaussianLL, array![2.0, 0.5], &data, &opts)
                .expect("optimization should succeed");

            // Assert
            assert!(out.converged, "{ls:?} did not terminate: {}", out.status);
            assert!((out.theta_hat[0] - 3.0).abs() < 1e-3, "{ls:?} mu = {}", out.theta_hat[0]);
            let var = (2.0 * out.theta_hat[1]).exp();
            assert!((var - 2.0).abs() < 1e-2, "{ls:?} var = {var}");
        }
    }

    #[test]
    // Purpose
    // -------
    // `check` runs before the solver and its error is returned untouched.
    //
    // Given
    // -----
    // - A theta of the wrong length.
    //
    // Expect
    // ------
    // - `OptError::ThetaLengthMismatch { expected: 2, actual: 3 }`.
    fn maximize_propagates_check_error() {
        // Act
        let err = maximize(&GaussianLL, array![0.0, 0.0, 0.0], &vec![1.0], &MLEOptions::default())
            .expect_err("length mismatch must fail");

        // Assert
        assert_eq!(err, OptError::ThetaLengthMismatch { expected: 2, actual: 3 });
    }
}
