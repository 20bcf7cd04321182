//! Executor wiring shared by both L-BFGS variants.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Grad, LogLikelihood, MLEOptions, OptimOutcome, Theta, adapter::ArgMinAdapter,
    },
};
use argmin::core::{CostFunction, Executor, State};
#[cfg(feature = "obs_slog")]
use argmin::core::Gradient;
#[cfg(feature = "obs_slog")]
use argmin_math::ArgminL2Norm;

/// Run `solver` on `problem` from `theta0` and normalize the final state.
///
/// `opts.tols.max_iter` caps the executor. With the `obs_slog` feature and
/// `opts.verbose`, a terminal slog observer reports every iteration.
///
/// # Errors
/// - argmin runtime errors (line-search failures, model errors raised by
///   the cost), converted through `From<argmin::core::Error>`.
/// - [`OptimOutcome::new`] validation errors.
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: argmin::core::Solver<
            ArgMinAdapter<'a, F>,
            argmin::core::IterState<Theta, Grad, (), (), (), f64>,
        > + Send
        + 'static,
{
    let ll0 = -problem.cost(&theta0)?;
    tracing::trace!(loglik = ll0, dim = theta0.len(), "starting L-BFGS");
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let g0n = problem.gradient(&theta0).ok().map(|g| g.l2_norm());
        eprintln!(
            "init: ell(theta0) = {:.6}{}",
            ll0,
            g0n.map(|n| format!(", ||grad|| = {:.6}", n)).unwrap_or_default()
        );
    }

    let mut optimizer = Executor::new(problem, solver).configure(|state| state.param(theta0));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let grad = result.take_gradient();
    let outcome = OptimOutcome::new(
        result.take_best_param(),
        -result.get_best_cost(),
        termination,
        iterations,
        function_counts,
        grad,
    )?;
    tracing::trace!(
        loglik = outcome.value,
        iterations = outcome.iterations,
        status = %outcome.status,
        "L-BFGS finished"
    );
    Ok(outcome)
}
