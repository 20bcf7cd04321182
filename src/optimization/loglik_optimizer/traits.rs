//! Public surface of the likelihood optimizer.
//!
//! - [`LogLikelihood`]: implemented by every volatility model that is fit by
//!   maximum likelihood.
//! - [`MLEOptions`] / [`Tolerances`]: optimizer configuration, serializable
//!   so it can live inside the pipeline's JSON config.
//! - [`LineSearcher`]: line search used by L-BFGS.
//! - [`OptimOutcome`]: normalized result of [`maximize`](super::maximize).
//!
//! Convention: models return `ℓ(θ)` and, optionally, `∇ℓ(θ)`; the adapter
//! minimizes `c(θ) = -ℓ(θ)`.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        Cost, FnEvalMap, Grad, Theta,
        validation::{validate_theta_hat, validate_value, verify_tol_cost, verify_tol_grad},
    },
};
use argmin::core::{TerminationReason, TerminationStatus};
use argmin_math::ArgminL2Norm;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Log-likelihood interface consumed by [`maximize`](super::maximize).
///
/// `value` and `check` are required. `grad` defaults to
/// [`OptError::GradientNotImplemented`], which makes the adapter fall back to
/// finite differences of the cost.
pub trait LogLikelihood {
    type Data: 'static;

    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Line search used inside L-BFGS.
///
/// Parses case-insensitively from `"MoreThuente"` / `"HagerZhang"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// Optimizer-level configuration.
///
/// Defaults: `tol_grad = 1e-6`, `tol_cost = 1e-12`, `max_iter = 500`,
/// More–Thuente line search, quiet, L-BFGS memory 7. GARCH likelihoods on a
/// few thousand daily returns are flat near the optimum, so the cost-change
/// rule usually fires before the gradient rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MLEOptions {
    pub tols: Tolerances,
    pub line_searcher: LineSearcher,
    pub verbose: bool,
    pub lbfgs_mem: Option<usize>,
}

impl MLEOptions {
    /// Build options; numeric checks on the tolerances happen in [`Tolerances::new`].
    ///
    /// # Errors
    /// [`OptError::InvalidLBFGSMem`] when `lbfgs_mem == Some(0)`.
    pub fn new(
        tols: Tolerances, line_searcher: LineSearcher, verbose: bool, lbfgs_mem: Option<usize>,
    ) -> OptResult<Self> {
        if lbfgs_mem == Some(0) {
            return Err(OptError::InvalidLBFGSMem {
                mem: 0,
                reason: "L-BFGS memory must be greater than zero.",
            });
        }
        Ok(Self { tols, line_searcher, verbose, lbfgs_mem })
    }

    /// Re-run the checks of [`Tolerances::new`] and [`MLEOptions::new`].
    ///
    /// Deserialized options bypass the constructors, so the pipeline calls
    /// this once after loading a config file.
    pub fn validate(&self) -> OptResult<()> {
        Tolerances::new(self.tols.tol_grad, self.tols.tol_cost, self.tols.max_iter)?;
        MLEOptions::new(self.tols, self.line_searcher, self.verbose, self.lbfgs_mem)?;
        Ok(())
    }
}

impl Default for MLEOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances { tol_grad: Some(1e-6), tol_cost: Some(1e-12), max_iter: Some(500) },
            line_searcher: LineSearcher::MoreThuente,
            verbose: false,
            lbfgs_mem: None,
        }
    }
}

/// Stopping rules: gradient norm, cost change, iteration cap.
///
/// Any field may be `None`, but at least one must be set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if all three are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for
    ///   non-finite or non-positive tolerances.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == Some(0)`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        if max_iter == Some(0) {
            return Err(OptError::InvalidMaxIter {
                max_iter: 0,
                reason: "Maximum iterations must be greater than zero.",
            });
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// Result of [`maximize`](super::maximize).
///
/// `value` is the maximized log-likelihood `ℓ(θ̂)`, not the cost.
/// `converged` is `false` when the solver stopped without a termination
/// reason or exited early (e.g. a line search aborted on a non-finite
/// likelihood); hitting `max_iter` is reported through `status`.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Build a validated outcome from raw solver state.
    ///
    /// # Errors
    /// Propagates [`validate_theta_hat`] and [`validate_value`] failures.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, termination: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let (converged, status) = match termination {
            TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
            TerminationStatus::Terminated(TerminationReason::SolverExit(msg)) => {
                (false, format!("Solver exit: {msg}"))
            }
            other => (true, format!("{other:?}")),
        };
        let grad_norm = grad.map(|g| g.l2_norm());
        Ok(Self {
            theta_hat,
            value,
            converged,
            status,
            iterations: iterations as usize,
            fn_evals,
            grad_norm,
        })
    }

    /// True when the run stopped because the iteration cap was reached.
    pub fn hit_max_iter(&self) -> bool {
        self.status.contains("MaxItersReached")
    }
}
