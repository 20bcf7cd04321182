//! Estimation options for ARMA–GARCH models.
//!
//! [`GarchOptions`] bundles everything a fit needs besides the model shape:
//! how the variance recursion is seeded, the optimizer configuration, and
//! the σ² bounds. It is serializable so it can sit inside the pipeline's
//! JSON configuration.
use crate::{
    optimization::loglik_optimizer::MLEOptions,
    volatility::{
        core::{guards::VarianceGuards, init::VarianceInit},
        errors::VolResult,
    },
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GarchOptions {
    /// Pre-sample variance seed.
    #[serde(default)]
    pub init: VarianceInit,
    /// L-BFGS settings.
    #[serde(default)]
    pub mle_opts: MLEOptions,
    /// Bounds applied to every σ²_t.
    #[serde(default)]
    pub guards: VarianceGuards,
}

impl GarchOptions {
    /// Package already-validated components.
    pub fn new(init: VarianceInit, mle_opts: MLEOptions, guards: VarianceGuards) -> Self {
        GarchOptions { init, mle_opts, guards }
    }

    /// Re-run every component check; used after deserialization.
    ///
    /// # Errors
    /// The first failing component check.
    pub fn validate(&self) -> VolResult<()> {
        self.init.validate()?;
        self.mle_opts.validate()?;
        self.guards.validate()
    }
}
