//! Model orders for ARMA(p_m, q_m)–GARCH(p, q).
//!
//! Variance convention: `q` is the number of ARCH lags (α on past ε²), `p`
//! the number of GARCH lags (β on past σ²). At least one of them must be
//! positive so the variance has dynamics.
use crate::volatility::{
    core::innovations::Innovation,
    errors::{VolError, VolResult},
};
use serde::{Deserialize, Serialize};

/// Mean-equation order: `p` AR lags, `q` MA lags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArmaOrder {
    pub p: usize,
    pub q: usize,
}

impl ArmaOrder {
    pub const fn new(p: usize, q: usize) -> Self {
        ArmaOrder { p, q }
    }

    /// `μ` plus `p + q` ARMA coefficients.
    pub fn n_params(&self) -> usize {
        1 + self.p + self.q
    }
}

/// Variance-equation order: `p` GARCH lags (β), `q` ARCH lags (α).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GarchOrder {
    pub p: usize,
    pub q: usize,
}

impl GarchOrder {
    /// # Errors
    /// `InvalidModelOrder` if `p == q == 0`.
    pub fn new(p: usize, q: usize) -> VolResult<Self> {
        if p == 0 && q == 0 {
            return Err(VolError::InvalidModelOrder {
                p,
                q,
                reason: "Both p and q cannot be zero.",
            });
        }
        Ok(GarchOrder { p, q })
    }

    /// `ω` plus `q` α's and `p` β's.
    pub fn n_params(&self) -> usize {
        1 + self.p + self.q
    }
}

/// Full model shape; fixes the layout of the optimizer vector
///
/// ```text
/// θ = [ μ | φ(1..p_m) | θ(1..q_m) | ω | α(1..q) | β(1..p) | ν? | ξ? ]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelShape {
    pub mean: ArmaOrder,
    pub variance: GarchOrder,
    pub innovation: Innovation,
}

impl ModelShape {
    pub fn new(mean: ArmaOrder, variance: GarchOrder, innovation: Innovation) -> Self {
        ModelShape { mean, variance, innovation }
    }

    /// Free parameters `k` entering the information criterion.
    pub fn n_params(&self) -> usize {
        self.mean.n_params() + self.variance.n_params() + self.innovation.n_shape_params()
    }

    /// Largest lag of either recursion.
    pub fn max_lag(&self) -> usize {
        self.mean.p.max(self.mean.q).max(self.variance.p).max(self.variance.q)
    }

    /// Offset of `ω` in θ.
    pub(crate) fn omega_idx(&self) -> usize {
        self.mean.n_params()
    }

    /// Offset of the first shape parameter in θ.
    pub(crate) fn shape_idx(&self) -> usize {
        self.mean.n_params() + self.variance.n_params()
    }

    /// Minimum sample length for a fit: every lag seeded and more
    /// observations than parameters.
    pub fn min_obs(&self) -> usize {
        (self.max_lag() + 1).max(self.n_params() + 1)
    }
}

impl std::fmt::Display for ModelShape {
    /// `ARMA(p_m,q_m)-GARCH(p,q)-<innovation label>`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ARMA({},{})-GARCH({},{})-{}",
            self.mean.p,
            self.mean.q,
            self.variance.p,
            self.variance.q,
            self.innovation.label()
        )
    }
}
