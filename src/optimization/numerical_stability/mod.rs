//! numerical_stability: stable parameter maps shared by the volatility
//! models (softplus for positive scalars, softmax-with-slack for the
//! persistence simplex, partial autocorrelations for ARMA coefficients) and
//! the delta method used for standard errors.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    EIGEN_EPS, GENERAL_TOL, LOGIT_EPS, PACF_BOUND, STATIONARITY_MARGIN, coeffs_to_pacf,
    delta_method, pacf_to_coeffs, safe_softmax, safe_softmax_inv, safe_softplus,
    safe_softplus_inv,
};

pub mod prelude {
    pub use super::transformations::{
        STATIONARITY_MARGIN, delta_method, safe_softmax, safe_softmax_inv, safe_softplus,
        safe_softplus_inv,
    };
}
