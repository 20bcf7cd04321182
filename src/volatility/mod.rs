//! volatility: ARMA mean plus GARCH variance models.
//!
//! Purpose
//! -------
//! Model daily log returns as
//!
//! ```text
//! y_t  = μ + Σ φ_i (y_{t−i} − μ) + Σ θ_j ε_{t−j} + ε_t,   ε_t = σ_t z_t
//! σ²_t = ω + Σ α_i ε²_{t−i} + Σ β_j σ²_{t−j}
//! ```
//!
//! with `z_t` Normal, standardized Student-t or Fernández–Steel skewed
//! Student-t, estimate it by maximum likelihood, and forecast both moments.
//!
//! Layout
//! ------
//! - [`core`]: data, orders, innovations, parameter maps, recursions and
//!   forecasts.
//! - [`models`]: [`ArmaGarchModel`].
//! - [`errors`]: [`VolError`] / [`ParamError`] and their result aliases.
//!
//! A model instance keeps its scratch buffers in `RefCell`s and is not
//! meant to be shared across threads.
pub mod core;
pub mod errors;
pub mod models;

pub use self::core::{
    ArmaOrder, GarchForecast, GarchOptions, GarchOrder, GarchParams, Innovation, InnovationShape,
    MeanStart, ModelShape, ReturnSeries, VarianceGuards, VarianceInit,
};
pub use self::errors::{ParamError, ParamResult, VolError, VolResult};
pub use self::models::ArmaGarchModel;

pub mod prelude {
    pub use super::core::{
        ArmaOrder, GarchForecast, GarchOptions, GarchOrder, GarchParams, Innovation, ModelShape,
        ReturnSeries,
    };
    pub use super::errors::{VolError, VolResult};
    pub use super::models::ArmaGarchModel;
}
