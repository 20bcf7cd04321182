//! Reusable buffers for the residual and variance recursions.
//!
//! The likelihood is evaluated through `&self` (see
//! [`LogLikelihood`](crate::optimization::loglik_optimizer::LogLikelihood)),
//! so the buffers live behind `RefCell` and are resized only when the
//! sample length changes.
use ndarray::Array1;
use std::cell::RefCell;

#[derive(Debug, Clone, PartialEq)]
pub struct GarchScratch {
    /// Mean residuals ε_t, length n.
    pub resid_buf: RefCell<Array1<f64>>,
    /// Conditional variances σ²_t, length n.
    pub var_buf: RefCell<Array1<f64>>,
}

impl GarchScratch {
    pub fn new(n: usize) -> GarchScratch {
        GarchScratch {
            resid_buf: RefCell::new(Array1::zeros(n)),
            var_buf: RefCell::new(Array1::zeros(n)),
        }
    }

    /// Make both buffers exactly `n` long; contents are reset only on resize.
    pub fn ensure_len(&self, n: usize) {
        if self.resid_buf.borrow().len() != n {
            *self.resid_buf.borrow_mut() = Array1::zeros(n);
        }
        if self.var_buf.borrow().len() != n {
            *self.var_buf.borrow_mut() = Array1::zeros(n);
        }
    }
}
