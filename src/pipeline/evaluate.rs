//! Holdout evaluation.
use crate::pipeline::errors::{PipelineError, PipelineResult, Stage};
use ndarray::ArrayView1;

/// Root mean squared error between a price forecast and the held-out prices.
///
/// Symmetric in its arguments.
///
/// # Errors
/// - `LengthMismatch` when the lengths differ.
/// - `InsufficientData` for empty input.
pub fn evaluate(forecast: ArrayView1<f64>, actual: ArrayView1<f64>) -> PipelineResult<f64> {
    if forecast.len() != actual.len() {
        return Err(PipelineError::LengthMismatch {
            forecast: forecast.len(),
            actual: actual.len(),
        });
    }
    if forecast.is_empty() {
        return Err(PipelineError::InsufficientData { stage: Stage::Evaluator, len: 0, required: 1 });
    }
    let sse: f64 = forecast.iter().zip(actual.iter()).map(|(f, a)| (f - a).powi(2)).sum();
    Ok((sse / forecast.len() as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Hand-computed RMSE, symmetry and the two error cases.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // RMSE matches the hand computation and does not depend on argument
    // order.
    //
    // Given
    // -----
    // - f = (1, 2, 3, 4), a = (2, 2, 1, 4): squared errors 1, 0, 4, 0.
    //
    // Expect
    // ------
    // - √(5/4) both ways.
    fn rmse_is_symmetric() {
        // Arrange
        let f = array![1.0, 2.0, 3.0, 4.0];
        let a = array![2.0, 2.0, 1.0, 4.0];

        // Act
        let fa = evaluate(f.view(), a.view()).expect("equal lengths");
        let af = evaluate(a.view(), f.view()).expect("equal lengths");

        // Assert
        assert!((fa - 1.25_f64.sqrt()).abs() < 1e-15);
        assert_eq!(fa, af);
    }

    #[test]
    // Purpose
    // -------
    // Mismatched or empty inputs are rejected at the evaluator stage.
    //
    // Given
    // -----
    // - Lengths 3 vs 2; two empty arrays.
    //
    // Expect
    // ------
    // - `LengthMismatch { 3, 2 }`; `InsufficientData` with stage Evaluator.
    fn rejects_mismatch_and_empty() {
        // Arrange
        let empty = Array1::<f64>::zeros(0);

        // Act
        let mismatch = evaluate(array![1.0, 2.0, 3.0].view(), array![1.0, 2.0].view());
        let none = evaluate(empty.view(), empty.view());

        // Assert
        assert_eq!(mismatch, Err(PipelineError::LengthMismatch { forecast: 3, actual: 2 }));
        assert!(matches!(none, Err(PipelineError::InsufficientData { stage: Stage::Evaluator, .. })));
    }
}
