//! Accuracy metrics for walk-forward evaluation.

use crate::error::{ForecastError, Result};

/// Check that two sequences are non-empty and aligned.
fn check_aligned(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.is_empty() || predicted.is_empty() {
        return Err(ForecastError::EmptyData);
    }
    if actual.len() != predicted.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }
    Ok(())
}

/// Mean squared error between actual and predicted values.
///
/// # Errors
/// [`ForecastError::EmptyData`] when either input is empty and
/// [`ForecastError::DimensionMismatch`] when their lengths differ.
pub fn mse(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_aligned(actual, predicted)?;
    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    Ok(sum / actual.len() as f64)
}

/// Root mean squared error: `sqrt(mean((actual - predicted)^2))`.
///
/// # Example
/// ```
/// use anofox_gridsearch::utils::metrics::rmse;
///
/// let error = rmse(&[50.0, 60.0], &[40.0, 50.0]).unwrap();
/// assert!((error - 10.0).abs() < 1e-12);
/// ```
pub fn rmse(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    mse(actual, predicted).map(f64::sqrt)
}

/// Mean absolute error between actual and predicted values.
pub fn mae(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_aligned(actual, predicted)?;
    let sum: f64 = actual.iter().zip(predicted).map(|(a, p)| (a - p).abs()).sum();
    Ok(sum / actual.len() as f64)
}
