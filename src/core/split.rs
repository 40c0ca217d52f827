//! Train/test partitioning of a univariate series.

use crate::error::{ForecastError, Result};

/// Split a series into a training prefix and a test suffix.
///
/// The test suffix holds the last `test_len` observations. Both halves borrow
/// from `series`; nothing is copied.
///
/// # Errors
/// Returns [`ForecastError::InvalidTestLength`] unless
/// `0 < test_len < series.len()`.
///
/// # Example
/// ```
/// use anofox_gridsearch::core::split_train_test;
///
/// let series = [10.0, 20.0, 30.0, 40.0, 50.0, 60.0];
/// let (train, test) = split_train_test(&series, 2).unwrap();
/// assert_eq!(train, &[10.0, 20.0, 30.0, 40.0]);
/// assert_eq!(test, &[50.0, 60.0]);
/// ```
pub fn split_train_test(series: &[f64], test_len: usize) -> Result<(&[f64], &[f64])> {
    if test_len == 0 || test_len >= series.len() {
        return Err(ForecastError::InvalidTestLength {
            test_len,
            len: series.len(),
        });
    }
    Ok(series.split_at(series.len() - test_len))
}
