//! Box-Cox power transformation.
//!
//! Used by exponential smoothing to stabilise variance before fitting.

use crate::error::{ForecastError, Result};
use crate::utils::stats::population_variance;

/// A Box-Cox transform with a fixed lambda.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxCox {
    lambda: f64,
}

impl BoxCox {
    /// Create a transform with the given lambda.
    pub fn new(lambda: f64) -> Self {
        Self { lambda }
    }

    /// Choose lambda by maximum likelihood over `[-2, 2]`.
    ///
    /// # Errors
    /// [`ForecastError::FitFailure`] unless every value is strictly positive
    /// and there are at least two of them.
    pub fn fit(series: &[f64]) -> Result<Self> {
        if series.len() < 2 {
            return Err(ForecastError::InsufficientData {
                needed: 2,
                got: series.len(),
            });
        }
        if !is_boxcox_suitable(series) {
            return Err(ForecastError::FitFailure(
                "Box-Cox requires strictly positive data".to_string(),
            ));
        }
        Ok(Self::new(boxcox_lambda(series)))
    }

    /// The lambda parameter.
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Transform a single positive value. Non-positive input yields NaN.
    pub fn apply(&self, x: f64) -> f64 {
        if x <= 0.0 {
            f64::NAN
        } else if self.lambda.abs() < 1e-10 {
            x.ln()
        } else {
            (x.powf(self.lambda) - 1.0) / self.lambda
        }
    }

    /// Inverse transform of a single value. Out-of-domain input yields NaN.
    pub fn invert(&self, y: f64) -> f64 {
        if self.lambda.abs() < 1e-10 {
            y.exp()
        } else {
            let base = self.lambda * y + 1.0;
            if base <= 0.0 {
                f64::NAN
            } else {
                base.powf(1.0 / self.lambda)
            }
        }
    }

    /// Transform a whole series.
    pub fn transform(&self, series: &[f64]) -> Vec<f64> {
        series.iter().map(|&x| self.apply(x)).collect()
    }
}

/// True when the data is non-empty and strictly positive.
pub fn is_boxcox_suitable(series: &[f64]) -> bool {
    !series.is_empty() && series.iter().all(|&x| x > 0.0)
}

/// Maximum likelihood lambda: coarse grid over `[-2, 2]`, then a finer pass
/// around the best coarse value.
pub fn boxcox_lambda(series: &[f64]) -> f64 {
    let positive: Vec<f64> = series.iter().copied().filter(|&x| x > 0.0).collect();
    if positive.len() < 2 {
        return 1.0;
    }
    let log_sum: f64 = positive.iter().map(|x| x.ln()).sum();

    let coarse = best_on_grid(
        &positive,
        log_sum,
        (-200..=200).map(|i| i as f64 / 100.0),
        (1.0, f64::NEG_INFINITY),
    );
    let start = (coarse.0 - 0.01).max(-2.0);
    let end = (coarse.0 + 0.01).min(2.0);
    let refined = best_on_grid(
        &positive,
        log_sum,
        (0..=40).map(|i| start + (end - start) * i as f64 / 40.0),
        coarse,
    );

    refined.0
}

/// Highest-likelihood `(lambda, llf)` among `candidates` and `best`.
fn best_on_grid(
    series: &[f64],
    log_sum: f64,
    candidates: impl Iterator<Item = f64>,
    best: (f64, f64),
) -> (f64, f64) {
    candidates.fold(best, |best, lambda| {
        let llf = log_likelihood(series, log_sum, lambda);
        if llf > best.1 {
            (lambda, llf)
        } else {
            best
        }
    })
}

/// Profile log-likelihood of normality after transformation, constants dropped.
fn log_likelihood(series: &[f64], log_sum: f64, lambda: f64) -> f64 {
    let n = series.len() as f64;
    let variance = population_variance(&BoxCox::new(lambda).transform(series));
    if !variance.is_finite() || variance <= 0.0 {
        return f64::NEG_INFINITY;
    }
    -0.5 * n * variance.ln() + (lambda - 1.0) * log_sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn lambda_one_shifts_by_one() {
        let bc = BoxCox::new(1.0);
        for x in [1.0, 2.0, 3.5] {
            assert_relative_eq!(bc.apply(x), x - 1.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn lambda_zero_is_log() {
        let bc = BoxCox::new(0.0);
        assert_relative_eq!(bc.apply(std::f64::consts::E), 1.0, epsilon = 1e-10);
        assert_relative_eq!(bc.invert(1.0), std::f64::consts::E, epsilon = 1e-10);
    }

    #[test]
    fn invert_recovers_input() {
        let bc = BoxCox::new(0.5);
        for x in [0.5, 2.0, 40.0] {
            assert_relative_eq!(bc.invert(bc.apply(x)), x, epsilon = 1e-10);
        }
    }

    #[test]
    fn non_positive_values_map_to_nan() {
        let bc = BoxCox::new(1.0);
        assert!(bc.apply(0.0).is_nan());
        assert!(bc.apply(-3.0).is_nan());
    }

    #[test]
    fn exponential_data_prefers_log() {
        let series: Vec<f64> = (1..=10).map(|i| (i as f64).exp()).collect();
        let lambda = boxcox_lambda(&series);
        assert!(lambda.abs() < 0.5, "expected lambda near 0, got {}", lambda);
    }

    #[test]
    fn refine_pass_never_lowers_likelihood() {
        let series: Vec<f64> = (1..=30).map(|i| (i as f64).powf(1.7) + 3.0).collect();
        let log_sum: f64 = series.iter().map(|x| x.ln()).sum();
        let lambda = boxcox_lambda(&series);

        let coarse = best_on_grid(
            &series,
            log_sum,
            (-200..=200).map(|i| i as f64 / 100.0),
            (1.0, f64::NEG_INFINITY),
        );
        assert!((lambda - coarse.0).abs() <= 0.01 + 1e-12);
        assert!(log_likelihood(&series, log_sum, lambda) >= coarse.1);
    }

    #[test]
    fn fit_rejects_non_positive_data() {
        assert!(matches!(
            BoxCox::fit(&[1.0, 0.0, 2.0]),
            Err(ForecastError::FitFailure(_))
        ));
        assert!(BoxCox::fit(&[3.0]).is_err());
    }

    #[test]
    fn fit_picks_lambda_in_range() {
        let bc = BoxCox::fit(&[1.0, 4.0, 9.0, 16.0, 25.0]).unwrap();
        assert!((-2.0..=2.0).contains(&bc.lambda()));
    }
}
