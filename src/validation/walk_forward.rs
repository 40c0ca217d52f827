//! One-step-ahead walk-forward validation.

use crate::core::split_train_test;
use crate::error::Result;
use crate::models::{ForecastStrategy, WarningPolicy};
use crate::utils::metrics::rmse;

/// Everything produced by one walk-forward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkForwardRun {
    /// Length of the training prefix.
    pub train_len: usize,
    /// Held-out observations, in order.
    pub actual: Vec<f64>,
    /// One forecast per held-out observation.
    pub predictions: Vec<f64>,
    /// History at the end of the pass: the training prefix followed by every
    /// held-out observation.
    pub history: Vec<f64>,
    /// RMSE of `predictions` against `actual`.
    pub rmse: f64,
}

/// Walk forward through the last `test_len` observations of `series`.
///
/// At each step the strategy refits on the current history and forecasts the
/// next value; the true observation, never the forecast, is then appended to
/// the history. The first strategy failure aborts the pass.
///
/// # Errors
/// Split errors, strategy errors and metric errors are returned unchanged.
///
/// # Example
/// ```
/// use anofox_gridsearch::models::baseline::{AverageMode, SimpleConfig, SimpleForecast};
/// use anofox_gridsearch::models::WarningPolicy;
/// use anofox_gridsearch::validation::walk_forward;
///
/// let series = [10.0, 20.0, 30.0, 40.0, 50.0, 60.0];
/// let config = SimpleConfig::new(1, 1, AverageMode::Persist);
/// let run = walk_forward(&series, 2, &config, &SimpleForecast, WarningPolicy::Emit).unwrap();
///
/// assert_eq!(run.predictions, vec![40.0, 50.0]);
/// assert!((run.rmse - 10.0).abs() < 1e-12);
/// ```
pub fn walk_forward<S: ForecastStrategy>(
    series: &[f64],
    test_len: usize,
    config: &S::Config,
    strategy: &S,
    warnings: WarningPolicy,
) -> Result<WalkForwardRun> {
    let (train, test) = split_train_test(series, test_len)?;

    let mut history = Vec::with_capacity(series.len());
    history.extend_from_slice(train);
    let mut predictions = Vec::with_capacity(test.len());

    for &observed in test {
        let yhat = strategy.forecast(&history, config, warnings)?;
        predictions.push(yhat);
        history.push(observed);
    }

    let error = rmse(test, &predictions)?;
    Ok(WalkForwardRun {
        train_len: train.len(),
        actual: test.to_vec(),
        predictions,
        history,
        rmse: error,
    })
}

/// Walk-forward RMSE of `config` over the last `test_len` observations.
pub fn walk_forward_validation<S: ForecastStrategy>(
    series: &[f64],
    test_len: usize,
    config: &S::Config,
    strategy: &S,
    warnings: WarningPolicy,
) -> Result<f64> {
    walk_forward(series, test_len, config, strategy, warnings).map(|run| run.rmse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ForecastError;
    use crate::models::baseline::{AverageMode, SimpleConfig, SimpleForecast};
    use crate::models::ModelConfig;
    use approx::assert_relative_eq;
    use std::sync::Mutex;

    fn tens() -> Vec<f64> {
        vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0]
    }

    #[test]
    fn persistence_over_a_line() {
        let config = SimpleConfig::new(1, 1, AverageMode::Persist);
        let run = walk_forward(&tens(), 2, &config, &SimpleForecast, WarningPolicy::Emit).unwrap();

        assert_eq!(run.train_len, 4);
        assert_eq!(run.actual, vec![50.0, 60.0]);
        assert_eq!(run.predictions, vec![40.0, 50.0]);
        assert_eq!(run.history, tens());
        assert_relative_eq!(run.rmse, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn validation_returns_rmse_only() {
        let config = SimpleConfig::new(2, 1, AverageMode::Mean);
        let error =
            walk_forward_validation(&tens(), 2, &config, &SimpleForecast, WarningPolicy::Emit)
                .unwrap();
        // forecasts 35 and 45 against 50 and 60
        assert_relative_eq!(error, 15.0, epsilon = 1e-12);
    }

    #[test]
    fn invalid_split_is_reported() {
        let config = SimpleConfig::new(1, 1, AverageMode::Persist);
        let err = walk_forward(&tens(), 6, &config, &SimpleForecast, WarningPolicy::Emit)
            .unwrap_err();
        assert_eq!(err, ForecastError::InvalidTestLength { test_len: 6, len: 6 });
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn strategy_failure_aborts_the_pass() {
        let config = SimpleConfig::new(1, 10, AverageMode::Mean);
        let err = walk_forward(&tens(), 2, &config, &SimpleForecast, WarningPolicy::Emit)
            .unwrap_err();
        assert!(matches!(err, ForecastError::ConfigOutOfRange { .. }));
    }

    #[derive(Debug, Clone)]
    struct Unit;

    impl ModelConfig for Unit {
        fn label(&self) -> String {
            "[]".to_string()
        }
    }

    /// Records every history it is shown and forecasts a constant.
    struct Recorder {
        seen: Mutex<Vec<Vec<f64>>>,
        policies: Mutex<Vec<WarningPolicy>>,
    }

    impl ForecastStrategy for Recorder {
        type Config = Unit;

        fn forecast(&self, history: &[f64], _: &Unit, warnings: WarningPolicy) -> Result<f64> {
            if let Ok(mut seen) = self.seen.lock() {
                seen.push(history.to_vec());
            }
            if let Ok(mut policies) = self.policies.lock() {
                policies.push(warnings);
            }
            Ok(-1.0)
        }

        fn name(&self) -> &str {
            "Recorder"
        }
    }

    #[test]
    fn history_grows_with_true_observations() {
        let recorder = Recorder {
            seen: Mutex::new(Vec::new()),
            policies: Mutex::new(Vec::new()),
        };
        let series = tens();
        let run = walk_forward(&series, 3, &Unit, &recorder, WarningPolicy::Suppress).unwrap();

        let seen = recorder.seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0], vec![10.0, 20.0, 30.0]);
        assert_eq!(seen[1], vec![10.0, 20.0, 30.0, 40.0]);
        assert_eq!(seen[2], vec![10.0, 20.0, 30.0, 40.0, 50.0]);
        assert_eq!(run.predictions, vec![-1.0; 3]);
        assert_eq!(series, tens());

        let policies = recorder.policies.lock().unwrap();
        assert!(policies.iter().all(|p| *p == WarningPolicy::Suppress));
    }
}
