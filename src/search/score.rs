//! Failure-isolated scoring of a single configuration.

use tracing::debug;

use crate::error::{ForecastError, Result};
use crate::models::{ForecastStrategy, ModelConfig, WarningPolicy};
use crate::validation::walk_forward_validation;

/// How [`score_model`] treats failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoreMode {
    /// Emit strategy warnings and propagate every failure.
    Debug,
    /// Suppress strategy warnings and record failures in the result.
    #[default]
    Search,
}

impl ScoreMode {
    fn warnings(self) -> WarningPolicy {
        match self {
            ScoreMode::Debug => WarningPolicy::Emit,
            ScoreMode::Search => WarningPolicy::Suppress,
        }
    }
}

/// Outcome of scoring one configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum Score {
    /// Walk-forward RMSE over the whole test horizon.
    Rmse(f64),
    /// The walk-forward pass failed at some step.
    Failed(ForecastError),
}

/// A configuration, its label and how it scored.
#[derive(Debug, Clone)]
pub struct ScoreResult<C> {
    /// Canonical label of `config`.
    pub key: String,
    pub config: C,
    pub outcome: Score,
}

impl<C> ScoreResult<C> {
    /// RMSE when every step of the test horizon succeeded.
    pub fn rmse(&self) -> Option<f64> {
        match self.outcome {
            Score::Rmse(value) => Some(value),
            Score::Failed(_) => None,
        }
    }

    /// The failure, if scoring failed.
    pub fn error(&self) -> Option<&ForecastError> {
        match &self.outcome {
            Score::Rmse(_) => None,
            Score::Failed(err) => Some(err),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, Score::Failed(_))
    }

    /// The stdout progress line for this result. Failures have none.
    pub fn progress_line(&self) -> Option<String> {
        self.rmse().map(|rmse| progress_line(&self.key, rmse))
    }
}

/// `Model[<key>] <rmse>` with the RMSE to three decimals.
pub fn progress_line(key: &str, rmse: f64) -> String {
    format!("Model[{}] {:.3}", key, rmse)
}

/// Score `config` by walk-forward validation over the last `test_len`
/// observations.
///
/// In [`ScoreMode::Debug`] any failure is returned as `Err`. In
/// [`ScoreMode::Search`] this never returns `Err`: failures become
/// [`Score::Failed`]. Each success prints `Model[<key>] <rmse>` to stdout.
///
/// # Example
/// ```
/// use anofox_gridsearch::models::baseline::{AverageMode, SimpleConfig, SimpleForecast};
/// use anofox_gridsearch::search::{score_model, ScoreMode};
///
/// let series = [10.0, 20.0, 30.0, 40.0, 50.0, 60.0];
/// let config = SimpleConfig::new(1, 1, AverageMode::Persist);
/// let result = score_model(&series, 2, &config, &SimpleForecast, ScoreMode::Search).unwrap();
///
/// assert_eq!(result.key, "[1, 1, 'persist']");
/// assert_eq!(result.rmse(), Some(10.0));
/// ```
pub fn score_model<S: ForecastStrategy>(
    series: &[f64],
    test_len: usize,
    config: &S::Config,
    strategy: &S,
    mode: ScoreMode,
) -> Result<ScoreResult<S::Config>> {
    score_with_progress(series, test_len, config, strategy, mode, true)
}

pub(crate) fn score_with_progress<S: ForecastStrategy>(
    series: &[f64],
    test_len: usize,
    config: &S::Config,
    strategy: &S,
    mode: ScoreMode,
    progress: bool,
) -> Result<ScoreResult<S::Config>> {
    let key = config.label();
    let scored = walk_forward_validation(series, test_len, config, strategy, mode.warnings())
        .and_then(|rmse| {
            if rmse.is_finite() {
                Ok(rmse)
            } else {
                Err(ForecastError::NonFiniteForecast)
            }
        });
    let outcome = match scored {
        Ok(rmse) => Score::Rmse(rmse),
        Err(err) if mode == ScoreMode::Debug => return Err(err),
        Err(err) => {
            debug!(model = strategy.name(), config = %key, error = %err, "config failed");
            Score::Failed(err)
        }
    };

    let result = ScoreResult {
        key,
        config: config.clone(),
        outcome,
    };
    if progress {
        if let Some(line) = result.progress_line() {
            println!("{}", line);
        }
    }
    Ok(result)
}
