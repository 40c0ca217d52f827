//! Persistence, mean and median forecasts over a (possibly strided) window.

use std::fmt;

use crate::error::{ForecastError, Result};
use crate::models::{ForecastStrategy, ModelConfig, WarningPolicy};
use crate::utils::stats::{mean, median};

/// How the selected window is reduced to a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AverageMode {
    /// Repeat the observation `n` steps back.
    Persist,
    /// Mean of the window.
    Mean,
    /// Median of the window.
    Median,
}

impl AverageMode {
    /// All modes, in enumeration order.
    pub const ALL: [AverageMode; 3] = [AverageMode::Persist, AverageMode::Mean, AverageMode::Median];

    fn as_str(self) -> &'static str {
        match self {
            AverageMode::Persist => "persist",
            AverageMode::Mean => "mean",
            AverageMode::Median => "median",
        }
    }
}

impl fmt::Display for AverageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration `(n, offset, mode)` for [`SimpleForecast`].
///
/// With `offset == 1` the window is the last `n` observations. A larger
/// offset strides back through the history, e.g. `offset = 12` on monthly
/// data averages the same month across the last `n` years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpleConfig {
    /// Window length, or the lag for [`AverageMode::Persist`].
    pub n: usize,
    /// Stride between the selected observations.
    pub offset: usize,
    /// Reduction applied to the window.
    pub mode: AverageMode,
}

impl SimpleConfig {
    pub fn new(n: usize, offset: usize, mode: AverageMode) -> Self {
        Self { n, offset, mode }
    }
}

impl ModelConfig for SimpleConfig {
    fn label(&self) -> String {
        format!("[{}, {}, '{}']", self.n, self.offset, self.mode)
    }
}

/// Naive and average forecasting family.
///
/// # Example
/// ```
/// use anofox_gridsearch::models::{ForecastStrategy, WarningPolicy};
/// use anofox_gridsearch::models::baseline::{AverageMode, SimpleConfig, SimpleForecast};
///
/// let history = [10.0, 20.0, 30.0, 40.0];
/// let persist = SimpleConfig::new(1, 1, AverageMode::Persist);
/// assert_eq!(SimpleForecast.forecast(&history, &persist, WarningPolicy::Emit).unwrap(), 40.0);
///
/// let strided = SimpleConfig::new(2, 2, AverageMode::Mean);
/// // history[-2] = 30, history[-4] = 10
/// assert_eq!(SimpleForecast.forecast(&history, &strided, WarningPolicy::Emit).unwrap(), 20.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleForecast;

impl SimpleForecast {
    /// Observations the config averages over, most recent first.
    fn window(history: &[f64], config: &SimpleConfig) -> Result<Vec<f64>> {
        let len = history.len();
        if config.offset == 0 {
            return Err(ForecastError::InvalidParameter(
                "offset must be at least 1".to_string(),
            ));
        }
        if config.offset == 1 {
            let take = config.n.min(len);
            return Ok(history[len - take..].iter().rev().copied().collect());
        }

        let needed = config.n.saturating_mul(config.offset);
        if needed > len {
            return Err(ForecastError::ConfigOutOfRange {
                needed,
                available: len,
            });
        }
        Ok((1..=config.n).map(|i| history[len - i * config.offset]).collect())
    }
}

impl ForecastStrategy for SimpleForecast {
    type Config = SimpleConfig;

    fn forecast(&self, history: &[f64], config: &SimpleConfig, _: WarningPolicy) -> Result<f64> {
        if history.is_empty() {
            return Err(ForecastError::EmptyData);
        }

        if config.mode == AverageMode::Persist {
            if config.n == 0 || config.n > history.len() {
                return Err(ForecastError::ConfigOutOfRange {
                    needed: config.n.max(1),
                    available: history.len(),
                });
            }
            return finite(history[history.len() - config.n]);
        }

        let values = Self::window(history, config)?;
        if values.len() < 2 {
            return Err(ForecastError::InvalidParameter(format!(
                "cannot calculate average of {} value(s)",
                values.len()
            )));
        }

        finite(match config.mode {
            AverageMode::Mean => mean(&values),
            _ => median(&values),
        })
    }

    fn name(&self) -> &str {
        "Simple"
    }
}

fn finite(value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ForecastError::NonFiniteForecast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const HISTORY: [f64; 6] = [3.0, 9.0, 4.0, 8.0, 1.0, 6.0];

    fn run(n: usize, offset: usize, mode: AverageMode) -> Result<f64> {
        SimpleForecast.forecast(
            &HISTORY,
            &SimpleConfig::new(n, offset, mode),
            WarningPolicy::Emit,
        )
    }

    #[test]
    fn persist_returns_lagged_value() {
        assert_eq!(run(1, 1, AverageMode::Persist).unwrap(), 6.0);
        assert_eq!(run(3, 1, AverageMode::Persist).unwrap(), 8.0);
        assert_eq!(run(6, 1, AverageMode::Persist).unwrap(), 3.0);
    }

    #[test]
    fn persist_ignores_offset() {
        assert_eq!(run(2, 5, AverageMode::Persist).unwrap(), 1.0);
    }

    #[test]
    fn persist_beyond_history_fails() {
        assert!(matches!(
            run(7, 1, AverageMode::Persist),
            Err(ForecastError::ConfigOutOfRange {
                needed: 7,
                available: 6
            })
        ));
        assert!(run(0, 1, AverageMode::Persist).is_err());
    }

    #[test]
    fn mean_and_median_of_trailing_window() {
        // Last three: 8, 1, 6
        assert_relative_eq!(run(3, 1, AverageMode::Mean).unwrap(), 5.0, epsilon = 1e-12);
        assert_relative_eq!(run(3, 1, AverageMode::Median).unwrap(), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn unit_offset_window_truncates_to_history() {
        // n larger than history uses every value
        let m = run(10, 1, AverageMode::Mean).unwrap();
        assert_relative_eq!(m, 31.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn strided_window_uses_offsets() {
        // offset 2: history[-2] = 1, history[-4] = 4, history[-6] = 3
        assert_relative_eq!(run(3, 2, AverageMode::Mean).unwrap(), 8.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(run(3, 2, AverageMode::Median).unwrap(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn strided_window_beyond_history_fails() {
        assert_eq!(
            run(4, 2, AverageMode::Mean),
            Err(ForecastError::ConfigOutOfRange {
                needed: 8,
                available: 6
            })
        );
    }

    #[test]
    fn single_value_cannot_be_averaged() {
        assert!(matches!(
            run(1, 1, AverageMode::Mean),
            Err(ForecastError::InvalidParameter(_))
        ));
        assert!(run(1, 3, AverageMode::Median).is_err());
    }

    #[test]
    fn zero_offset_is_rejected() {
        assert!(run(2, 0, AverageMode::Mean).is_err());
    }

    #[test]
    fn empty_history_is_rejected() {
        let cfg = SimpleConfig::new(1, 1, AverageMode::Persist);
        assert_eq!(
            SimpleForecast.forecast(&[], &cfg, WarningPolicy::Emit),
            Err(ForecastError::EmptyData)
        );
    }

    #[test]
    fn label_is_stable() {
        assert_eq!(
            SimpleConfig::new(2, 12, AverageMode::Median).label(),
            "[2, 12, 'median']"
        );
        assert_eq!(
            SimpleConfig::new(1, 1, AverageMode::Persist).label(),
            "[1, 1, 'persist']"
        );
    }

    #[test]
    fn nan_in_window_is_non_finite() {
        let history = [1.0, f64::NAN, 3.0, 4.0];
        let persist = SimpleConfig::new(3, 1, AverageMode::Persist);
        let mean = SimpleConfig::new(3, 1, AverageMode::Mean);
        for cfg in [persist, mean] {
            assert_eq!(
                SimpleForecast.forecast(&history, &cfg, WarningPolicy::Emit),
                Err(ForecastError::NonFiniteForecast)
            );
        }
        // Window that skips the NaN still forecasts.
        let cfg = SimpleConfig::new(2, 1, AverageMode::Mean);
        assert_relative_eq!(
            SimpleForecast.forecast(&history, &cfg, WarningPolicy::Emit).unwrap(),
            3.5
        );
    }
}
