//! The calling convention shared by every forecasting family.

use std::fmt::Debug;

use crate::error::Result;

/// Whether a strategy may emit diagnostic warnings while fitting.
///
/// Grid searches pass [`WarningPolicy::Suppress`]: non-convergence and
/// similar numerical complaints are expected across a broad search and not
/// actionable. Debug scoring passes [`WarningPolicy::Emit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WarningPolicy {
    /// Log warnings through `tracing`.
    #[default]
    Emit,
    /// Stay silent.
    Suppress,
}

impl WarningPolicy {
    /// True when warnings should be logged.
    pub fn emits(self) -> bool {
        matches!(self, WarningPolicy::Emit)
    }
}

/// A typed hyperparameter configuration for one forecasting family.
pub trait ModelConfig: Clone + Debug + Send + Sync {
    /// Stable, unique label used for reporting and grouping.
    fn label(&self) -> String;
}

/// A one-step-ahead forecaster driven by a configuration.
///
/// Implementations refit on every call: `history` is the full data available
/// at the forecast origin and the return value is the forecast for the very
/// next observation.
///
/// # Example
///
/// ```
/// use anofox_gridsearch::models::{ForecastStrategy, WarningPolicy};
/// use anofox_gridsearch::models::baseline::{AverageMode, SimpleConfig, SimpleForecast};
///
/// let config = SimpleConfig::new(2, 1, AverageMode::Mean);
/// let yhat = SimpleForecast
///     .forecast(&[1.0, 2.0, 4.0], &config, WarningPolicy::Emit)
///     .unwrap();
/// assert_eq!(yhat, 3.0);
/// ```
pub trait ForecastStrategy: Sync {
    /// Configuration type accepted by this strategy.
    type Config: ModelConfig;

    /// Forecast the next observation after `history`.
    fn forecast(
        &self,
        history: &[f64],
        config: &Self::Config,
        warnings: WarningPolicy,
    ) -> Result<f64>;

    /// Name of the forecasting family.
    fn name(&self) -> &str;
}
