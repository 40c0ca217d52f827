//! Forecasting strategies.
//!
//! Each family pairs a typed configuration with a strategy that refits on
//! the supplied history and forecasts one step ahead.

mod traits;

pub mod arima;
pub mod baseline;
pub mod exponential;

pub use arima::{Sarima, SarimaConfig, TrendTerm};
pub use baseline::{AverageMode, SimpleConfig, SimpleForecast};
pub use exponential::{Component, EtsConfig, ExponentialSmoothing};
pub use traits::{ForecastStrategy, ModelConfig, WarningPolicy};
