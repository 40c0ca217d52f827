//! Baseline forecasting strategies.
//!
//! Persistence and windowed averages that serve as benchmarks for the
//! smoothing and ARIMA families.

mod simple;

pub use simple::{AverageMode, SimpleConfig, SimpleForecast};
