//! Exponential smoothing forecasters.
//!
//! A single Holt-Winters family covers simple smoothing, Holt's linear
//! trend, damped trends and additive or multiplicative seasonality.

mod holt_winters;

pub use holt_winters::{Component, EtsConfig, ExponentialSmoothing};
