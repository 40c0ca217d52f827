//! Numerical helpers shared by the forecasting strategies.

pub mod metrics;
pub mod optimization;
pub mod stats;

pub use metrics::{mae, mse, rmse};
pub use optimization::{nelder_mead, NelderMeadConfig, NelderMeadResult};
pub use stats::{mean, median};
