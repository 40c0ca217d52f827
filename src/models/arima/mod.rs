//! Seasonal ARIMA models.
//!
//! SARIMA(p, d, q)(P, D, Q)\[m\] with an optional constant and/or linear
//! trend, fitted by conditional sum of squares.

mod diff;
mod sarima;

pub use diff::{apply_polynomial, differencing_polynomial, polymul};
pub use sarima::{Sarima, SarimaConfig, TrendTerm};
