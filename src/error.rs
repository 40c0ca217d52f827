//! Error types for the anofox-gridsearch library.

use thiserror::Error;

/// Result type alias for grid search operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Broad category of a [`ForecastError`].
///
/// Invalid arguments point at a caller bug and are never swallowed by the
/// splitter or the error measure. Fit failures describe an unstable
/// configuration and are tolerated while grid searching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input or a configuration incompatible with its strategy.
    InvalidArgument,
    /// The strategy could not fit or forecast.
    FitFailure,
}

/// Errors that can occur while validating or scoring forecasters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Dimension mismatch between two aligned sequences.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// The requested test horizon cannot split the series.
    #[error("invalid test length {test_len} for series of length {len}")]
    InvalidTestLength { test_len: usize, len: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The configuration reaches further back than the available history.
    #[error("config beyond end of data: need {needed} observations, have {available}")]
    ConfigOutOfRange { needed: usize, available: usize },

    /// Insufficient data points to fit the model.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// The model could not be fitted (numerical issues, unsupported data).
    #[error("fit failure: {0}")]
    FitFailure(String),

    /// The fitted model produced a NaN or infinite forecast.
    #[error("non-finite forecast")]
    NonFiniteForecast,
}

impl ForecastError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ForecastError::EmptyData
            | ForecastError::DimensionMismatch { .. }
            | ForecastError::InvalidTestLength { .. }
            | ForecastError::InvalidParameter(_)
            | ForecastError::ConfigOutOfRange { .. } => ErrorKind::InvalidArgument,
            ForecastError::InsufficientData { .. }
            | ForecastError::FitFailure(_)
            | ForecastError::NonFiniteForecast => ErrorKind::FitFailure,
        }
    }

    /// Whether this error signals a caller bug rather than model instability.
    pub fn is_invalid_argument(&self) -> bool {
        self.kind() == ErrorKind::InvalidArgument
    }
}
