//! # anofox-gridsearch
//!
//! Walk-forward grid search for univariate one-step forecasters.
//!
//! Every configuration in a space is refit at each step of a held-out test
//! horizon, scored by RMSE, and the successful configurations are ranked.
//! Three forecasting families are provided: simple persistence and
//! averages, Holt-Winters exponential smoothing, and seasonal ARIMA.

// Allow some clippy warnings for cleaner code in specific cases
#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]
#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod error;
pub mod models;
pub mod report;
pub mod search;
pub mod transform;
pub mod utils;
pub mod validation;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::error::{ErrorKind, ForecastError, Result};
    pub use crate::models::{
        AverageMode, Component, EtsConfig, ExponentialSmoothing, ForecastStrategy, ModelConfig,
        Sarima, SarimaConfig, SimpleConfig, SimpleForecast, TrendTerm, WarningPolicy,
    };
    pub use crate::report::{plot_forecast, ForecastComparison};
    pub use crate::search::{
        exp_smoothing_configs, grid_search, sarima_configs, score_model, simple_configs,
        GridSearch, RankedResults, Score, ScoreMode, ScoreResult, SearchConfig,
    };
    pub use crate::validation::{walk_forward, walk_forward_validation, WalkForwardRun};
}
