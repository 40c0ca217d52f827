//! Walk-forward grid search.
//!
//! [`configs`] enumerates configuration spaces, [`score_model`] scores one
//! configuration with failures isolated, and [`GridSearch`] scores a whole
//! space and ranks the results by RMSE.

pub mod configs;
mod grid;
mod score;

pub use configs::{exp_smoothing_configs, sarima_configs, simple_configs};
pub use grid::{grid_search, GridSearch, RankedResults, SearchConfig};
pub use score::{progress_line, score_model, Score, ScoreMode, ScoreResult};
