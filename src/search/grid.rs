//! Grid search over a configuration space.

use rayon::prelude::*;
use tracing::info;

use crate::core::split_train_test;
use crate::error::Result;
use crate::models::ForecastStrategy;
use crate::search::score::{score_with_progress, ScoreMode, ScoreResult};

/// Configuration for a [`GridSearch`].
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Number of trailing observations held out for walk-forward scoring.
    pub test_len: usize,
    /// Score configurations on the rayon thread pool.
    pub parallel: bool,
    /// Print a `Model[<key>] <rmse>` line for every successful configuration.
    pub progress: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            test_len: 1,
            parallel: true,
            progress: true,
        }
    }
}

impl SearchConfig {
    /// Parallel search with progress output over the last `test_len` values.
    pub fn new(test_len: usize) -> Self {
        Self {
            test_len,
            ..Self::default()
        }
    }

    /// Score configurations one at a time on the calling thread.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Disable the per-configuration progress line.
    pub fn quiet(mut self) -> Self {
        self.progress = false;
        self
    }
}

/// Outcome of a grid search.
#[derive(Debug, Clone)]
pub struct RankedResults<C> {
    /// Successful configurations, best (lowest RMSE) first. Ties keep
    /// enumeration order.
    pub ranked: Vec<ScoreResult<C>>,
    /// Configurations that failed, in enumeration order.
    pub failed: Vec<ScoreResult<C>>,
}

impl<C> RankedResults<C> {
    /// Best configuration, if any succeeded.
    pub fn best(&self) -> Option<&ScoreResult<C>> {
        self.ranked.first()
    }

    /// The `n` best configurations.
    pub fn top(&self, n: usize) -> &[ScoreResult<C>] {
        &self.ranked[..n.min(self.ranked.len())]
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

/// Scores every configuration by walk-forward RMSE and ranks the survivors.
#[derive(Debug, Clone, Default)]
pub struct GridSearch {
    config: SearchConfig,
}

impl GridSearch {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Score `configs` against `series` and rank them.
    ///
    /// # Errors
    /// Only an invalid train/test split is reported; individual configuration
    /// failures are collected in [`RankedResults::failed`].
    pub fn run<S: ForecastStrategy>(
        &self,
        series: &[f64],
        configs: &[S::Config],
        strategy: &S,
    ) -> Result<RankedResults<S::Config>> {
        let test_len = self.config.test_len;
        split_train_test(series, test_len)?;

        info!(
            model = strategy.name(),
            configs = configs.len(),
            series_len = series.len(),
            test_len,
            parallel = self.config.parallel,
            "starting grid search"
        );

        let score = |config: &S::Config| {
            score_with_progress(
                series,
                test_len,
                config,
                strategy,
                ScoreMode::Search,
                self.config.progress,
            )
        };
        let scores: Vec<ScoreResult<S::Config>> = if self.config.parallel {
            configs.par_iter().map(score).collect::<Result<_>>()?
        } else {
            configs.iter().map(score).collect::<Result<_>>()?
        };

        let (mut ranked, failed): (Vec<_>, Vec<_>) =
            scores.into_iter().partition(|s| !s.is_failed());
        ranked.sort_by(|a, b| {
            let a = a.rmse().unwrap_or(f64::INFINITY);
            let b = b.rmse().unwrap_or(f64::INFINITY);
            a.total_cmp(&b)
        });

        match ranked.first() {
            Some(best) => info!(
                model = strategy.name(),
                scored = ranked.len(),
                failed = failed.len(),
                best = %best.key,
                best_rmse = best.rmse().unwrap_or(f64::NAN),
                "grid search complete"
            ),
            None => info!(
                model = strategy.name(),
                failed = failed.len(),
                "grid search complete, no configuration succeeded"
            ),
        }

        Ok(RankedResults { ranked, failed })
    }
}

/// Grid search with default settings: parallel, with progress output.
///
/// # Example
/// ```
/// use anofox_gridsearch::models::baseline::SimpleForecast;
/// use anofox_gridsearch::search::{grid_search, simple_configs};
///
/// let series = [10.0, 20.0, 30.0, 40.0, 50.0, 60.0];
/// let results = grid_search(&series, &simple_configs(2, &[1]), 2, &SimpleForecast).unwrap();
///
/// assert_eq!(results.best().unwrap().key, "[1, 1, 'persist']");
/// ```
pub fn grid_search<S: ForecastStrategy>(
    series: &[f64],
    configs: &[S::Config],
    test_len: usize,
    strategy: &S,
) -> Result<RankedResults<S::Config>> {
    GridSearch::new(SearchConfig::new(test_len)).run(series, configs, strategy)
}
