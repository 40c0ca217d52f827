//! Configuration spaces for each forecasting family.

use itertools::iproduct;

use crate::models::arima::{SarimaConfig, TrendTerm};
use crate::models::baseline::{AverageMode, SimpleConfig};
use crate::models::exponential::{Component, EtsConfig};

const BOOLS: [bool; 2] = [true, false];
const COMPONENTS: [Option<Component>; 3] = [
    Some(Component::Additive),
    Some(Component::Multiplicative),
    None,
];

/// Every `(n, offset, mode)` with `n` in `1..=max_length`.
///
/// Enumerated with `n` outermost and mode innermost.
///
/// # Example
/// ```
/// use anofox_gridsearch::models::ModelConfig;
/// use anofox_gridsearch::search::simple_configs;
///
/// let labels: Vec<String> = simple_configs(2, &[1]).iter().map(|c| c.label()).collect();
/// assert_eq!(labels[0], "[1, 1, 'persist']");
/// assert_eq!(labels[5], "[2, 1, 'median']");
/// ```
pub fn simple_configs(max_length: usize, offsets: &[usize]) -> Vec<SimpleConfig> {
    iproduct!(1..=max_length, offsets, AverageMode::ALL)
        .map(|(n, &offset, mode)| SimpleConfig::new(n, offset, mode))
        .collect()
}

/// Holt-Winters configurations: 72 per entry of `seasonal`.
///
/// Pass `&[None]` for non-seasonal data.
pub fn exp_smoothing_configs(seasonal: &[Option<usize>]) -> Vec<EtsConfig> {
    iproduct!(COMPONENTS, BOOLS, COMPONENTS, seasonal, BOOLS, BOOLS)
        .map(
            |(trend, damped, season, &period, use_boxcox, remove_bias)| EtsConfig {
                trend,
                damped,
                seasonal: season,
                seasonal_period: period,
                use_boxcox,
                remove_bias,
            },
        )
        .collect()
}

/// SARIMA configurations: 1296 per entry of `seasonal`.
///
/// Pass `&[0]` for non-seasonal data.
pub fn sarima_configs(seasonal: &[usize]) -> Vec<SarimaConfig> {
    iproduct!(
        0..3usize,
        0..2usize,
        0..3usize,
        TrendTerm::ALL,
        0..3usize,
        0..2usize,
        0..3usize,
        seasonal
    )
    .map(|(p, d, q, trend, sp, sd, sq, &m)| SarimaConfig::new((p, d, q), (sp, sd, sq, m), trend))
    .collect()
}
