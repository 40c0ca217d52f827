//! End-to-end grid searches across the three forecasting families.

use anofox_gridsearch::prelude::*;
use approx::assert_relative_eq;

fn tens() -> Vec<f64> {
    vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0]
}

/// Monthly-style series: trend plus a period-4 pattern and a little wobble.
fn seasonal_series(n: usize) -> Vec<f64> {
    let pattern = [6.0, -2.0, -5.0, 1.0];
    (0..n)
        .map(|t| 100.0 + 0.8 * t as f64 + pattern[t % 4] + 0.4 * ((t * 7 % 5) as f64 - 2.0))
        .collect()
}

fn quiet(test_len: usize) -> GridSearch {
    GridSearch::new(SearchConfig::new(test_len).quiet())
}

#[test]
fn persistence_on_a_line_scores_ten() {
    let config = SimpleConfig::new(1, 1, AverageMode::Persist);
    let run = walk_forward(&tens(), 2, &config, &SimpleForecast, WarningPolicy::Emit).unwrap();

    assert_eq!(run.predictions, vec![40.0, 50.0]);
    assert_relative_eq!(run.rmse, 10.0, epsilon = 1e-12);

    let results = quiet(2).run(&tens(), &[config], &SimpleForecast).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results.ranked[0].key, "[1, 1, 'persist']");
    assert_eq!(results.ranked[0].rmse(), Some(10.0));
}

#[test]
fn out_of_range_offset_is_dropped() {
    let configs = vec![
        SimpleConfig::new(1, 1, AverageMode::Persist),
        SimpleConfig::new(2, 5, AverageMode::Mean),
    ];
    let results = quiet(2).run(&tens(), &configs, &SimpleForecast).unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results.ranked[0].config, configs[0]);
    assert!(matches!(
        results.failed[0].error(),
        Some(ForecastError::ConfigOutOfRange { .. })
    ));
}

#[test]
fn simple_space_for_two_lags() {
    let labels: Vec<String> = simple_configs(2, &[1]).iter().map(|c| c.label()).collect();
    assert_eq!(
        labels,
        [
            "[1, 1, 'persist']",
            "[1, 1, 'mean']",
            "[1, 1, 'median']",
            "[2, 1, 'persist']",
            "[2, 1, 'mean']",
            "[2, 1, 'median']",
        ]
    );
}

#[test]
fn empty_and_all_failed_searches_return_nothing() {
    let none: Vec<SimpleConfig> = Vec::new();
    let results = quiet(2).run(&tens(), &none, &SimpleForecast).unwrap();
    assert!(results.is_empty());

    let failing = vec![SimpleConfig::new(4, 4, AverageMode::Median); 3];
    let results = quiet(2).run(&tens(), &failing, &SimpleForecast).unwrap();
    assert!(results.is_empty());
    assert_eq!(results.failed.len(), 3);
}

#[test]
fn invalid_split_is_a_caller_error() {
    let configs = simple_configs(2, &[1]);
    let err = grid_search(&tens(), &configs, 0, &SimpleForecast).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn seasonal_naive_beats_plain_persistence() {
    let series = seasonal_series(48);
    let configs = simple_configs(3, &[1, 4]);
    let results = quiet(12).run(&series, &configs, &SimpleForecast).unwrap();

    let best = results.best().unwrap();
    assert_eq!(best.config.offset, 4);
    let persist = results
        .ranked
        .iter()
        .find(|r| r.key == "[1, 1, 'persist']")
        .and_then(|r| r.rmse())
        .unwrap();
    assert!(best.rmse().unwrap() < persist);
}

#[test]
fn smoothing_search_ranks_seasonal_models_first() {
    let series = seasonal_series(40);
    let configs: Vec<EtsConfig> = exp_smoothing_configs(&[Some(4)])
        .into_iter()
        .filter(|c| !c.use_boxcox && !c.damped)
        .collect();
    let results = quiet(4).run(&series, &configs, &ExponentialSmoothing::default()).unwrap();

    assert!(!results.is_empty());
    assert!(results.best().unwrap().config.seasonal.is_some());
    for r in &results.ranked {
        assert!(r.rmse().unwrap().is_finite());
    }
}

#[test]
fn damped_without_trend_fails_in_search() {
    let config = EtsConfig {
        damped: true,
        ..EtsConfig::simple()
    };
    let result = score_model(
        &seasonal_series(20),
        3,
        &config,
        &ExponentialSmoothing::default(),
        ScoreMode::Search,
    )
    .unwrap();
    assert!(result.is_failed());
}

#[test]
fn sarima_search_over_small_space() {
    let series = seasonal_series(40);
    let configs = vec![
        SarimaConfig::arima(0, 1, 0),
        SarimaConfig::new((0, 0, 0), (0, 1, 0, 4), TrendTerm::Constant),
        SarimaConfig::new((1, 0, 0), (1, 0, 0, 0), TrendTerm::None),
        SarimaConfig::new((1, 0, 1), (0, 1, 0, 4), TrendTerm::Constant),
    ];
    let results = quiet(4).run(&series, &configs, &Sarima::default()).unwrap();

    // Seasonal orders with m = 0 are rejected, the rest score.
    assert_eq!(results.failed.len(), 1);
    assert_eq!(results.failed[0].config, configs[2]);
    assert_eq!(results.len(), 3);
    assert_ne!(results.best().unwrap().config, configs[0]);
}

#[test]
fn debug_scoring_propagates_failure() {
    let config = SarimaConfig::new((0, 0, 0), (0, 1, 0, 12), TrendTerm::None);
    let err = score_model(&tens(), 2, &config, &Sarima::default(), ScoreMode::Debug).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FitFailure);
}

#[test]
fn comparison_report_matches_run() {
    let config = SimpleConfig::new(1, 4, AverageMode::Persist);
    let series = seasonal_series(24);
    let cmp = plot_forecast(&series, 4, &config, &SimpleForecast).unwrap();

    assert_eq!(cmp.rows().len(), 4);
    assert_eq!(cmp.rows()[0].index, 20);
    assert_eq!(cmp.rows()[0].predicted, series[19]);

    let mut out = Vec::new();
    cmp.write_csv(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().count(), 5);
    assert!(text.starts_with("index,timestamp,actual,predicted,error"));
}

#[test]
fn nan_observation_never_ranks() {
    let series = vec![10.0, 20.0, f64::NAN, 40.0, 50.0, 60.0, 70.0];
    let configs = simple_configs(3, &[1]);
    let results = quiet(3).run(&series, &configs, &SimpleForecast).unwrap();

    assert!(results.ranked.iter().all(|r| r.rmse().unwrap().is_finite()));
    assert_eq!(results.len() + results.failed.len(), configs.len());
    assert!(results
        .failed
        .iter()
        .any(|r| r.error() == Some(&ForecastError::NonFiniteForecast)));
}
