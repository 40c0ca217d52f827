//! Holt-Winters and SARIMA searches on a monthly series, followed by a
//! comparison table for the best SARIMA configuration.
//!
//! Run with `RUST_LOG=anofox_gridsearch=debug cargo run --example seasonal_search`
//! to also see which configurations failed.

use std::io;

use anofox_gridsearch::models::arima::Sarima;
use anofox_gridsearch::models::exponential::ExponentialSmoothing;
use anofox_gridsearch::report::plot_forecast;
use anofox_gridsearch::search::{
    exp_smoothing_configs, sarima_configs, GridSearch, SearchConfig,
};
use chrono::{Duration, TimeZone, Utc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Ten years of monthly data with growth and a yearly cycle.
fn monthly_sales() -> Vec<f64> {
    (0..120)
        .map(|month| {
            let season = (2.0 * std::f64::consts::PI * month as f64 / 12.0).sin();
            (200.0 + 1.5 * month as f64) * (1.0 + 0.15 * season)
                + 4.0 * ((month * 17 % 9) as f64 / 8.0 - 0.5)
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "anofox_gridsearch=info".into()),
        )
        .init();

    let series = monthly_sales();
    let search = GridSearch::new(SearchConfig::new(12).quiet());

    let ets = search.run(
        &series,
        &exp_smoothing_configs(&[None, Some(12)]),
        &ExponentialSmoothing::default(),
    )?;
    println!("exponential smoothing: {} scored, {} failed", ets.len(), ets.failed.len());
    for result in ets.top(3) {
        println!("  {} {:.3}", result.key, result.rmse().unwrap_or(f64::NAN));
    }

    // Non-seasonal SARIMA orders with a seasonal difference only
    let configs: Vec<_> = sarima_configs(&[12])
        .into_iter()
        .filter(|c| {
            let (sp, _, sq, _) = c.seasonal_order;
            sp == 0 && sq == 0
        })
        .collect();
    let sarima = search.run(&series, &configs, &Sarima::default())?;
    println!("sarima: {} scored, {} failed", sarima.len(), sarima.failed.len());
    for result in sarima.top(3) {
        println!("  {} {:.3}", result.key, result.rmse().unwrap_or(f64::NAN));
    }

    if let Some(best) = sarima.best() {
        let start = Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).single().ok_or("bad start date")?;
        let comparison = plot_forecast(&series, 12, &best.config, &Sarima::default())?
            .with_regular_timestamps(start, Duration::days(30));
        comparison.write_csv(&mut io::stdout().lock())?;
    }
    Ok(())
}
