//! Grid search over persistence and average forecasts.
//!
//! Run with `RUST_LOG=anofox_gridsearch=info cargo run --example naive_search`.

use anofox_gridsearch::models::baseline::SimpleForecast;
use anofox_gridsearch::search::{grid_search, simple_configs};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Two years of a daily count with a weekly cycle.
fn daily_counts() -> Vec<f64> {
    let weekly = [2.0, 5.0, 4.0, 3.0, 6.0, -8.0, -12.0];
    (0..730)
        .map(|day| 40.0 + weekly[day % 7] + 3.0 * ((day * 13 % 11) as f64 / 10.0 - 0.5))
        .collect()
}

fn main() -> anofox_gridsearch::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "anofox_gridsearch=info".into()),
        )
        .init();

    let series = daily_counts();
    let configs = simple_configs(28, &[1, 7]);
    let results = grid_search(&series, &configs, 165, &SimpleForecast)?;

    println!("done");
    for result in results.top(3) {
        if let Some(rmse) = result.rmse() {
            println!("{} {}", result.key, rmse);
        }
    }
    Ok(())
}
