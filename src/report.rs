//! Actual-versus-predicted comparison of a walk-forward pass.

use std::io::{self, Write};

use chrono::{DateTime, Duration, Utc};

use crate::error::{ForecastError, Result};
use crate::models::{ForecastStrategy, WarningPolicy};
use crate::validation::{walk_forward, WalkForwardRun};

/// One held-out observation and its forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    /// Position in the full series.
    pub index: usize,
    pub timestamp: Option<DateTime<Utc>>,
    pub actual: f64,
    pub predicted: f64,
    /// `actual - predicted`.
    pub error: f64,
}

/// Forecasts aligned with the observations they predicted.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastComparison {
    rows: Vec<ComparisonRow>,
    rmse: f64,
}

impl ForecastComparison {
    pub fn from_run(run: &WalkForwardRun) -> Self {
        let rows = run
            .actual
            .iter()
            .zip(&run.predictions)
            .enumerate()
            .map(|(i, (&actual, &predicted))| ComparisonRow {
                index: run.train_len + i,
                timestamp: None,
                actual,
                predicted,
                error: actual - predicted,
            })
            .collect();
        Self {
            rows,
            rmse: run.rmse,
        }
    }

    /// Attach timestamps, one per observation of the full series.
    ///
    /// # Errors
    /// [`ForecastError::DimensionMismatch`] when `timestamps` is shorter than
    /// the series the comparison was built from.
    pub fn with_timestamps(mut self, timestamps: &[DateTime<Utc>]) -> Result<Self> {
        let needed = self.rows.last().map_or(0, |row| row.index + 1);
        if timestamps.len() < needed {
            return Err(ForecastError::DimensionMismatch {
                expected: needed,
                got: timestamps.len(),
            });
        }
        for row in &mut self.rows {
            row.timestamp = Some(timestamps[row.index]);
        }
        Ok(self)
    }

    /// Attach evenly spaced timestamps, the first observation of the series
    /// being at `start`.
    pub fn with_regular_timestamps(mut self, start: DateTime<Utc>, step: Duration) -> Self {
        for row in &mut self.rows {
            row.timestamp = i32::try_from(row.index)
                .ok()
                .and_then(|i| step.checked_mul(i))
                .and_then(|offset| start.checked_add_signed(offset));
        }
        self
    }

    pub fn rows(&self) -> &[ComparisonRow] {
        &self.rows
    }

    pub fn rmse(&self) -> f64 {
        self.rmse
    }

    pub fn predictions(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.predicted).collect()
    }

    /// Write the comparison as CSV with header
    /// `index,timestamp,actual,predicted,error`.
    pub fn write_csv<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "index,timestamp,actual,predicted,error")?;
        for row in &self.rows {
            let timestamp = row
                .timestamp
                .map(|ts| ts.to_rfc3339())
                .unwrap_or_default();
            writeln!(
                out,
                "{},{},{},{},{}",
                row.index, timestamp, row.actual, row.predicted, row.error
            )?;
        }
        Ok(())
    }
}

/// Walk forward with warnings enabled and return the comparison table.
///
/// Any failure is returned as `Err`.
pub fn plot_forecast<S: ForecastStrategy>(
    series: &[f64],
    test_len: usize,
    config: &S::Config,
    strategy: &S,
) -> Result<ForecastComparison> {
    let run = walk_forward(series, test_len, config, strategy, WarningPolicy::Emit)?;
    Ok(ForecastComparison::from_run(&run))
}
