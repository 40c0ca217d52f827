//! Seasonal ARIMA with an optional deterministic trend, fitted by conditional
//! sum of squares.
//!
//! The series is differenced with `(1 - B)^d (1 - B^m)^D`, the trend is
//! removed on the differenced scale, and the remaining series follows
//!
//! ```text
//! φ(B) Φ(B^m) z_t = θ(B) Θ(B^m) e_t
//! ```
//!
//! One-step forecasts are mapped back through the differencing polynomial.

use std::fmt;

use tracing::warn;

use crate::error::{ForecastError, Result};
use crate::models::arima::diff::{apply_polynomial, differencing_polynomial, polymul};
use crate::models::{ForecastStrategy, ModelConfig, WarningPolicy};
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};
use crate::utils::stats::mean;

const COEF_BOUNDS: (f64, f64) = (-0.99, 0.99);
const FREE: (f64, f64) = (f64::NEG_INFINITY, f64::INFINITY);

/// Deterministic trend included in the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendTerm {
    /// No trend (`'n'`).
    None,
    /// Constant (`'c'`).
    Constant,
    /// Linear in time, no constant (`'t'`).
    Linear,
    /// Constant plus linear (`'ct'`).
    ConstantLinear,
}

impl TrendTerm {
    pub const ALL: [TrendTerm; 4] = [
        TrendTerm::None,
        TrendTerm::Constant,
        TrendTerm::Linear,
        TrendTerm::ConstantLinear,
    ];

    pub fn code(self) -> &'static str {
        match self {
            TrendTerm::None => "n",
            TrendTerm::Constant => "c",
            TrendTerm::Linear => "t",
            TrendTerm::ConstantLinear => "ct",
        }
    }

    fn n_params(self) -> usize {
        match self {
            TrendTerm::None => 0,
            TrendTerm::Constant | TrendTerm::Linear => 1,
            TrendTerm::ConstantLinear => 2,
        }
    }

    /// Trend value at position `t` of the differenced series.
    fn value(self, params: &[f64], t: usize) -> f64 {
        let time = (t + 1) as f64;
        match self {
            TrendTerm::None => 0.0,
            TrendTerm::Constant => params[0],
            TrendTerm::Linear => params[0] * time,
            TrendTerm::ConstantLinear => params[0] + params[1] * time,
        }
    }

    /// Least-squares starting values for the trend parameters.
    fn initial_guess(self, w: &[f64]) -> Vec<f64> {
        let times: Vec<f64> = (1..=w.len()).map(|t| t as f64).collect();
        match self {
            TrendTerm::None => vec![],
            TrendTerm::Constant => vec![mean(w)],
            TrendTerm::Linear => {
                let sxy: f64 = times.iter().zip(w).map(|(t, y)| t * y).sum();
                let sxx: f64 = times.iter().map(|t| t * t).sum();
                vec![if sxx > 0.0 { sxy / sxx } else { 0.0 }]
            }
            TrendTerm::ConstantLinear => {
                let t_mean = mean(&times);
                let w_mean = mean(w);
                let sxy: f64 = times
                    .iter()
                    .zip(w)
                    .map(|(t, y)| (t - t_mean) * (y - w_mean))
                    .sum();
                let sxx: f64 = times.iter().map(|t| (t - t_mean).powi(2)).sum();
                let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
                vec![w_mean - slope * t_mean, slope]
            }
        }
    }
}

impl fmt::Display for TrendTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Configuration for [`Sarima`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SarimaConfig {
    /// Non-seasonal `(p, d, q)`.
    pub order: (usize, usize, usize),
    /// Seasonal `(P, D, Q, m)`.
    pub seasonal_order: (usize, usize, usize, usize),
    pub trend: TrendTerm,
}

impl SarimaConfig {
    pub fn new(
        order: (usize, usize, usize),
        seasonal_order: (usize, usize, usize, usize),
        trend: TrendTerm,
    ) -> Self {
        Self {
            order,
            seasonal_order,
            trend,
        }
    }

    /// Non-seasonal ARIMA(p, d, q) without trend.
    pub fn arima(p: usize, d: usize, q: usize) -> Self {
        Self::new((p, d, q), (0, 0, 0, 0), TrendTerm::None)
    }

    fn has_seasonal_terms(&self) -> bool {
        let (sp, sd, sq, _) = self.seasonal_order;
        sp + sd + sq > 0
    }
}

impl ModelConfig for SarimaConfig {
    fn label(&self) -> String {
        let (p, d, q) = self.order;
        let (sp, sd, sq, m) = self.seasonal_order;
        format!(
            "[({}, {}, {}), ({}, {}, {}, {}), '{}']",
            p, d, q, sp, sd, sq, m, self.trend
        )
    }
}

/// Observations needed to fit `config`, or `None` when the lag spans do
/// not fit in a `usize`.
fn required_len(config: &SarimaConfig, period: usize) -> Option<usize> {
    let (p, d, q) = config.order;
    let (sp, sd, sq, _) = config.seasonal_order;
    let span = |regular: usize, seasonal: usize| seasonal.checked_mul(period)?.checked_add(regular);
    let diff_lags = span(d, sd)?;
    let start = span(p, sp)?.max(span(q, sq)?);
    let n_params = [p, sp, q, sq]
        .into_iter()
        .try_fold(config.trend.n_params(), usize::checked_add)?;
    diff_lags.checked_add(start)?.checked_add(n_params)?.checked_add(1)
}

/// Lag structure of a configuration, with seasonal factors expanded.
#[derive(Debug, Clone)]
struct Layout {
    trend: TrendTerm,
    p: usize,
    sp: usize,
    q: usize,
    sq: usize,
    period: usize,
    /// Coefficients of the combined differencing polynomial.
    diff_poly: Vec<f64>,
}

impl Layout {
    /// Resolve the lag structure for a history of `available` observations.
    ///
    /// Lag spans are checked against the history before the differencing
    /// polynomial is built, so an oversized period or order fails with
    /// `InsufficientData` instead of allocating.
    fn for_history(config: &SarimaConfig, available: usize) -> Result<Self> {
        let (p, d, q) = config.order;
        let (sp, sd, sq, m) = config.seasonal_order;
        if config.has_seasonal_terms() && m < 2 {
            return Err(ForecastError::InvalidParameter(format!(
                "seasonal order {:?} requires a period of at least 2",
                config.seasonal_order
            )));
        }
        let period = if config.has_seasonal_terms() { m } else { 0 };
        let needed = required_len(config, period).unwrap_or(usize::MAX);
        if period >= available || available < needed {
            return Err(ForecastError::InsufficientData {
                needed: needed.max(period.saturating_add(1)),
                got: available,
            });
        }
        Ok(Self {
            trend: config.trend,
            p,
            sp,
            q,
            sq,
            period,
            diff_poly: differencing_polynomial(d, sd, period),
        })
    }

    fn n_params(&self) -> usize {
        self.trend.n_params() + self.p + self.sp + self.q + self.sq
    }

    fn ar_lags(&self) -> usize {
        self.p + self.sp * self.period
    }

    fn ma_lags(&self) -> usize {
        self.q + self.sq * self.period
    }

    /// Observations needed before the first conditional residual.
    fn start(&self) -> usize {
        self.ar_lags().max(self.ma_lags())
    }

    fn initial_guess(&self, w: &[f64]) -> (Vec<f64>, Vec<(f64, f64)>) {
        let mut guess = self.trend.initial_guess(w);
        let mut bounds = vec![FREE; guess.len()];
        for order in [self.p, self.sp, self.q, self.sq] {
            for i in 0..order {
                guess.push(0.1 / (i + 1) as f64);
                bounds.push(COEF_BOUNDS);
            }
        }
        (guess, bounds)
    }

    fn unpack<'a>(&self, params: &'a [f64]) -> Coefficients<'a> {
        let (trend, rest) = params.split_at(self.trend.n_params());
        let (ar, rest) = rest.split_at(self.p);
        let (sar, rest) = rest.split_at(self.sp);
        let (ma, sma) = rest.split_at(self.q);

        let ar_poly = polymul(
            &lag_polynomial(ar, 1, -1.0),
            &lag_polynomial(sar, self.period, -1.0),
        );
        let ma_poly = polymul(
            &lag_polynomial(ma, 1, 1.0),
            &lag_polynomial(sma, self.period, 1.0),
        );
        Coefficients {
            trend,
            // z_t = Σ a_k z_{t-k} + Σ b_k e_{t-k} + e_t
            ar: ar_poly.iter().skip(1).map(|c| -c).collect(),
            ma: ma_poly.into_iter().skip(1).collect(),
        }
    }
}

/// `1 + sign·Σ c_i B^{i·step}`.
fn lag_polynomial(coefs: &[f64], step: usize, sign: f64) -> Vec<f64> {
    let mut poly = vec![0.0; coefs.len() * step.max(1) + 1];
    poly[0] = 1.0;
    for (i, c) in coefs.iter().enumerate() {
        poly[(i + 1) * step.max(1)] = sign * c;
    }
    poly
}

struct Coefficients<'a> {
    trend: &'a [f64],
    ar: Vec<f64>,
    ma: Vec<f64>,
}

/// Conditional residuals and the one-step prediction on the differenced scale.
struct Recursion {
    css: f64,
    next: f64,
}

fn recurse(w: &[f64], layout: &Layout, params: &[f64]) -> Recursion {
    let coefs = layout.unpack(params);
    let start = layout.start();
    let z: Vec<f64> = w
        .iter()
        .enumerate()
        .map(|(t, v)| v - layout.trend.value(coefs.trend, t))
        .collect();

    let predict = |t: usize, residuals: &[f64]| -> f64 {
        let ar: f64 = coefs
            .ar
            .iter()
            .enumerate()
            .map(|(k, a)| a * z[t - 1 - k])
            .sum();
        let ma: f64 = coefs
            .ma
            .iter()
            .enumerate()
            .map(|(k, b)| b * residuals[t - 1 - k])
            .sum();
        ar + ma
    };

    let mut residuals = vec![0.0; z.len()];
    let mut css = 0.0;
    for t in start..z.len() {
        let e = z[t] - predict(t, &residuals);
        residuals[t] = e;
        css += e * e;
    }

    let n = z.len();
    let next = predict(n, &residuals) + layout.trend.value(coefs.trend, n);
    Recursion { css, next }
}

/// Seasonal ARIMA forecaster.
///
/// Parameters are re-estimated on every call. AR and MA coefficients are
/// bounded to `(-0.99, 0.99)`; trend parameters are free.
///
/// # Example
/// ```
/// use anofox_gridsearch::models::{ForecastStrategy, WarningPolicy};
/// use anofox_gridsearch::models::arima::{Sarima, SarimaConfig};
///
/// // ARIMA(0, 1, 0) is a random walk: the forecast is the last value.
/// let yhat = Sarima::default()
///     .forecast(&[3.0, 5.0, 4.0, 6.0], &SarimaConfig::arima(0, 1, 0), WarningPolicy::Suppress)
///     .unwrap();
/// assert_eq!(yhat, 6.0);
/// ```
#[derive(Debug, Clone)]
pub struct Sarima {
    optimizer: NelderMeadConfig,
}

impl Default for Sarima {
    fn default() -> Self {
        Self::new(NelderMeadConfig::fast())
    }
}

impl Sarima {
    pub fn new(optimizer: NelderMeadConfig) -> Self {
        Self { optimizer }
    }
}

impl ForecastStrategy for Sarima {
    type Config = SarimaConfig;

    fn forecast(
        &self,
        history: &[f64],
        config: &SarimaConfig,
        warnings: WarningPolicy,
    ) -> Result<f64> {
        let layout = Layout::for_history(config, history.len())?;

        let w = apply_polynomial(history, &layout.diff_poly);
        let params = if layout.n_params() == 0 {
            Vec::new()
        } else {
            let (guess, bounds) = layout.initial_guess(&w);
            let result = nelder_mead(
                |p| recurse(&w, &layout, p).css,
                &guess,
                Some(&bounds),
                self.optimizer.clone(),
            );
            if !result.converged && warnings.emits() {
                warn!(
                    config = %config.label(),
                    iterations = result.iterations,
                    "SARIMA optimizer did not converge"
                );
            }
            result.optimal_point
        };

        let fit = recurse(&w, &layout, &params);
        if !fit.css.is_finite() {
            return Err(ForecastError::FitFailure(
                "conditional sum of squares diverged".to_string(),
            ));
        }

        // y_n = w_n - Σ_{k≥1} c_k y_{n-k}
        let n = history.len();
        let carried: f64 = layout
            .diff_poly
            .iter()
            .enumerate()
            .skip(1)
            .map(|(k, c)| c * history[n - k])
            .sum();
        let yhat = fit.next - carried;

        if yhat.is_finite() {
            Ok(yhat)
        } else {
            Err(ForecastError::NonFiniteForecast)
        }
    }

    fn name(&self) -> &str {
        "SARIMA"
    }
}
