//! Holt-Winters exponential smoothing as a one-step forecast strategy.
//!
//! Covers additive, multiplicative or absent trend (optionally damped) and
//! additive, multiplicative or absent seasonality, with optional Box-Cox
//! transformation and bias removal.
//!
//! The recursions, with `φ = 1` when the trend is not damped:
//! - Base: `l + φb` (additive trend) or `l·b^φ` (multiplicative trend)
//! - Forecast: `base + s` or `base·s`
//! - Level: `l_t = α·deseason(y_t) + (1-α)·base`
//! - Trend: `b_t = β(l_t - l_{t-1}) + (1-β)φb` or `β(l_t / l_{t-1}) + (1-β)b^φ`
//! - Seasonal: `s_t = γ(y_t - l_t) + (1-γ)s_{t-m}` or `γ(y_t / l_t) + (1-γ)s_{t-m}`

use tracing::warn;

use crate::error::{ForecastError, Result};
use crate::models::{ForecastStrategy, ModelConfig, WarningPolicy};
use crate::transform::BoxCox;
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};
use crate::utils::stats::mean;

const SMOOTHING_BOUNDS: (f64, f64) = (0.0001, 0.9999);
const DAMPING_BOUNDS: (f64, f64) = (0.8, 0.98);

/// Additive or multiplicative form of a trend or seasonal component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Additive,
    Multiplicative,
}

impl Component {
    fn as_str(self) -> &'static str {
        match self {
            Component::Additive => "add",
            Component::Multiplicative => "mul",
        }
    }
}

/// Configuration for [`ExponentialSmoothing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EtsConfig {
    /// Trend component, if any.
    pub trend: Option<Component>,
    /// Damp the trend. Requires a trend component.
    pub damped: bool,
    /// Seasonal component, if any.
    pub seasonal: Option<Component>,
    /// Season length. Required when `seasonal` is set, ignored otherwise.
    pub seasonal_period: Option<usize>,
    /// Fit on Box-Cox transformed data.
    pub use_boxcox: bool,
    /// Shift the forecast so the mean in-sample residual is zero.
    pub remove_bias: bool,
}

impl EtsConfig {
    /// Simple exponential smoothing: no trend, no season, no transform.
    pub fn simple() -> Self {
        Self {
            trend: None,
            damped: false,
            seasonal: None,
            seasonal_period: None,
            use_boxcox: false,
            remove_bias: false,
        }
    }

    pub fn with_trend(mut self, trend: Component, damped: bool) -> Self {
        self.trend = Some(trend);
        self.damped = damped;
        self
    }

    pub fn with_seasonal(mut self, seasonal: Component, period: usize) -> Self {
        self.seasonal = Some(seasonal);
        self.seasonal_period = Some(period);
        self
    }

    pub fn with_boxcox(mut self, use_boxcox: bool) -> Self {
        self.use_boxcox = use_boxcox;
        self
    }

    pub fn with_remove_bias(mut self, remove_bias: bool) -> Self {
        self.remove_bias = remove_bias;
        self
    }

    fn uses_multiplicative(&self) -> bool {
        self.trend == Some(Component::Multiplicative)
            || self.seasonal == Some(Component::Multiplicative)
    }
}

impl ModelConfig for EtsConfig {
    fn label(&self) -> String {
        fn component(c: Option<Component>) -> String {
            c.map_or_else(|| "None".to_string(), |c| format!("'{}'", c.as_str()))
        }
        fn flag(b: bool) -> &'static str {
            if b {
                "True"
            } else {
                "False"
            }
        }
        let period = self
            .seasonal_period
            .map_or_else(|| "None".to_string(), |p| p.to_string());
        format!(
            "[{}, {}, {}, {}, {}, {}]",
            component(self.trend),
            flag(self.damped),
            component(self.seasonal),
            period,
            flag(self.use_boxcox),
            flag(self.remove_bias)
        )
    }
}

/// Resolved model structure for one fit.
#[derive(Debug, Clone, Copy)]
struct Structure {
    trend: Option<Component>,
    damped: bool,
    seasonal: Option<Component>,
    /// Season length, 1 without seasonality.
    period: usize,
}

impl Structure {
    fn from_config(config: &EtsConfig) -> Result<Self> {
        if config.damped && config.trend.is_none() {
            return Err(ForecastError::InvalidParameter(
                "damped requires a trend component".to_string(),
            ));
        }
        let period = match config.seasonal {
            None => 1,
            Some(_) => match config.seasonal_period {
                Some(p) if p >= 2 => p,
                other => {
                    return Err(ForecastError::InvalidParameter(format!(
                        "seasonal component requires a period of at least 2, got {:?}",
                        other
                    )))
                }
            },
        };
        Ok(Self {
            trend: config.trend,
            damped: config.damped,
            seasonal: config.seasonal,
            period,
        })
    }

    /// Two full seasons are needed for the initial seasonal indices.
    fn min_len(&self) -> usize {
        if self.seasonal.is_some() {
            self.period.saturating_mul(2)
        } else if self.trend.is_some() {
            3
        } else {
            2
        }
    }

    /// Number of free smoothing parameters.
    fn n_params(&self) -> usize {
        1 + usize::from(self.trend.is_some())
            + usize::from(self.seasonal.is_some())
            + usize::from(self.damped)
    }

    fn initial_guess(&self) -> (Vec<f64>, Vec<(f64, f64)>) {
        let mut guess = vec![0.3];
        let mut bounds = vec![SMOOTHING_BOUNDS];
        if self.trend.is_some() {
            guess.push(0.1);
            bounds.push(SMOOTHING_BOUNDS);
        }
        if self.seasonal.is_some() {
            guess.push(0.1);
            bounds.push(SMOOTHING_BOUNDS);
        }
        if self.damped {
            guess.push(0.98);
            bounds.push(DAMPING_BOUNDS);
        }
        (guess, bounds)
    }

    fn unpack(&self, p: &[f64]) -> Smoothing {
        let mut it = p.iter().copied();
        let alpha = it.next().unwrap_or(0.3);
        let beta = if self.trend.is_some() {
            it.next().unwrap_or(0.1)
        } else {
            0.0
        };
        let gamma = if self.seasonal.is_some() {
            it.next().unwrap_or(0.1)
        } else {
            0.0
        };
        let phi = if self.damped {
            it.next().unwrap_or(0.98)
        } else {
            1.0
        };
        Smoothing {
            alpha,
            beta,
            gamma,
            phi,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Smoothing {
    alpha: f64,
    beta: f64,
    gamma: f64,
    phi: f64,
}

/// Output of one pass of the smoothing recursions.
#[derive(Debug, Clone)]
struct Pass {
    /// One-step fitted values from index `start` onward.
    fitted: Vec<f64>,
    /// Index of the first fitted observation.
    start: usize,
    sse: f64,
    /// Forecast for the observation after the last one.
    next: f64,
}

fn initial_state(values: &[f64], s: &Structure) -> (f64, f64, Vec<f64>, usize) {
    match s.seasonal {
        Some(kind) => {
            let m = s.period;
            let first = mean(&values[..m]);
            let second = mean(&values[m..2 * m]);
            let trend = match s.trend {
                Some(Component::Additive) => (second - first) / m as f64,
                Some(Component::Multiplicative) => (second / first).powf(1.0 / m as f64),
                None => 0.0,
            };
            let seasonals = values[..m]
                .iter()
                .map(|&y| match kind {
                    Component::Additive => y - first,
                    Component::Multiplicative => y / first,
                })
                .collect();
            (first, trend, seasonals, m)
        }
        None => {
            let trend = match s.trend {
                Some(Component::Additive) => values[1] - values[0],
                Some(Component::Multiplicative) => values[1] / values[0],
                None => 0.0,
            };
            (values[0], trend, Vec::new(), 1)
        }
    }
}

fn base(level: f64, trend: f64, s: &Structure, phi: f64) -> f64 {
    match s.trend {
        None => level,
        Some(Component::Additive) => level + phi * trend,
        Some(Component::Multiplicative) => level * trend.powf(phi),
    }
}

fn seasonalize(base: f64, season: f64, s: &Structure) -> f64 {
    match s.seasonal {
        None => base,
        Some(Component::Additive) => base + season,
        Some(Component::Multiplicative) => base * season,
    }
}

/// Run the recursions over `values` with fixed parameters.
fn smooth(values: &[f64], s: &Structure, p: Smoothing) -> Pass {
    let (mut level, mut trend, mut seasonals, start) = initial_state(values, s);
    let m = s.period;
    let mut fitted = Vec::with_capacity(values.len() - start);
    let mut sse = 0.0;

    for (t, &y) in values.iter().enumerate().skip(start) {
        let season = seasonals.get(t % m).copied().unwrap_or(0.0);
        let b = base(level, trend, s, p.phi);
        let yhat = seasonalize(b, season, s);
        fitted.push(yhat);
        sse += (y - yhat).powi(2);

        let deseasonalized = match s.seasonal {
            None => y,
            Some(Component::Additive) => y - season,
            Some(Component::Multiplicative) => y / season,
        };
        let prev_level = level;
        level = p.alpha * deseasonalized + (1.0 - p.alpha) * b;
        trend = match s.trend {
            None => 0.0,
            Some(Component::Additive) => {
                p.beta * (level - prev_level) + (1.0 - p.beta) * p.phi * trend
            }
            Some(Component::Multiplicative) => {
                p.beta * (level / prev_level) + (1.0 - p.beta) * trend.powf(p.phi)
            }
        };
        if let Some(slot) = seasonals.get_mut(t % m) {
            *slot = match s.seasonal {
                Some(Component::Multiplicative) => p.gamma * (y / level) + (1.0 - p.gamma) * season,
                _ => p.gamma * (y - level) + (1.0 - p.gamma) * season,
            };
        }
    }

    let season = seasonals
        .get(values.len() % m)
        .copied()
        .unwrap_or(0.0);
    let next = seasonalize(base(level, trend, s, p.phi), season, s);

    Pass {
        fitted,
        start,
        sse,
        next,
    }
}

/// Holt-Winters exponential smoothing family.
///
/// Smoothing parameters are re-estimated on every call by minimising the
/// in-sample one-step squared error.
///
/// # Example
/// ```
/// use anofox_gridsearch::models::{ForecastStrategy, WarningPolicy};
/// use anofox_gridsearch::models::exponential::{Component, EtsConfig, ExponentialSmoothing};
///
/// let history: Vec<f64> = (0..20).map(|t| 10.0 + 2.0 * t as f64).collect();
/// let config = EtsConfig::simple().with_trend(Component::Additive, false);
/// let yhat = ExponentialSmoothing::default()
///     .forecast(&history, &config, WarningPolicy::Suppress)
///     .unwrap();
/// assert!((yhat - 50.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct ExponentialSmoothing {
    optimizer: NelderMeadConfig,
}

impl Default for ExponentialSmoothing {
    fn default() -> Self {
        Self::new(NelderMeadConfig::fast())
    }
}

impl ExponentialSmoothing {
    pub fn new(optimizer: NelderMeadConfig) -> Self {
        Self { optimizer }
    }
}

impl ForecastStrategy for ExponentialSmoothing {
    type Config = EtsConfig;

    fn forecast(&self, history: &[f64], config: &EtsConfig, warnings: WarningPolicy) -> Result<f64> {
        let structure = Structure::from_config(config)?;
        if history.len() < structure.min_len() {
            return Err(ForecastError::InsufficientData {
                needed: structure.min_len(),
                got: history.len(),
            });
        }

        let transform = if config.use_boxcox {
            Some(BoxCox::fit(history)?)
        } else {
            None
        };
        let working = match &transform {
            Some(bc) => bc.transform(history),
            None => history.to_vec(),
        };
        if working.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::FitFailure(
                "non-finite values in transformed data".to_string(),
            ));
        }
        if config.uses_multiplicative() && working.iter().any(|&v| v <= 0.0) {
            return Err(ForecastError::FitFailure(
                "multiplicative components require strictly positive data".to_string(),
            ));
        }

        let (guess, bounds) = structure.initial_guess();
        debug_assert_eq!(guess.len(), structure.n_params());
        let result = nelder_mead(
            |p| smooth(&working, &structure, structure.unpack(p)).sse,
            &guess,
            Some(&bounds),
            self.optimizer.clone(),
        );
        if !result.converged && warnings.emits() {
            warn!(
                config = %config.label(),
                iterations = result.iterations,
                "exponential smoothing optimizer did not converge"
            );
        }

        let pass = smooth(&working, &structure, structure.unpack(&result.optimal_point));
        if !pass.sse.is_finite() {
            return Err(ForecastError::FitFailure(
                "smoothing recursions diverged".to_string(),
            ));
        }

        let restore = |v: f64| transform.map_or(v, |bc| bc.invert(v));
        let mut yhat = restore(pass.next);
        if config.remove_bias {
            let residuals: Vec<f64> = history[pass.start..]
                .iter()
                .zip(&pass.fitted)
                .map(|(y, f)| y - restore(*f))
                .collect();
            yhat += mean(&residuals);
        }

        if yhat.is_finite() {
            Ok(yhat)
        } else {
            Err(ForecastError::NonFiniteForecast)
        }
    }

    fn name(&self) -> &str {
        "ExponentialSmoothing"
    }
}
