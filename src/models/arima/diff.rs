//! Lag polynomials and differencing for SARIMA models.
//!
//! Polynomials are stored as coefficient vectors in powers of the backshift
//! operator `B`, so `[1.0, -1.0]` is `1 - B`.

/// Multiply two lag polynomials.
pub fn polymul(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        for (j, &y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

/// Coefficients of `(1 - B)^d (1 - B^m)^D`.
pub fn differencing_polynomial(d: usize, seasonal_d: usize, period: usize) -> Vec<f64> {
    let mut poly = vec![1.0];
    for _ in 0..d {
        poly = polymul(&poly, &[1.0, -1.0]);
    }
    if period > 0 && seasonal_d > 0 {
        let mut seasonal = vec![0.0; period + 1];
        seasonal[0] = 1.0;
        seasonal[period] = -1.0;
        for _ in 0..seasonal_d {
            poly = polymul(&poly, &seasonal);
        }
    }
    poly
}

/// Apply a lag polynomial: `w_t = Σ c_k y_{t-k}` for every `t` with full lags.
///
/// The result is shorter than `series` by `poly.len() - 1`.
pub fn apply_polynomial(series: &[f64], poly: &[f64]) -> Vec<f64> {
    let lags = poly.len().saturating_sub(1);
    if series.len() <= lags {
        return Vec::new();
    }
    (lags..series.len())
        .map(|t| poly.iter().enumerate().map(|(k, c)| c * series[t - k]).sum())
        .collect()
}
