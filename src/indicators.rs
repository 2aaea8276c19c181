//! Rolling indicator kernels over a close-price series.
//!
//! Every function returns a series aligned one-to-one with its input,
//! with `None` marking entries where the trailing window has not yet
//! filled. Formula conventions that affect numeric parity:
//!
//! - Rolling standard deviation is the *sample* deviation (ddof = 1).
//! - EMA is seeded from the first value, alpha = 2/(span+1), no warm-up
//!   averaging, so it is defined from index 0.
//! - RSI counts the undefined leading diff as zero gain and zero loss,
//!   so it is first defined at index `period - 1`.
//! - Momentum rolls a sum over the diff series and stays undefined while
//!   the window still covers the undefined leading diff.

/// First difference. Index 0 is undefined.
pub fn diff(values: &[f64]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        if i == 0 {
            out.push(None);
        } else {
            out.push(Some(values[i] - values[i - 1]));
        }
    }
    out
}

/// Simple percentage change from the prior value. Index 0 is undefined,
/// as is any entry whose prior value is zero.
pub fn pct_change(values: &[f64]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        if i == 0 || values[i - 1] == 0.0 {
            out.push(None);
        } else {
            out.push(Some((values[i] - values[i - 1]) / values[i - 1]));
        }
    }
    out
}

/// Ratio of each value to the prior value. Index 0 is undefined.
pub fn ratio(values: &[f64]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        if i == 0 || values[i - 1] == 0.0 {
            out.push(None);
        } else {
            out.push(Some(values[i] / values[i - 1]));
        }
    }
    out
}

/// Square root of the ratio of each value to the value two bars back,
/// the per-bar growth rate implied by the two-bar change. The first two
/// entries are undefined, as is any entry whose base value is zero.
pub fn geo_progression(values: &[f64]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        if i < 2 || values[i - 2] == 0.0 {
            out.push(None);
        } else {
            out.push(Some((values[i] / values[i - 2]).sqrt()));
        }
    }
    out
}

/// Simple moving average over a trailing window. The first `window - 1`
/// entries are undefined.
pub fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 {
        return out;
    }
    for i in (window - 1)..values.len() {
        let sum: f64 = values[i + 1 - window..=i].iter().sum();
        out[i] = Some(sum / window as f64);
    }
    out
}

/// Exponential moving average with smoothing factor 2/(span+1), seeded
/// from the first value. Defined from index 0.
pub fn ema(values: &[f64], span: usize) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    if values.is_empty() || span == 0 {
        return vec![None; values.len()];
    }
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut current = values[0];
    out.push(Some(current));
    for &value in &values[1..] {
        current = alpha * value + (1.0 - alpha) * current;
        out.push(Some(current));
    }
    out
}

/// Rolling sample standard deviation (ddof = 1) over a trailing window.
/// Undefined for the first `window - 1` entries, and everywhere when
/// `window < 2` (a single observation has no sample deviation).
pub fn rolling_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window < 2 {
        return out;
    }
    for i in (window - 1)..values.len() {
        let slice = &values[i + 1 - window..=i];
        let mean: f64 = slice.iter().sum::<f64>() / window as f64;
        let variance: f64 =
            slice.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (window as f64 - 1.0);
        out[i] = Some(variance.sqrt());
    }
    out
}

/// Relative Strength Index over a trailing window of gains and losses.
///
/// The undefined leading diff contributes zero gain and zero loss, so the
/// first defined entry is at index `period - 1`. A window with zero
/// average loss but positive average gain collapses to 100; a window with
/// no movement at all stays undefined.
pub fn rsi(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let mut gains = vec![0.0; values.len()];
    let mut losses = vec![0.0; values.len()];
    for i in 1..values.len() {
        let delta = values[i] - values[i - 1];
        if delta > 0.0 {
            gains[i] = delta;
        } else {
            losses[i] = -delta;
        }
    }

    for i in (period - 1)..values.len() {
        let avg_gain: f64 = gains[i + 1 - period..=i].iter().sum::<f64>() / period as f64;
        let avg_loss: f64 = losses[i + 1 - period..=i].iter().sum::<f64>() / period as f64;

        out[i] = if avg_loss == 0.0 {
            if avg_gain > 0.0 {
                Some(100.0)
            } else {
                None
            }
        } else {
            let rs = avg_gain / avg_loss;
            Some(100.0 - 100.0 / (1.0 + rs))
        };
    }
    out
}

/// Bollinger-style bands: SMA(window) plus/minus `num_std` rolling sample
/// standard deviations. Returns (upper, lower).
pub fn bollinger(values: &[f64], window: usize, num_std: f64) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let middle = sma(values, window);
    let std = rolling_std(values, window);
    let upper = middle
        .iter()
        .zip(&std)
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => Some(m + num_std * s),
            _ => None,
        })
        .collect();
    let lower = middle
        .iter()
        .zip(&std)
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => Some(m - num_std * s),
            _ => None,
        })
        .collect();
    (upper, lower)
}

/// Momentum: rolling sum of first differences over a trailing window.
/// Undefined until the window no longer covers the undefined leading
/// diff, so the first defined entry is at index `window`.
pub fn momentum(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let diffs = diff(values);
    let mut out = vec![None; values.len()];
    if window == 0 {
        return out;
    }
    for i in (window - 1)..values.len() {
        let slice = &diffs[i + 1 - window..=i];
        if slice.iter().all(|d| d.is_some()) {
            out[i] = Some(slice.iter().map(|d| d.unwrap_or(0.0)).sum());
        }
    }
    out
}

/// Sign of each defined entry: 1 for positive, -1 for negative, 0 for
/// exactly zero. Undefined entries stay undefined.
pub fn sign(values: &[Option<f64>]) -> Vec<Option<f64>> {
    values
        .iter()
        .map(|v| {
            v.map(|v| {
                if v > 0.0 {
                    1.0
                } else if v < 0.0 {
                    -1.0
                } else {
                    0.0
                }
            })
        })
        .collect()
}

/// Fibonacci retracement levels from the global max/min of a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FibLevels {
    pub max_price: f64,
    pub min_price: f64,
    pub level_236: f64,
    pub level_382: f64,
    pub level_618: f64,
}

/// Compute static retracement levels `max - (max - min) * ratio` for the
/// ratios 0.236, 0.382 and 0.618. Returns None for an empty series.
pub fn fibonacci_levels(values: &[f64]) -> Option<FibLevels> {
    if values.is_empty() {
        return None;
    }
    let max_price = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let min_price = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let range = max_price - min_price;
    Some(FibLevels {
        max_price,
        min_price,
        level_236: max_price - range * 0.236,
        level_382: max_price - range * 0.382,
        level_618: max_price - range * 0.618,
    })
}
