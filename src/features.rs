//! Feature engine: appends indicator columns to the working frame.
//!
//! The engine only ever appends (or overwrites by name) derived columns;
//! the OHLCV fields of the underlying bars are never mutated. A series
//! shorter than an indicator window is not an error, the leading entries
//! of that column simply stay undefined.

use crate::error::Result;
use crate::frame::Frame;
use crate::indicators;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which indicator families to compute, and with what periods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Simple moving average windows (columns `sma_{w}`).
    pub sma_periods: Vec<usize>,
    /// Exponential moving average spans (columns `ema_{s}`).
    pub ema_spans: Vec<usize>,
    /// RSI period (column `rsi_{p}`).
    pub rsi_period: Option<usize>,
    /// Bollinger band window and std multiplier (columns `bb_upper`, `bb_lower`).
    pub bollinger: Option<(usize, f64)>,
    /// Momentum window (columns `momentum`, `momentum_sign`).
    pub momentum_window: Option<usize>,
    /// First difference of close (column `price_diff`).
    pub price_diff: bool,
    /// Ratio of close to prior close (column `price_ratio`).
    pub price_ratio: bool,
    /// Square-root two-bar growth ratio (column `geo_progression`).
    pub geo_progression: bool,
    /// Static Fibonacci retracement levels (columns `fib_236`, `fib_382`, `fib_618`).
    pub fibonacci: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            sma_periods: vec![20, 50],
            ema_spans: vec![20, 50, 100],
            rsi_period: Some(14),
            bollinger: Some((20, 2.0)),
            momentum_window: Some(5),
            price_diff: true,
            price_ratio: true,
            geo_progression: true,
            fibonacci: true,
        }
    }
}

impl FeatureConfig {
    /// An empty configuration computing nothing.
    pub fn none() -> Self {
        Self {
            sma_periods: vec![],
            ema_spans: vec![],
            rsi_period: None,
            bollinger: None,
            momentum_window: None,
            price_diff: false,
            price_ratio: false,
            geo_progression: false,
            fibonacci: false,
        }
    }

    /// Union of two configurations.
    pub fn merge(mut self, other: &FeatureConfig) -> Self {
        for &p in &other.sma_periods {
            if !self.sma_periods.contains(&p) {
                self.sma_periods.push(p);
            }
        }
        for &s in &other.ema_spans {
            if !self.ema_spans.contains(&s) {
                self.ema_spans.push(s);
            }
        }
        self.rsi_period = self.rsi_period.or(other.rsi_period);
        self.bollinger = self.bollinger.or(other.bollinger);
        self.momentum_window = self.momentum_window.or(other.momentum_window);
        self.price_diff |= other.price_diff;
        self.price_ratio |= other.price_ratio;
        self.geo_progression |= other.geo_progression;
        self.fibonacci |= other.fibonacci;
        self
    }

    /// Largest trailing window any configured indicator needs.
    pub fn warmup_period(&self) -> usize {
        let mut warmup = 0;
        if let Some(&max) = self.sma_periods.iter().max() {
            warmup = warmup.max(max);
        }
        if let Some(p) = self.rsi_period {
            warmup = warmup.max(p);
        }
        if let Some((w, _)) = self.bollinger {
            warmup = warmup.max(w);
        }
        if let Some(w) = self.momentum_window {
            warmup = warmup.max(w + 1);
        }
        warmup
    }
}

/// Computes the configured indicator columns over a frame.
#[derive(Debug, Clone, Default)]
pub struct FeatureEngine {
    config: FeatureConfig,
}

impl FeatureEngine {
    /// Create a feature engine with the given configuration.
    pub fn new(config: FeatureConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Append every configured indicator column to the frame.
    pub fn apply(&self, frame: &mut Frame) -> Result<()> {
        let closes = frame.closes();
        debug!(
            bars = closes.len(),
            warmup = self.config.warmup_period(),
            "computing feature columns"
        );

        for &period in &self.config.sma_periods {
            frame.set_column(format!("sma_{period}"), indicators::sma(&closes, period))?;
        }

        for &span in &self.config.ema_spans {
            frame.set_column(format!("ema_{span}"), indicators::ema(&closes, span))?;
        }

        if let Some(period) = self.config.rsi_period {
            frame.set_column(format!("rsi_{period}"), indicators::rsi(&closes, period))?;
        }

        if let Some((window, num_std)) = self.config.bollinger {
            let (upper, lower) = indicators::bollinger(&closes, window, num_std);
            frame.set_column("bb_upper", upper)?;
            frame.set_column("bb_lower", lower)?;
        }

        if self.config.price_diff {
            frame.set_column("price_diff", indicators::diff(&closes))?;
        }

        if self.config.price_ratio {
            frame.set_column("price_ratio", indicators::ratio(&closes))?;
        }

        if self.config.geo_progression {
            frame.set_column("geo_progression", indicators::geo_progression(&closes))?;
        }

        if let Some(window) = self.config.momentum_window {
            let momentum = indicators::momentum(&closes, window);
            let momentum_sign = indicators::sign(&momentum);
            frame.set_column("momentum", momentum)?;
            frame.set_column("momentum_sign", momentum_sign)?;
        }

        if self.config.fibonacci {
            if let Some(levels) = indicators::fibonacci_levels(&closes) {
                let n = frame.len();
                frame.set_column("fib_236", vec![Some(levels.level_236); n])?;
                frame.set_column("fib_382", vec![Some(levels.level_382); n])?;
                frame.set_column("fib_618", vec![Some(levels.level_618); n])?;
            }
        }

        Ok(())
    }
}
