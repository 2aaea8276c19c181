//! RSI + SMA crossover policy.
//!
//! Buys when RSI is oversold while the fast SMA is above the slow SMA,
//! sells when RSI is overbought while the fast SMA is below the slow SMA.
//! The trend filter makes the buy and sell conditions mutually exclusive.

use crate::features::FeatureConfig;
use crate::frame::Frame;
use crate::strategy::SignalPolicy;
use crate::types::Signal;

/// RSI + SMA crossover policy.
///
/// # Parameters
/// - `rsi_period`: RSI window (default: 14)
/// - `fast_period` / `slow_period`: SMA windows (default: 20/50)
/// - `oversold` / `overbought`: RSI thresholds (default: 30/70)
#[derive(Debug, Clone)]
pub struct RsiSmaCrossover {
    rsi_period: usize,
    fast_period: usize,
    slow_period: usize,
    oversold: f64,
    overbought: f64,
}

impl RsiSmaCrossover {
    /// Create a new policy.
    pub fn new(
        rsi_period: usize,
        fast_period: usize,
        slow_period: usize,
        oversold: f64,
        overbought: f64,
    ) -> Self {
        assert!(
            fast_period < slow_period,
            "Fast period must be less than slow period"
        );
        assert!(
            oversold < overbought,
            "Oversold threshold must be below overbought"
        );
        Self {
            rsi_period,
            fast_period,
            slow_period,
            oversold,
            overbought,
        }
    }

    /// Create with default parameters (14, 20/50, 30/70).
    pub fn default_params() -> Self {
        Self::new(14, 20, 50, 30.0, 70.0)
    }
}

impl SignalPolicy for RsiSmaCrossover {
    fn name(&self) -> &str {
        "RSI + SMA Crossover"
    }

    fn feature_config(&self) -> FeatureConfig {
        FeatureConfig {
            sma_periods: vec![self.fast_period, self.slow_period],
            rsi_period: Some(self.rsi_period),
            bollinger: Some((self.fast_period, 2.0)),
            ..FeatureConfig::none()
        }
    }

    fn signal_at(&self, frame: &Frame, index: usize) -> Signal {
        let rsi = frame.value(&format!("rsi_{}", self.rsi_period), index);
        let fast = frame.value(&format!("sma_{}", self.fast_period), index);
        let slow = frame.value(&format!("sma_{}", self.slow_period), index);

        let (Some(rsi), Some(fast), Some(slow)) = (rsi, fast, slow) else {
            return Signal::Flat;
        };

        if rsi < self.oversold && fast > slow {
            Signal::Buy
        } else if rsi > self.overbought && fast < slow {
            Signal::Sell
        } else {
            Signal::Flat
        }
    }
}
