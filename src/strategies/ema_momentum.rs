//! EMA crossover policy with momentum confirmation.
//!
//! Buys when the fast EMA is above the slow EMA and rolling momentum is
//! positive, sells when the fast EMA is below the slow EMA and momentum
//! is negative. The opposite EMA orderings make the rules mutually
//! exclusive.

use crate::features::FeatureConfig;
use crate::frame::Frame;
use crate::strategy::SignalPolicy;
use crate::types::Signal;

/// EMA crossover + momentum confirmation policy.
///
/// # Parameters
/// - `fast_span` / `slow_span`: EMA spans (default: 20/50)
/// - `trend_span`: additional EMA computed for context plots (default: 100)
/// - `momentum_window`: rolling sum window over close diffs (default: 5)
#[derive(Debug, Clone)]
pub struct EmaMomentumConfirmed {
    fast_span: usize,
    slow_span: usize,
    trend_span: usize,
    momentum_window: usize,
}

impl EmaMomentumConfirmed {
    /// Create a new policy.
    pub fn new(fast_span: usize, slow_span: usize, trend_span: usize, momentum_window: usize) -> Self {
        assert!(
            fast_span < slow_span,
            "Fast span must be less than slow span"
        );
        assert!(momentum_window > 0, "Momentum window must be positive");
        Self {
            fast_span,
            slow_span,
            trend_span,
            momentum_window,
        }
    }

    /// Create with default parameters (20/50, trend 100, momentum 5).
    pub fn default_params() -> Self {
        Self::new(20, 50, 100, 5)
    }
}

impl SignalPolicy for EmaMomentumConfirmed {
    fn name(&self) -> &str {
        "EMA Crossover + Momentum"
    }

    fn feature_config(&self) -> FeatureConfig {
        FeatureConfig {
            ema_spans: vec![self.fast_span, self.slow_span, self.trend_span],
            momentum_window: Some(self.momentum_window),
            fibonacci: true,
            ..FeatureConfig::none()
        }
    }

    fn signal_at(&self, frame: &Frame, index: usize) -> Signal {
        let fast = frame.value(&format!("ema_{}", self.fast_span), index);
        let slow = frame.value(&format!("ema_{}", self.slow_span), index);
        let momentum_sign = frame.value("momentum_sign", index);

        let (Some(fast), Some(slow), Some(momentum_sign)) = (fast, slow, momentum_sign) else {
            return Signal::Flat;
        };

        if fast > slow && momentum_sign > 0.0 {
            Signal::Buy
        } else if fast < slow && momentum_sign < 0.0 {
            Signal::Sell
        } else {
            Signal::Flat
        }
    }
}
