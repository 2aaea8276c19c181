//! Pure price-momentum policy.
//!
//! Buys when the close rose versus the prior bar, sells when it fell,
//! stays flat when unchanged or when the change is undefined (first bar).

use crate::features::FeatureConfig;
use crate::frame::Frame;
use crate::strategy::SignalPolicy;
use crate::types::Signal;

/// Momentum-of-price policy over the one-bar close change.
#[derive(Debug, Clone, Default)]
pub struct MomentumOnly;

impl MomentumOnly {
    /// Create a new policy. Takes no parameters.
    pub fn new() -> Self {
        Self
    }
}

impl SignalPolicy for MomentumOnly {
    fn name(&self) -> &str {
        "Momentum Only"
    }

    fn feature_config(&self) -> FeatureConfig {
        FeatureConfig {
            price_diff: true,
            price_ratio: true,
            geo_progression: true,
            ..FeatureConfig::none()
        }
    }

    fn signal_at(&self, frame: &Frame, index: usize) -> Signal {
        match frame.value("price_diff", index) {
            Some(d) if d > 0.0 => Signal::Buy,
            Some(d) if d < 0.0 => Signal::Sell,
            _ => Signal::Flat,
        }
    }
}
