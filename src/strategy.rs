//! Signal policy trait and signal generation.

use crate::error::{BacktestError, Result};
use crate::features::FeatureConfig;
use crate::frame::Frame;
use crate::strategies::{EmaMomentumConfirmed, MomentumOnly, RsiSmaCrossover};
use crate::types::Signal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A swappable rule set mapping one feature row to a discrete signal.
///
/// Implementations must be pure and stateless per row: `signal_at` may
/// only read columns at the given index, never ahead of it. Undefined
/// feature values never match a rule.
pub trait SignalPolicy: Send + Sync {
    /// Returns the name of the policy.
    fn name(&self) -> &str;

    /// Feature columns the engine must compute before evaluation.
    fn feature_config(&self) -> FeatureConfig;

    /// Map the feature row at `index` to a signal.
    fn signal_at(&self, frame: &Frame, index: usize) -> Signal;
}

/// Evaluate a policy over every row of the frame.
pub fn generate_signals(frame: &Frame, policy: &dyn SignalPolicy) -> Vec<Signal> {
    (0..frame.len()).map(|i| policy.signal_at(frame, i)).collect()
}

/// Tag for the built-in policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    /// RSI oversold/overbought gated by an SMA trend filter.
    RsiSmaCrossover,
    /// Sign of the one-bar price change.
    MomentumOnly,
    /// EMA crossover confirmed by momentum sign.
    EmaMomentumConfirmed,
}

impl PolicyKind {
    /// Build the policy with its default parameters.
    pub fn build(&self) -> Box<dyn SignalPolicy> {
        match self {
            PolicyKind::RsiSmaCrossover => Box::new(RsiSmaCrossover::default_params()),
            PolicyKind::MomentumOnly => Box::new(MomentumOnly::new()),
            PolicyKind::EmaMomentumConfirmed => Box::new(EmaMomentumConfirmed::default_params()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::RsiSmaCrossover => "rsi-sma-crossover",
            PolicyKind::MomentumOnly => "momentum-only",
            PolicyKind::EmaMomentumConfirmed => "ema-momentum-confirmed",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = BacktestError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rsi-sma-crossover" => Ok(PolicyKind::RsiSmaCrossover),
            "momentum-only" => Ok(PolicyKind::MomentumOnly),
            "ema-momentum-confirmed" => Ok(PolicyKind::EmaMomentumConfirmed),
            other => Err(BacktestError::InvalidInput(format!(
                "Unknown strategy: {other}"
            ))),
        }
    }
}
