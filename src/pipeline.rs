//! The end-to-end pipeline: load, feature, signal, backtest.
//!
//! One run processes one ticker's series with no process-wide state;
//! callers own the returned frame and result.

use crate::backtest::{BacktestConfig, BacktestEngine, BacktestResult};
use crate::error::Result;
use crate::features::FeatureEngine;
use crate::frame::Frame;
use crate::provider::MarketDataProvider;
use crate::strategy::{generate_signals, SignalPolicy};
use crate::types::{Interval, Period, Signal};
use tracing::info;

/// Inputs for one pipeline run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub ticker: String,
    pub period: Period,
    pub interval: Interval,
    pub backtest: BacktestConfig,
}

/// Outcome of one pipeline run: the working frame with every derived
/// column appended, the signal sequence, and the backtest result.
pub struct PipelineRun {
    pub frame: Frame,
    pub signals: Vec<Signal>,
    pub result: BacktestResult,
}

/// Run the four pipeline stages for one ticker.
pub fn run(
    provider: &dyn MarketDataProvider,
    policy: &dyn SignalPolicy,
    config: &RunConfig,
) -> Result<PipelineRun> {
    info!(
        ticker = %config.ticker,
        period = %config.period,
        interval = %config.interval,
        strategy = policy.name(),
        "starting pipeline run"
    );

    let bars = provider.fetch(&config.ticker, config.period, config.interval)?;
    let mut frame = Frame::from_bars(bars);

    FeatureEngine::new(policy.feature_config()).apply(&mut frame)?;

    let signals = generate_signals(&frame, policy);

    let engine = BacktestEngine::new(config.backtest.clone());
    let result = engine.run(&mut frame, &signals, policy.name(), &config.ticker)?;

    info!(
        total_return_pct = result.total_return_pct,
        final_value = result.final_value,
        "pipeline run complete"
    );

    Ok(PipelineRun {
        frame,
        signals,
        result,
    })
}
