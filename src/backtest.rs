//! Backtest engine: converts a signal sequence into a compounded
//! portfolio-value series.
//!
//! Execution is lagged by one bar: the position held at bar `t` is the
//! signal emitted at `t-1`, and the first bar is always flat. Undefined
//! market returns (the first bar, leading indicator windows) contribute
//! zero growth rather than propagating as errors.

use crate::error::{BacktestError, Result};
use crate::frame::Frame;
use crate::indicators::pct_change;
use crate::types::Signal;
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Configuration for the backtest engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// Initial capital for the backtest.
    pub initial_capital: f64,
    /// Show progress bar during backtest.
    pub show_progress: bool,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_capital: 10_000.0,
            show_progress: true,
        }
    }
}

/// Results from a backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Policy name.
    pub strategy_name: String,
    /// Symbol traded.
    pub symbol: String,
    /// Initial capital.
    pub initial_capital: f64,
    /// Final portfolio value.
    pub final_value: f64,
    /// Total return as a fraction of initial capital.
    pub total_return: f64,
    /// Total return percentage.
    pub total_return_pct: f64,
    /// Number of bars processed.
    pub bars: usize,
    /// First bar timestamp.
    pub start_time: DateTime<Utc>,
    /// Last bar timestamp.
    pub end_time: DateTime<Utc>,
}

/// The backtest engine.
#[derive(Debug, Clone, Default)]
pub struct BacktestEngine {
    config: BacktestConfig,
}

impl BacktestEngine {
    /// Create a new engine.
    pub fn new(config: BacktestConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// Run the backtest over a frame and its signal sequence.
    ///
    /// Appends the `position`, `market_returns`, `strategy_returns` and
    /// `portfolio_value` columns to the frame. Deterministic: running
    /// twice over the same inputs produces bit-identical series.
    pub fn run(
        &self,
        frame: &mut Frame,
        signals: &[Signal],
        strategy_name: &str,
        symbol: &str,
    ) -> Result<BacktestResult> {
        if frame.is_empty() {
            return Err(BacktestError::NoData);
        }
        if signals.len() != frame.len() {
            return Err(BacktestError::InvalidInput(format!(
                "{} signals for {} bars",
                signals.len(),
                frame.len()
            )));
        }

        info!(
            strategy = strategy_name,
            symbol,
            bars = frame.len(),
            "running backtest"
        );

        let progress = if self.config.show_progress {
            let pb = ProgressBar::new(frame.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
                    .unwrap()
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        let market_returns = pct_change(&frame.closes());
        let n = frame.len();

        let mut positions = Vec::with_capacity(n);
        let mut strategy_returns = Vec::with_capacity(n);
        let mut portfolio_values = Vec::with_capacity(n);
        let mut value = self.config.initial_capital;

        for i in 0..n {
            // Lag-1 execution: the first bar has no prior signal.
            let position = if i == 0 {
                0
            } else {
                signals[i - 1].position()
            };
            // Undefined market return contributes zero growth.
            let bar_return = position as f64 * market_returns[i].unwrap_or(0.0);
            value *= 1.0 + bar_return;

            positions.push(Some(position as f64));
            strategy_returns.push(Some(bar_return));
            portfolio_values.push(Some(value));

            if let Some(pb) = &progress {
                pb.inc(1);
            }
        }

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        frame.set_column("position", positions)?;
        frame.set_column("market_returns", market_returns)?;
        frame.set_column("strategy_returns", strategy_returns)?;
        frame.set_column("portfolio_value", portfolio_values)?;

        let initial = self.config.initial_capital;
        let total_return = (value - initial) / initial;
        let bars = frame.bars();

        Ok(BacktestResult {
            strategy_name: strategy_name.to_string(),
            symbol: symbol.to_string(),
            initial_capital: initial,
            final_value: value,
            total_return,
            total_return_pct: total_return * 100.0,
            bars: n,
            start_time: bars[0].timestamp,
            end_time: bars[n - 1].timestamp,
        })
    }
}
