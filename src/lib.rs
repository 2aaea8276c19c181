//! Remora - technical-indicator trading signals and backtests for one ticker.
//!
//! # Overview
//!
//! Remora is a small batch pipeline with four sequential stages, each a
//! pure transformation over one time-indexed table of price bars:
//!
//! 1. **Loader**: fetch OHLCV bars for a ticker from a chart HTTP API or
//!    a local CSV file ([`provider`], [`data`])
//! 2. **Feature engine**: append indicator columns derived from the
//!    close series ([`features`], [`indicators`])
//! 3. **Signal generator**: map each feature row to Buy/Flat/Sell via a
//!    swappable policy ([`strategy`], [`strategies`])
//! 4. **Backtest engine**: compound the lag-1 return of following the
//!    signals into a portfolio-value series ([`backtest`])
//!
//! # Quick Start
//!
//! ```no_run
//! use remora::backtest::BacktestConfig;
//! use remora::pipeline::{self, RunConfig};
//! use remora::provider::ChartApiProvider;
//! use remora::strategy::PolicyKind;
//! use remora::types::{Interval, Period};
//!
//! let provider = ChartApiProvider::new().unwrap();
//! let policy = PolicyKind::RsiSmaCrossover.build();
//! let config = RunConfig {
//!     ticker: "BTC-USD".to_string(),
//!     period: Period::OneYear,
//!     interval: Interval::OneDay,
//!     backtest: BacktestConfig::default(),
//! };
//!
//! let run = pipeline::run(&provider, policy.as_ref(), &config).unwrap();
//! println!("Total Return: {:.2}%", run.result.total_return_pct);
//! ```
//!
//! # Creating Custom Policies
//!
//! Implement the [`strategy::SignalPolicy`] trait to plug in your own
//! rule set:
//!
//! ```
//! use remora::features::FeatureConfig;
//! use remora::frame::Frame;
//! use remora::strategy::SignalPolicy;
//! use remora::types::Signal;
//!
//! struct CloseAboveLevel {
//!     level: f64,
//! }
//!
//! impl SignalPolicy for CloseAboveLevel {
//!     fn name(&self) -> &str {
//!         "Close Above Level"
//!     }
//!
//!     fn feature_config(&self) -> FeatureConfig {
//!         FeatureConfig::none()
//!     }
//!
//!     fn signal_at(&self, frame: &Frame, index: usize) -> Signal {
//!         if frame.bars()[index].close > self.level {
//!             Signal::Buy
//!         } else {
//!             Signal::Flat
//!         }
//!     }
//! }
//! ```

pub mod backtest;
pub mod config;
pub mod data;
pub mod error;
pub mod features;
pub mod frame;
pub mod indicators;
pub mod pipeline;
pub mod provider;
pub mod strategies;
pub mod strategy;
pub mod types;
pub mod viz;

// Re-exports for convenience
pub use backtest::{BacktestConfig, BacktestEngine, BacktestResult};
pub use error::{BacktestError, Result};
pub use features::{FeatureConfig, FeatureEngine};
pub use frame::Frame;
pub use pipeline::{PipelineRun, RunConfig};
pub use provider::{ChartApiProvider, CsvProvider, MarketDataProvider};
pub use strategy::{generate_signals, PolicyKind, SignalPolicy};
pub use types::{Bar, Interval, Period, Signal};
