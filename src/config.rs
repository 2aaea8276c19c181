//! Configuration file support for pipeline runs.
//!
//! Allows loading run configurations from TOML files for reproducibility.

use crate::backtest::BacktestConfig;
use crate::error::{BacktestError, Result};
use crate::pipeline::RunConfig;
use crate::strategies::{EmaMomentumConfirmed, MomentumOnly, RsiSmaCrossover};
use crate::strategy::{PolicyKind, SignalPolicy};
use crate::types::{Interval, Period};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Complete run configuration loaded from a file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunFileConfig {
    /// Data source settings.
    #[serde(default)]
    pub data: DataSettings,
    /// Backtest settings.
    #[serde(default)]
    pub backtest: BacktestSettings,
    /// Strategy settings.
    #[serde(default)]
    pub strategy: StrategySettings,
}

/// Data source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSettings {
    /// Ticker symbol.
    #[serde(default = "default_ticker")]
    pub ticker: String,
    /// Lookback period ("1y", "6mo", ...).
    #[serde(default = "default_period")]
    pub period: String,
    /// Bar interval ("1d", "1h", ...).
    #[serde(default = "default_interval")]
    pub interval: String,
    /// Optional local CSV path used instead of the network provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csv: Option<String>,
}

fn default_ticker() -> String {
    "BTC-USD".to_string()
}
fn default_period() -> String {
    "1y".to_string()
}
fn default_interval() -> String {
    "1d".to_string()
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            ticker: default_ticker(),
            period: default_period(),
            interval: default_interval(),
            csv: None,
        }
    }
}

/// Backtest settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestSettings {
    /// Initial capital.
    #[serde(default = "default_capital")]
    pub initial_capital: f64,
    /// Show progress bar during backtest.
    #[serde(default)]
    pub show_progress: bool,
}

fn default_capital() -> f64 {
    10_000.0
}

impl Default for BacktestSettings {
    fn default() -> Self {
        Self {
            initial_capital: 10_000.0,
            show_progress: false,
        }
    }
}

/// Strategy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategySettings {
    /// Policy kind ("rsi-sma-crossover", "momentum-only",
    /// "ema-momentum-confirmed").
    #[serde(default = "default_strategy")]
    pub kind: String,
    /// Optional parameter overrides.
    #[serde(default)]
    pub params: StrategyParams,
}

fn default_strategy() -> String {
    "rsi-sma-crossover".to_string()
}

impl Default for StrategySettings {
    fn default() -> Self {
        Self {
            kind: default_strategy(),
            params: StrategyParams::default(),
        }
    }
}

/// Per-policy parameter overrides; unset fields keep policy defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrategyParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsi_period: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fast_period: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slow_period: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oversold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overbought: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend_span: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub momentum_window: Option<usize>,
}

impl RunFileConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&contents)?;
        info!(path = %path.as_ref().display(), "loaded run configuration");
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| BacktestError::ConfigError(e.to_string()))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Convert into pipeline run inputs.
    pub fn to_run_config(&self) -> Result<RunConfig> {
        Ok(RunConfig {
            ticker: self.data.ticker.clone(),
            period: self.data.period.parse::<Period>()?,
            interval: self.data.interval.parse::<Interval>()?,
            backtest: BacktestConfig {
                initial_capital: self.backtest.initial_capital,
                show_progress: self.backtest.show_progress,
            },
        })
    }

    /// Build the configured policy with any parameter overrides applied.
    pub fn build_policy(&self) -> Result<Box<dyn SignalPolicy>> {
        let kind = self.strategy.kind.parse::<PolicyKind>()?;
        let p = &self.strategy.params;
        let policy: Box<dyn SignalPolicy> = match kind {
            PolicyKind::RsiSmaCrossover => Box::new(RsiSmaCrossover::new(
                p.rsi_period.unwrap_or(14),
                p.fast_period.unwrap_or(20),
                p.slow_period.unwrap_or(50),
                p.oversold.unwrap_or(30.0),
                p.overbought.unwrap_or(70.0),
            )),
            PolicyKind::MomentumOnly => Box::new(MomentumOnly::new()),
            PolicyKind::EmaMomentumConfirmed => Box::new(EmaMomentumConfirmed::new(
                p.fast_period.unwrap_or(20),
                p.slow_period.unwrap_or(50),
                p.trend_span.unwrap_or(100),
                p.momentum_window.unwrap_or(5),
            )),
        };
        Ok(policy)
    }

    /// Generate an example configuration file as a string.
    pub fn example() -> String {
        let example = RunFileConfig::default();
        toml::to_string_pretty(&example).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunFileConfig::default();
        assert_eq!(config.data.ticker, "BTC-USD");
        assert_eq!(config.backtest.initial_capital, 10_000.0);

        let run = config.to_run_config().unwrap();
        assert_eq!(run.period, Period::OneYear);
        assert_eq!(run.interval, Interval::OneDay);
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            [data]
            ticker = "ETH-USD"
            period = "6mo"
            interval = "1h"

            [backtest]
            initial_capital = 50000.0

            [strategy]
            kind = "ema-momentum-confirmed"

            [strategy.params]
            fast_period = 10
            slow_period = 30
        "#;
        let config: RunFileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.data.ticker, "ETH-USD");
        assert_eq!(config.strategy.params.fast_period, Some(10));

        let policy = config.build_policy().unwrap();
        assert_eq!(policy.name(), "EMA Crossover + Momentum");
        let features = policy.feature_config();
        assert!(features.ema_spans.contains(&10));
        assert!(features.ema_spans.contains(&30));
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let config = RunFileConfig {
            strategy: StrategySettings {
                kind: "macd".to_string(),
                params: StrategyParams::default(),
            },
            ..Default::default()
        };
        assert!(config.build_policy().is_err());
    }

    #[test]
    fn test_example_round_trips() {
        let example = RunFileConfig::example();
        let parsed: RunFileConfig = toml::from_str(&example).unwrap();
        assert_eq!(parsed.data.ticker, "BTC-USD");
    }
}
