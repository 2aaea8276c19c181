//! Market data providers.
//!
//! The pipeline consumes bar data through a single trait call; the
//! concrete source (chart HTTP API or local CSV file) is swappable.

use crate::data::{load_csv, DataConfig};
use crate::error::{BacktestError, Result};
use crate::types::{Bar, Interval, Period};
use chrono::DateTime;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Contract for fetching one ticker's OHLCV history.
pub trait MarketDataProvider {
    /// Fetch bars for a ticker over a lookback period at a bar interval.
    ///
    /// An empty result or an upstream failure surfaces as
    /// [`BacktestError::DataUnavailable`]; the run aborts with no
    /// partial output.
    fn fetch(&self, ticker: &str, period: Period, interval: Interval) -> Result<Vec<Bar>>;
}

const DEFAULT_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Provider backed by a Yahoo-style chart HTTP endpoint.
pub struct ChartApiProvider {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl ChartApiProvider {
    /// Create a provider against the default public endpoint.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_CHART_URL)
    }

    /// Create a provider against a custom endpoint (used by tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("remora/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartPayload,
}

#[derive(Debug, Deserialize)]
struct ChartPayload {
    result: Option<Vec<ChartResult>>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

/// Quote arrays may carry nulls for halted or partial bars.
#[derive(Debug, Deserialize)]
struct ChartQuote {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<f64>>,
}

impl MarketDataProvider for ChartApiProvider {
    fn fetch(&self, ticker: &str, period: Period, interval: Interval) -> Result<Vec<Bar>> {
        let url = format!(
            "{}/{}?range={}&interval={}",
            self.base_url, ticker, period, interval
        );
        debug!(%url, "fetching chart data");

        let response = self.client.get(&url).send()?;
        if !response.status().is_success() {
            return Err(BacktestError::DataUnavailable(format!(
                "Chart API returned {} for {ticker}",
                response.status()
            )));
        }

        let payload: ChartResponse = response.json()?;
        if let Some(error) = payload.chart.error {
            return Err(BacktestError::DataUnavailable(format!(
                "Chart API error for {ticker}: {error}"
            )));
        }

        let result = payload
            .chart
            .result
            .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
            .ok_or_else(|| {
                BacktestError::DataUnavailable(format!("Ticker not found: {ticker}"))
            })?;

        let quote = result.indicators.quote.first().ok_or_else(|| {
            BacktestError::DataUnavailable(format!("No quote data for {ticker}"))
        })?;

        let mut bars = Vec::with_capacity(result.timestamp.len());
        for (i, &ts) in result.timestamp.iter().enumerate() {
            let fields = (
                quote.open.get(i).copied().flatten(),
                quote.high.get(i).copied().flatten(),
                quote.low.get(i).copied().flatten(),
                quote.close.get(i).copied().flatten(),
            );
            let (Some(open), Some(high), Some(low), Some(close)) = fields else {
                continue; // partial bar
            };
            let Some(timestamp) = DateTime::from_timestamp(ts, 0) else {
                continue;
            };
            let volume = quote.volume.get(i).copied().flatten().unwrap_or(0.0);
            bars.push(Bar::new(timestamp, open, high, low, close, volume));
        }

        if bars.is_empty() {
            return Err(BacktestError::DataUnavailable(format!(
                "Empty series for {ticker} ({period}/{interval})"
            )));
        }

        bars.sort_by_key(|b| b.timestamp);
        bars.dedup_by_key(|b| b.timestamp);

        info!(ticker, bars = bars.len(), %period, %interval, "fetched chart data");
        Ok(bars)
    }
}

/// Provider backed by a local CSV file; period and interval are ignored.
pub struct CsvProvider {
    path: PathBuf,
    config: DataConfig,
}

impl CsvProvider {
    /// Create a provider for a CSV file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: DataConfig::default(),
        }
    }

    /// Create with explicit CSV parsing configuration.
    pub fn with_config(path: impl Into<PathBuf>, config: DataConfig) -> Self {
        Self {
            path: path.into(),
            config,
        }
    }
}

impl MarketDataProvider for CsvProvider {
    fn fetch(&self, ticker: &str, _period: Period, _interval: Interval) -> Result<Vec<Bar>> {
        debug!(ticker, path = %self.path.display(), "loading bars from CSV");
        load_csv(&self.path, &self.config)
    }
}
