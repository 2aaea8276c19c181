//! Core data types for the pipeline.

use crate::error::{BacktestError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// OHLCV bar representing a single time period of market data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Validate that bar data is consistent.
    pub fn validate(&self) -> bool {
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
            && self.volume >= 0.0
    }

    /// Check if the bar is bullish (close > open).
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }
}

/// Discrete trading signal for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Signal {
    /// Enter or stay long.
    Buy,
    /// Do nothing.
    #[default]
    Flat,
    /// Enter or stay short.
    Sell,
}

impl Signal {
    /// Integer position implied by the signal: Buy=1, Flat=0, Sell=-1.
    pub fn position(&self) -> i8 {
        match self {
            Signal::Buy => 1,
            Signal::Flat => 0,
            Signal::Sell => -1,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Flat => write!(f, "FLAT"),
            Signal::Sell => write!(f, "SELL"),
        }
    }
}

/// Lookback period requested from a data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    OneDay,
    FiveDays,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    TwoYears,
    FiveYears,
    Max,
}

impl Period {
    /// Provider query string ("1d", "1y", ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::OneDay => "1d",
            Period::FiveDays => "5d",
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::SixMonths => "6mo",
            Period::OneYear => "1y",
            Period::TwoYears => "2y",
            Period::FiveYears => "5y",
            Period::Max => "max",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = BacktestError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "1d" => Ok(Period::OneDay),
            "5d" => Ok(Period::FiveDays),
            "1mo" => Ok(Period::OneMonth),
            "3mo" => Ok(Period::ThreeMonths),
            "6mo" => Ok(Period::SixMonths),
            "1y" => Ok(Period::OneYear),
            "2y" => Ok(Period::TwoYears),
            "5y" => Ok(Period::FiveYears),
            "max" => Ok(Period::Max),
            other => Err(BacktestError::InvalidInput(format!(
                "Unknown period: {other}"
            ))),
        }
    }
}

/// Bar interval requested from a data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interval {
    OneMinute,
    FiveMinutes,
    FifteenMinutes,
    ThirtyMinutes,
    OneHour,
    OneDay,
    OneWeek,
}

impl Interval {
    /// Provider query string ("1m", "1h", "1d", ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::OneMinute => "1m",
            Interval::FiveMinutes => "5m",
            Interval::FifteenMinutes => "15m",
            Interval::ThirtyMinutes => "30m",
            Interval::OneHour => "1h",
            Interval::OneDay => "1d",
            Interval::OneWeek => "1wk",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = BacktestError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "1m" => Ok(Interval::OneMinute),
            "5m" => Ok(Interval::FiveMinutes),
            "15m" => Ok(Interval::FifteenMinutes),
            "30m" => Ok(Interval::ThirtyMinutes),
            "1h" => Ok(Interval::OneHour),
            "1d" => Ok(Interval::OneDay),
            "1wk" => Ok(Interval::OneWeek),
            other => Err(BacktestError::InvalidInput(format!(
                "Unknown interval: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_bar_validation() {
        let valid_bar = Bar::new(sample_timestamp(), 100.0, 105.0, 98.0, 102.0, 1000.0);
        assert!(valid_bar.validate());

        // High below low - invalid
        let invalid_bar = Bar::new(sample_timestamp(), 100.0, 95.0, 98.0, 102.0, 1000.0);
        assert!(!invalid_bar.validate());

        // Negative volume - invalid
        let invalid_bar2 = Bar::new(sample_timestamp(), 100.0, 105.0, 98.0, 102.0, -100.0);
        assert!(!invalid_bar2.validate());
    }

    #[test]
    fn test_signal_position() {
        assert_eq!(Signal::Buy.position(), 1);
        assert_eq!(Signal::Flat.position(), 0);
        assert_eq!(Signal::Sell.position(), -1);
        assert_eq!(Signal::default(), Signal::Flat);
    }

    #[test]
    fn test_period_round_trip() {
        for p in [
            Period::OneDay,
            Period::FiveDays,
            Period::OneMonth,
            Period::ThreeMonths,
            Period::SixMonths,
            Period::OneYear,
            Period::TwoYears,
            Period::FiveYears,
            Period::Max,
        ] {
            assert_eq!(p.as_str().parse::<Period>().unwrap(), p);
        }
        assert!("6y".parse::<Period>().is_err());
    }

    #[test]
    fn test_interval_round_trip() {
        for i in [
            Interval::OneMinute,
            Interval::FiveMinutes,
            Interval::FifteenMinutes,
            Interval::ThirtyMinutes,
            Interval::OneHour,
            Interval::OneDay,
            Interval::OneWeek,
        ] {
            assert_eq!(i.as_str().parse::<Interval>().unwrap(), i);
        }
        assert!("2h".parse::<Interval>().is_err());
    }
}
