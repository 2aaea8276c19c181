//! CSV bar loading.
//!
//! Loads OHLCV series from local CSV files with flexible header and
//! timestamp handling. Rows are sorted by timestamp and later duplicate
//! timestamps are dropped, since the pipeline requires a strictly
//! increasing index.

use crate::error::{BacktestError, Result};
use crate::types::Bar;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

/// Raw CSV row with flexible header aliases.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(
        alias = "Date",
        alias = "date",
        alias = "Timestamp",
        alias = "timestamp",
        alias = "Datetime",
        alias = "datetime"
    )]
    date: String,
    #[serde(alias = "Open", alias = "open")]
    open: f64,
    #[serde(alias = "High", alias = "high")]
    high: f64,
    #[serde(alias = "Low", alias = "low")]
    low: f64,
    #[serde(alias = "Close", alias = "close", alias = "Adj Close")]
    close: f64,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: f64,
}

/// CSV parsing configuration.
#[derive(Debug, Clone)]
pub struct DataConfig {
    /// Explicit date format (e.g. "%Y-%m-%d"); common formats are tried
    /// when absent.
    pub date_format: Option<String>,
    /// CSV delimiter character.
    pub delimiter: u8,
    /// Skip rows that fail to parse or validate instead of failing.
    pub skip_invalid: bool,
    /// Validate bar consistency (high >= low, positive prices).
    pub validate_bars: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            date_format: None,
            delimiter: b',',
            skip_invalid: true,
            validate_bars: true,
        }
    }
}

/// Parse a timestamp string, trying the explicit format first and then a
/// set of common datetime, date-only, and Unix-epoch forms.
fn parse_datetime(s: &str, format: Option<&str>) -> Result<DateTime<Utc>> {
    if let Some(fmt) = format {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&dt));
        }
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&d.and_hms_opt(0, 0, 0).unwrap()));
        }
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%SZ",
        "%Y-%m-%dT%H:%M:%S%z",
    ];
    for fmt in &datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&dt));
        }
    }

    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
    for fmt in &date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&d.and_hms_opt(0, 0, 0).unwrap()));
        }
    }

    if let Ok(ts) = s.parse::<i64>() {
        if let Some(dt) = DateTime::from_timestamp(ts, 0) {
            return Ok(dt);
        }
    }

    Err(BacktestError::DataUnavailable(format!(
        "Unparseable timestamp: {s}"
    )))
}

/// Load an OHLCV bar series from a CSV file.
pub fn load_csv(path: impl AsRef<Path>, config: &DataConfig) -> Result<Vec<Bar>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(config.delimiter)
        .flexible(true)
        .from_path(path)?;

    let mut bars = Vec::new();
    let mut skipped = 0usize;

    for record in reader.deserialize::<CsvRow>() {
        let row = match record {
            Ok(row) => row,
            Err(e) => {
                if config.skip_invalid {
                    skipped += 1;
                    continue;
                }
                return Err(e.into());
            }
        };

        let timestamp = match parse_datetime(&row.date, config.date_format.as_deref()) {
            Ok(ts) => ts,
            Err(e) => {
                if config.skip_invalid {
                    skipped += 1;
                    continue;
                }
                return Err(e);
            }
        };

        let bar = Bar::new(timestamp, row.open, row.high, row.low, row.close, row.volume);
        if config.validate_bars && !bar.validate() {
            if config.skip_invalid {
                skipped += 1;
                continue;
            }
            return Err(BacktestError::DataUnavailable(format!(
                "Inconsistent bar at {timestamp}"
            )));
        }
        bars.push(bar);
    }

    if skipped > 0 {
        warn!(skipped, path = %path.display(), "skipped invalid CSV rows");
    }

    bars.sort_by_key(|b| b.timestamp);
    let before = bars.len();
    bars.dedup_by_key(|b| b.timestamp);
    if bars.len() < before {
        warn!(
            dropped = before - bars.len(),
            "dropped bars with duplicate timestamps"
        );
    }

    if bars.is_empty() {
        return Err(BacktestError::DataUnavailable(format!(
            "No usable rows in {}",
            path.display()
        )));
    }

    info!(bars = bars.len(), path = %path.display(), "loaded CSV data");
    Ok(bars)
}
