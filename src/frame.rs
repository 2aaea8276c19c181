//! The working table: one bar series plus aligned feature columns.
//!
//! Every derived value in the pipeline lives in a named column of
//! `Option<f64>` aligned one-to-one with the bar index. `None` marks an
//! undefined leading value (insufficient indicator history); downstream
//! stages treat it as "no match" for signal rules and zero contribution
//! for return compounding.

use crate::error::{BacktestError, Result};
use crate::types::Bar;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named series aligned with the bar index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Bars plus appended feature columns.
///
/// OHLCV fields live in the bars and are never touched by column
/// operations. Columns keep insertion order so plots are reproducible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame {
    bars: Vec<Bar>,
    columns: Vec<Column>,
}

impl Frame {
    /// Create a frame from a bar series.
    pub fn from_bars(bars: Vec<Bar>) -> Self {
        Self {
            bars,
            columns: Vec::new(),
        }
    }

    /// Number of bars (and length of every column).
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the frame has no bars.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The underlying bar series.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Closing prices as a plain vector.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Timestamps of all bars.
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.bars.iter().map(|b| b.timestamp).collect()
    }

    /// Insert a column, or overwrite an existing column of the same name.
    ///
    /// The column must have exactly one value per bar.
    pub fn set_column(&mut self, name: impl Into<String>, values: Vec<Option<f64>>) -> Result<()> {
        let name = name.into();
        if values.len() != self.bars.len() {
            return Err(BacktestError::InvalidInput(format!(
                "Column '{}' has {} values for {} bars",
                name,
                values.len(),
                self.bars.len()
            )));
        }
        if let Some(existing) = self.columns.iter_mut().find(|c| c.name == name) {
            existing.values = values;
        } else {
            self.columns.push(Column { name, values });
        }
        Ok(())
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Value of a column at a bar index. Returns None if the column is
    /// missing, the index is out of range, or the value is undefined.
    pub fn value(&self, name: &str, index: usize) -> Option<f64> {
        self.column(name).and_then(|v| v.get(index).copied())?
    }

    /// Names of all columns, in insertion order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Check whether a column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_bars(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                Bar::new(
                    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                        + chrono::Duration::days(i as i64),
                    c,
                    c + 1.0,
                    c - 1.0,
                    c,
                    1000.0,
                )
            })
            .collect()
    }

    #[test]
    fn test_set_and_get_column() {
        let mut frame = Frame::from_bars(make_bars(&[100.0, 101.0, 102.0]));
        frame
            .set_column("sma_2", vec![None, Some(100.5), Some(101.5)])
            .unwrap();

        assert!(frame.has_column("sma_2"));
        assert_eq!(frame.value("sma_2", 0), None);
        assert_eq!(frame.value("sma_2", 1), Some(100.5));
        assert_eq!(frame.value("sma_2", 5), None);
        assert_eq!(frame.value("missing", 0), None);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let mut frame = Frame::from_bars(make_bars(&[100.0, 101.0, 102.0]));
        let result = frame.set_column("bad", vec![Some(1.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_overwrite_keeps_order() {
        let mut frame = Frame::from_bars(make_bars(&[100.0, 101.0]));
        frame.set_column("a", vec![Some(1.0), Some(2.0)]).unwrap();
        frame.set_column("b", vec![Some(3.0), Some(4.0)]).unwrap();
        frame.set_column("a", vec![Some(9.0), Some(9.0)]).unwrap();

        assert_eq!(frame.column_names(), vec!["a", "b"]);
        assert_eq!(frame.value("a", 0), Some(9.0));
    }

    #[test]
    fn test_closes() {
        let frame = Frame::from_bars(make_bars(&[100.0, 101.0, 102.0]));
        assert_eq!(frame.closes(), vec![100.0, 101.0, 102.0]);
    }
}
