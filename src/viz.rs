//! Terminal visualization for pipeline output.
//!
//! Renders frame columns as stacked sparkline subplot panels and backtest
//! results as one-line summaries. Side-effect only: nothing downstream
//! consumes the rendered text.

use crate::backtest::BacktestResult;
use crate::frame::Frame;
use std::fmt::Write;

/// Characters used for sparkline rendering, ordered from low to high.
const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Generate a sparkline from a slice of values.
pub fn sparkline(values: &[f64], width: usize) -> String {
    if values.is_empty() {
        return String::new();
    }

    let sampled = if values.len() > width {
        downsample(values, width)
    } else {
        values.to_vec()
    };

    let min_val = sampled.iter().cloned().fold(f64::INFINITY, f64::min);
    let max_val = sampled.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max_val - min_val;

    let mut result = String::with_capacity(sampled.len() * 4);
    for &val in &sampled {
        let normalized = if range > 0.0 {
            ((val - min_val) / range).clamp(0.0, 1.0)
        } else {
            0.5
        };
        let idx = ((normalized * 7.0).round() as usize).min(7);
        result.push(SPARKLINE_CHARS[idx]);
    }
    result
}

/// Downsample values to a target width by averaging buckets.
fn downsample(values: &[f64], width: usize) -> Vec<f64> {
    if width == 0 || values.len() <= width {
        return values.to_vec();
    }
    let bucket_size = values.len() as f64 / width as f64;
    (0..width)
        .map(|i| {
            let start = (i as f64 * bucket_size) as usize;
            let end = (((i + 1) as f64 * bucket_size) as usize).min(values.len());
            let bucket = &values[start..end.max(start + 1)];
            bucket.iter().sum::<f64>() / bucket.len() as f64
        })
        .collect()
}

/// Render named frame columns as stacked subplot panels.
///
/// Each panel shows the column name, its defined min/max, and a sparkline
/// of the defined values. Columns that are entirely undefined render a
/// placeholder. Unknown column names are skipped.
pub fn plot_columns(frame: &Frame, names: &[&str], width: usize) -> String {
    let label_width = names.iter().map(|n| n.len()).max().unwrap_or(0);
    plot_columns_aligned(frame, names, width, label_width)
}

fn plot_columns_aligned(frame: &Frame, names: &[&str], width: usize, label_width: usize) -> String {
    let mut output = String::new();

    for name in names {
        let Some(column) = frame.column(name) else {
            continue;
        };
        let defined: Vec<f64> = column.iter().filter_map(|v| *v).collect();
        if defined.is_empty() {
            writeln!(output, "{name:>label_width$} | (undefined)").unwrap();
            continue;
        }
        let min = defined.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = defined.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        writeln!(
            output,
            "{name:>label_width$} | {} [{min:.2} .. {max:.2}]",
            sparkline(&defined, width)
        )
        .unwrap();
    }
    output
}

/// Render the close series plus every derived column of the frame.
pub fn plot_frame(frame: &Frame, width: usize) -> String {
    let mut output = String::new();
    let names = frame.column_names();
    // One label width across the close panel and every column panel.
    let label_width = names
        .iter()
        .map(|n| n.len())
        .max()
        .unwrap_or(0)
        .max("close".len());

    let close = frame.closes();
    if !close.is_empty() {
        let min = close.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = close.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        writeln!(
            output,
            "{:>label_width$} | {} [{min:.2} .. {max:.2}]",
            "close",
            sparkline(&close, width)
        )
        .unwrap();
    }
    output.push_str(&plot_columns_aligned(frame, &names, width, label_width));
    output
}

/// Generate a one-line summary of a backtest result.
pub fn result_summary(result: &BacktestResult, frame: &Frame, width: usize) -> String {
    let equity: Vec<f64> = frame
        .column("portfolio_value")
        .map(|col| col.iter().filter_map(|v| *v).collect())
        .unwrap_or_default();
    format!(
        "[{}] {} on {} | Return: {:+.2}% | Final: {:.2}",
        sparkline(&equity, width),
        result.strategy_name,
        result.symbol,
        result.total_return_pct,
        result.final_value
    )
}
