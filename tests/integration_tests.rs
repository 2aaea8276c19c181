//! Integration tests for the full pipeline.

use chrono::{TimeZone, Utc};
use remora::backtest::{BacktestConfig, BacktestEngine};
use remora::error::{BacktestError, Result};
use remora::frame::Frame;
use remora::pipeline::{self, RunConfig};
use remora::provider::{CsvProvider, MarketDataProvider};
use remora::strategy::PolicyKind;
use remora::types::{Bar, Interval, Period, Signal};

/// Create synthetic test data with a trend and some noise.
fn create_synthetic_data(days: usize, initial_price: f64, daily_return: f64) -> Vec<Bar> {
    let mut bars = Vec::with_capacity(days);
    let mut price = initial_price;

    for i in 0..days {
        let noise = ((i as f64 * 0.7).sin() * 2.0 + (i as f64 * 1.3).cos()) * 0.5;
        price += price * daily_return + noise;

        let open = price - 0.5;
        let high = price + 2.0 + noise.abs();
        let low = price - 2.0 - noise.abs();
        let close = price;

        bars.push(Bar::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::days(i as i64),
            open,
            high.max(open).max(close),
            low.min(open).min(close),
            close,
            1_000_000.0,
        ));
    }

    bars
}

struct FixedProvider {
    bars: Vec<Bar>,
}

impl MarketDataProvider for FixedProvider {
    fn fetch(&self, _ticker: &str, _period: Period, _interval: Interval) -> Result<Vec<Bar>> {
        if self.bars.is_empty() {
            return Err(BacktestError::DataUnavailable("empty".to_string()));
        }
        Ok(self.bars.clone())
    }
}

fn run_config(capital: f64) -> RunConfig {
    RunConfig {
        ticker: "TEST".to_string(),
        period: Period::OneYear,
        interval: Interval::OneDay,
        backtest: BacktestConfig {
            initial_capital: capital,
            show_progress: false,
        },
    }
}

#[test]
fn test_full_pipeline_each_policy() {
    for kind in [
        PolicyKind::RsiSmaCrossover,
        PolicyKind::MomentumOnly,
        PolicyKind::EmaMomentumConfirmed,
    ] {
        let provider = FixedProvider {
            bars: create_synthetic_data(252, 100.0, 0.002),
        };
        let policy = kind.build();
        let run = pipeline::run(&provider, policy.as_ref(), &run_config(10_000.0)).unwrap();

        assert_eq!(run.signals.len(), 252);
        assert!(run.result.final_value > 0.0);
        assert!(run.result.total_return.is_finite());
        assert!(run.frame.has_column("portfolio_value"));
        assert!(run.frame.has_column("position"));

        // Position lags signal by one bar throughout.
        let position = run.frame.column("position").unwrap();
        assert_eq!(position[0], Some(0.0));
        for t in 1..run.signals.len() {
            assert_eq!(position[t], Some(run.signals[t - 1].position() as f64));
        }
    }
}

#[test]
fn test_insufficient_history_stays_flat() {
    // 10 bars is far below the 50-bar SMA window: every rule input is
    // undefined, so the signal stays flat and capital is untouched.
    let provider = FixedProvider {
        bars: create_synthetic_data(10, 100.0, 0.01),
    };
    let policy = PolicyKind::RsiSmaCrossover.build();
    let run = pipeline::run(&provider, policy.as_ref(), &run_config(10_000.0)).unwrap();

    assert!(run.signals.iter().all(|s| *s == Signal::Flat));
    assert_eq!(run.result.total_return, 0.0);
    assert_eq!(run.result.final_value, 10_000.0);
}

#[test]
fn test_constant_prices_stay_flat_under_momentum() {
    let bars: Vec<Bar> = (0..30)
        .map(|i| {
            Bar::new(
                Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::days(i),
                100.0,
                100.5,
                99.5,
                100.0,
                1000.0,
            )
        })
        .collect();
    let provider = FixedProvider { bars };
    let policy = PolicyKind::MomentumOnly.build();
    let run = pipeline::run(&provider, policy.as_ref(), &run_config(5_000.0)).unwrap();

    assert!(run.signals.iter().all(|s| *s == Signal::Flat));
    assert_eq!(run.result.total_return, 0.0);
}

#[test]
fn test_momentum_policy_rides_monotone_trend() {
    // Strictly rising closes: momentum-only goes long from bar 1 on and
    // the lagged position captures every gain except the first two bars.
    let bars: Vec<Bar> = (0..20)
        .map(|i| {
            let c = 100.0 * 1.01_f64.powi(i as i32);
            Bar::new(
                Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::days(i),
                c,
                c + 1.0,
                c - 1.0,
                c,
                1000.0,
            )
        })
        .collect();
    let expected_growth: f64 = 1.01_f64.powi(18);

    let provider = FixedProvider { bars };
    let policy = PolicyKind::MomentumOnly.build();
    let run = pipeline::run(&provider, policy.as_ref(), &run_config(10_000.0)).unwrap();

    assert!(run.signals[1..].iter().all(|s| *s == Signal::Buy));
    assert!((run.result.final_value - 10_000.0 * expected_growth).abs() < 1e-3);
}

#[test]
fn test_known_scenario_total_return() {
    let closes = [100.0, 102.0, 101.0, 105.0, 110.0];
    let bars: Vec<Bar> = closes
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
        .collect();
    let signals = [
        Signal::Flat,
        Signal::Buy,
        Signal::Buy,
        Signal::Sell,
        Signal::Flat,
    ];

    let mut frame = Frame::from_bars(bars);
    let engine = BacktestEngine::new(BacktestConfig {
        initial_capital: 10_000.0,
        show_progress: false,
    });
    let result = engine.run(&mut frame, &signals, "scenario", "TEST").unwrap();

    assert!((result.total_return_pct - (-1.96)).abs() < 0.01);
}

#[test]
fn test_csv_provider_end_to_end() {
    use std::io::Write;

    let mut path = std::env::temp_dir();
    path.push(format!("remora_integration_{}.csv", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "Date,Open,High,Low,Close,Volume").unwrap();
    let mut price = 100.0;
    for day in 1..=60 {
        price *= 1.0 + ((day as f64).sin() * 0.01);
        writeln!(
            file,
            "2024-01-{:02},{:.2},{:.2},{:.2},{:.2},1000",
            (day % 28) + 1,
            price,
            price + 1.0,
            price - 1.0,
            price
        )
        .unwrap();
    }
    drop(file);

    let provider = CsvProvider::new(&path);
    let policy = PolicyKind::MomentumOnly.build();
    let run = pipeline::run(&provider, policy.as_ref(), &run_config(10_000.0));
    std::fs::remove_file(&path).ok();

    let run = run.unwrap();
    // Duplicate calendar days collapse to unique timestamps.
    assert!(run.result.bars <= 28);
    assert!(run.result.final_value > 0.0);
}

#[test]
fn test_data_unavailable_aborts() {
    let provider = FixedProvider { bars: vec![] };
    let policy = PolicyKind::MomentumOnly.build();
    let err = pipeline::run(&provider, policy.as_ref(), &run_config(10_000.0));
    assert!(matches!(err, Err(BacktestError::DataUnavailable(_))));
}
