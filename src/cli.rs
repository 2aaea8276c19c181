//! Command-line interface for the pipeline.

use remora::backtest::BacktestConfig;
use remora::config::RunFileConfig;
use remora::error::Result;
use remora::pipeline::{self, RunConfig};
use remora::provider::{ChartApiProvider, CsvProvider, MarketDataProvider};
use remora::strategy::PolicyKind;
use remora::types::{Interval, Period};
use remora::viz::{plot_frame, result_summary};

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Remora - technical-indicator trading signals and backtests for one ticker.
#[derive(Parser)]
#[command(name = "remora")]
#[command(version)]
#[command(about = "Fetch price history, compute indicators, and backtest a signal policy")]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the pipeline for one ticker
    Run {
        /// Ticker symbol
        #[arg(short, long, default_value = "BTC-USD")]
        ticker: String,

        /// Lookback period
        #[arg(short, long, default_value = "1y")]
        period: String,

        /// Bar interval
        #[arg(short, long, default_value = "1d")]
        interval: String,

        /// Initial capital
        #[arg(short, long, default_value = "10000")]
        capital: f64,

        /// Signal policy to use
        #[arg(short = 'S', long, value_enum, default_value = "rsi-sma-crossover")]
        strategy: StrategyArg,

        /// Load bars from a local CSV file instead of the network
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Load the full run configuration from a TOML file
        /// (other flags are ignored)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Skip the terminal plot
        #[arg(long)]
        no_plot: bool,

        /// Plot width in characters
        #[arg(long, default_value = "60")]
        width: usize,
    },

    /// Write an example configuration file
    InitConfig {
        /// Output path
        #[arg(default_value = "remora.toml")]
        path: PathBuf,
    },
}

/// Built-in signal policies selectable from the command line.
#[derive(Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    /// RSI oversold/overbought gated by SMA trend
    RsiSmaCrossover,
    /// Sign of the one-bar price change
    MomentumOnly,
    /// EMA crossover confirmed by momentum sign
    EmaMomentumConfirmed,
}

impl From<StrategyArg> for PolicyKind {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::RsiSmaCrossover => PolicyKind::RsiSmaCrossover,
            StrategyArg::MomentumOnly => PolicyKind::MomentumOnly,
            StrategyArg::EmaMomentumConfirmed => PolicyKind::EmaMomentumConfirmed,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[allow(clippy::too_many_arguments)]
fn run_command(
    ticker: String,
    period: String,
    interval: String,
    capital: f64,
    strategy: StrategyArg,
    csv: Option<PathBuf>,
    config: Option<PathBuf>,
    no_plot: bool,
    width: usize,
) -> Result<()> {
    let (run_config, policy, csv_path) = if let Some(path) = config {
        let file = RunFileConfig::load(&path)?;
        let run_config = file.to_run_config()?;
        let policy = file.build_policy()?;
        (run_config, policy, file.data.csv.map(PathBuf::from))
    } else {
        let run_config = RunConfig {
            ticker,
            period: period.parse::<Period>()?,
            interval: interval.parse::<Interval>()?,
            backtest: BacktestConfig {
                initial_capital: capital,
                show_progress: true,
            },
        };
        (run_config, PolicyKind::from(strategy).build(), csv)
    };

    let provider: Box<dyn MarketDataProvider> = match csv_path {
        Some(path) => Box::new(CsvProvider::new(path)),
        None => Box::new(ChartApiProvider::new()?),
    };

    let run = pipeline::run(provider.as_ref(), policy.as_ref(), &run_config)?;

    println!("Total Return: {:.2}%", run.result.total_return_pct);
    println!("{}", result_summary(&run.result, &run.frame, width));

    if !no_plot {
        println!();
        print!("{}", plot_frame(&run.frame, width));
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let outcome = match cli.command {
        Commands::Run {
            ticker,
            period,
            interval,
            capital,
            strategy,
            csv,
            config,
            no_plot,
            width,
        } => run_command(
            ticker, period, interval, capital, strategy, csv, config, no_plot, width,
        ),
        Commands::InitConfig { path } => {
            let result = std::fs::write(&path, RunFileConfig::example()).map_err(Into::into);
            if result.is_ok() {
                println!("Wrote example configuration to {}", path.display());
            }
            result
        }
    };

    if let Err(e) = outcome {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
