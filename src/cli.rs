//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::backtest::{run_backtest, BacktestConfig, DEFAULT_RANK_THRESHOLD};
use crate::domain::config_validation::validate_backtest_config;
use crate::domain::error::CrossrankError;
use crate::domain::metrics::{Evaluation, SharpeOutcome, TRADING_DAYS_PER_YEAR};
use crate::domain::price::PriceMatrix;
use crate::domain::universe::{parse_tickers, validate_universe};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "crossrank", about = "Cross-sectional momentum/reversal backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        ticker: Option<String>,
        #[arg(long)]
        threshold: Option<u32>,
        #[arg(long)]
        dry_run: bool,
    },
    /// List tickers available at the price source
    ListTickers {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show stored date range for ticker(s)
    Info {
        #[arg(long)]
        ticker: Option<String>,
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Load per-ticker CSV files into the SQLite store
    Import {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        dir: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            output,
            ticker,
            threshold,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config, ticker.as_deref(), threshold)
            } else {
                run_backtest_cmd(&config, output.as_ref(), ticker.as_deref(), threshold)
            }
        }
        Command::ListTickers { config } => run_list_tickers(&config),
        Command::Info { ticker, config } => run_info(ticker.as_deref(), &config),
        Command::Import { config, dir } => run_import(&config, &dir),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = CrossrankError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_backtest_config(
    adapter: &dyn ConfigPort,
    threshold_override: Option<u32>,
) -> Result<BacktestConfig, CrossrankError> {
    let start_str = adapter
        .get_string("backtest", "start_date")
        .ok_or_else(|| CrossrankError::ConfigMissing {
            section: "backtest".into(),
            key: "start_date".into(),
        })?;
    let end_str = adapter.get_string("backtest", "end_date").ok_or_else(|| {
        CrossrankError::ConfigMissing {
            section: "backtest".into(),
            key: "end_date".into(),
        }
    })?;

    let start_date = NaiveDate::parse_from_str(&start_str, "%Y-%m-%d").map_err(|_| {
        CrossrankError::ConfigInvalid {
            section: "backtest".into(),
            key: "start_date".into(),
            reason: "invalid date format (expected YYYY-MM-DD)".into(),
        }
    })?;
    let end_date = NaiveDate::parse_from_str(&end_str, "%Y-%m-%d").map_err(|_| {
        CrossrankError::ConfigInvalid {
            section: "backtest".into(),
            key: "end_date".into(),
            reason: "invalid date format (expected YYYY-MM-DD)".into(),
        }
    })?;

    let rank_threshold = match threshold_override {
        Some(t) => t,
        None => {
            adapter.get_int("backtest", "rank_threshold", DEFAULT_RANK_THRESHOLD as i64) as u32
        }
    };

    Ok(BacktestConfig {
        start_date,
        end_date,
        rank_threshold,
        risk_free_rate: adapter.get_double("backtest", "risk_free_rate", 0.0),
        trading_days: adapter.get_double("backtest", "trading_days", TRADING_DAYS_PER_YEAR),
    })
}

pub fn resolve_tickers(ticker_override: Option<&str>, config: &dyn ConfigPort) -> Vec<String> {
    if let Some(t) = ticker_override {
        return vec![t.to_uppercase()];
    }

    if let Some(tickers) = config.get_list("backtest", "tickers") {
        return tickers.into_iter().map(|t| t.to_uppercase()).collect();
    }

    if let Some(ticker) = config.get_string("backtest", "ticker") {
        let ticker = ticker.trim().to_uppercase();
        if !ticker.is_empty() {
            return vec![ticker];
        }
    }

    vec![]
}

fn open_data_port(config: &dyn ConfigPort) -> Result<Box<dyn DataPort>, CrossrankError> {
    let source = config
        .get_string("data", "source")
        .unwrap_or_else(|| "sqlite".to_string());

    match source.as_str() {
        "csv" => {
            let path = config
                .get_string("csv", "path")
                .ok_or_else(|| CrossrankError::ConfigMissing {
                    section: "csv".into(),
                    key: "path".into(),
                })?;
            Ok(Box::new(CsvAdapter::new(PathBuf::from(path))))
        }
        "sqlite" => {
            #[cfg(feature = "sqlite")]
            {
                use crate::adapters::sqlite_adapter::SqliteAdapter;
                Ok(Box::new(SqliteAdapter::from_config(config)?))
            }

            #[cfg(not(feature = "sqlite"))]
            {
                Err(CrossrankError::ConfigInvalid {
                    section: "data".into(),
                    key: "source".into(),
                    reason: "sqlite support is not compiled in".into(),
                })
            }
        }
        other => Err(CrossrankError::ConfigInvalid {
            section: "data".into(),
            key: "source".into(),
            reason: format!("unknown data source '{}'", other),
        }),
    }
}

fn run_backtest_cmd(
    config_path: &PathBuf,
    output_path: Option<&PathBuf>,
    ticker_override: Option<&str>,
    threshold_override: Option<u32>,
) -> ExitCode {
    // Stage 1: Load config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    // Stage 2: Validate backtest config
    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 3: Build BacktestConfig
    let bt_config = match build_backtest_config(&adapter, threshold_override) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 4: Resolve universe
    let tickers = match resolve_universe(ticker_override, &adapter) {
        Ok(t) => t,
        Err(code) => return code,
    };

    // Stage 5: Open the data port
    let data_port = match open_data_port(&adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    run_backtest_pipeline(data_port.as_ref(), &bt_config, &tickers, output_path)
}

fn resolve_universe(
    ticker_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<Vec<String>, ExitCode> {
    let raw = resolve_tickers(ticker_override, config);
    if raw.is_empty() {
        eprintln!("error: no tickers configured");
        return Err(ExitCode::from(2));
    }

    parse_tickers(&raw.join(",")).map_err(|e| {
        eprintln!("error: failed to parse tickers: {e}");
        ExitCode::from(2)
    })
}

/// Stages 6-10: validate the universe against the data port, assemble the
/// price matrix, run the engine, and print/write the results.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    bt_config: &BacktestConfig,
    tickers: &[String],
    output_path: Option<&PathBuf>,
) -> ExitCode {
    eprintln!("Validating {} tickers...", tickers.len());

    // Stage 6: Validate universe
    let validation = match validate_universe(
        data_port,
        tickers.to_vec(),
        bt_config.start_date,
        bt_config.end_date,
    ) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let surviving: Vec<String> = validation
        .series
        .iter()
        .map(|s| s.ticker.clone())
        .collect();

    // Stage 7: Assemble the price matrix
    let matrix = match PriceMatrix::assemble(&validation.series) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!(
        "Running backtest: {} tickers, {} to {}",
        matrix.ticker_count(),
        bt_config.start_date,
        bt_config.end_date,
    );
    eprintln!("  Processing: {} dates", matrix.date_count());

    // Stage 8: Run the engine
    let result = match run_backtest(&matrix, bt_config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 9: Console summary on stderr, machine-readable values on stdout
    eprintln!("\n=== Performance Summary ===");
    match &result.evaluation {
        Evaluation::Summary(summary) => {
            eprintln!(
                "Cumulative Return: {:.2}%",
                summary.cumulative_return * 100.0
            );
            match summary.sharpe {
                SharpeOutcome::Defined(s) => eprintln!("Sharpe Ratio:      {:.4}", s),
                SharpeOutcome::ZeroVolatility => {
                    eprintln!("Sharpe Ratio:      undefined (zero volatility)")
                }
            }
            eprintln!("Max Drawdown:      {:.2}%", summary.max_drawdown * 100.0);

            println!("cumulative_return={:.9}", summary.cumulative_return);
            match summary.sharpe {
                SharpeOutcome::Defined(s) => println!("sharpe_ratio={:.9}", s),
                SharpeOutcome::ZeroVolatility => println!("sharpe_ratio=undefined"),
            }
            println!("max_drawdown={:.9}", summary.max_drawdown);
        }
        Evaluation::NoTrades => {
            eprintln!("No trades executed. Cannot compute performance metrics.");
            println!("no_trades");
        }
    }

    // Stage 10: Optional text report
    if let Some(output) = output_path {
        let report = TextReportAdapter::new();
        match report.write(&result, bt_config, &surviving, &output.display().to_string()) {
            Ok(()) => eprintln!("\nReport written to: {}", output.display()),
            Err(e) => {
                eprintln!("error: failed to write report: {e}");
                return (&e).into();
            }
        }
    }

    ExitCode::SUCCESS
}

pub fn run_dry_run(
    config_path: &PathBuf,
    ticker_override: Option<&str>,
    threshold_override: Option<u32>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    eprintln!("Config validated successfully");

    let bt_config = match build_backtest_config(&adapter, threshold_override) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let tickers = match resolve_universe(ticker_override, &adapter) {
        Ok(t) => t,
        Err(code) => return code,
    };

    eprintln!("\nResolved parameters:");
    eprintln!("  window:         {} to {}", bt_config.start_date, bt_config.end_date);
    eprintln!("  rank threshold: {}", bt_config.rank_threshold);
    eprintln!("  risk-free rate: {}", bt_config.risk_free_rate);
    eprintln!("  trading days:   {}", bt_config.trading_days);
    eprintln!("\nUniverse ({} tickers):", tickers.len());
    eprintln!("  {}", tickers.join(", "));

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn run_list_tickers(config_path: &PathBuf) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let data_port = match open_data_port(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let tickers = match data_port.list_tickers() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if tickers.is_empty() {
        eprintln!("No tickers found");
    } else {
        for ticker in &tickers {
            println!("{}", ticker);
        }
        eprintln!("{} tickers found", tickers.len());
    }
    ExitCode::SUCCESS
}

fn run_info(ticker_override: Option<&str>, config_path: &PathBuf) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let tickers = resolve_tickers(ticker_override, &config);
    if tickers.is_empty() {
        eprintln!("error: no tickers configured (use --ticker or set in config)");
        return ExitCode::from(2);
    }

    let data_port = match open_data_port(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    for ticker in &tickers {
        match data_port.get_data_range(ticker) {
            Ok(Some((min_date, max_date, count))) => {
                println!("{}: {} bars, {} to {}", ticker, count, min_date, max_date);
            }
            Ok(None) => {
                eprintln!("{}: no data found", ticker);
            }
            Err(e) => {
                eprintln!("error querying {}: {}", ticker, e);
            }
        }
    }
    ExitCode::SUCCESS
}

fn run_import(config_path: &PathBuf, dir: &PathBuf) -> ExitCode {
    #[cfg(feature = "sqlite")]
    {
        use crate::adapters::sqlite_adapter::SqliteAdapter;

        eprintln!("Loading config from {}", config_path.display());
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };

        let store = match SqliteAdapter::from_config(&config) {
            Ok(a) => a,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };
        if let Err(e) = store.initialize_schema() {
            eprintln!("error: {e}");
            return (&e).into();
        }

        let source = CsvAdapter::new(dir.clone());
        let tickers = match source.list_tickers() {
            Ok(t) => t,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        if tickers.is_empty() {
            eprintln!("No CSV files found in {}", dir.display());
            return ExitCode::from(5);
        }

        let mut total = 0usize;
        for ticker in &tickers {
            let bars = match source.fetch_prices(ticker, NaiveDate::MIN, NaiveDate::MAX) {
                Ok(b) => b,
                Err(e) => {
                    eprintln!("warning: skipping {} ({})", ticker, e);
                    continue;
                }
            };
            if let Err(e) = store.insert_bars(&bars) {
                eprintln!("error: {e}");
                return (&e).into();
            }
            eprintln!("  {}: {} bars imported", ticker, bars.len());
            total += bars.len();
        }

        eprintln!("Imported {} bars for {} tickers", total, tickers.len());
        ExitCode::SUCCESS
    }

    #[cfg(not(feature = "sqlite"))]
    {
        let _ = (config_path, dir);
        eprintln!("error: sqlite feature is required for import");
        ExitCode::from(1)
    }
}
