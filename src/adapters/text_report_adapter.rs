//! Plain-text report adapter implementing ReportPort.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::domain::backtest::{BacktestConfig, BacktestResult};
use crate::domain::error::CrossrankError;
use crate::domain::metrics::{Evaluation, SharpeOutcome};
use crate::ports::report_port::ReportPort;

pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn new() -> Self {
        Self
    }

    fn render(result: &BacktestResult, config: &BacktestConfig, universe: &[String]) -> String {
        let mut out = String::new();

        out.push_str("crossrank backtest report\n");
        out.push_str("=========================\n\n");
        let _ = writeln!(out, "Window:          {} to {}", config.start_date, config.end_date);
        let _ = writeln!(out, "Universe:        {} tickers", universe.len());
        let _ = writeln!(out, "Tickers:         {}", universe.join(", "));
        let _ = writeln!(out, "Rank threshold:  {}", config.rank_threshold);
        let _ = writeln!(out, "Risk-free rate:  {}", config.risk_free_rate);
        let _ = writeln!(out, "Trading days:    {}", config.trading_days);
        out.push('\n');

        match &result.evaluation {
            Evaluation::Summary(summary) => {
                let _ = writeln!(
                    out,
                    "Cumulative return: {:.6} ({:.2}%)",
                    summary.cumulative_return,
                    summary.cumulative_return * 100.0
                );
                match summary.sharpe {
                    SharpeOutcome::Defined(s) => {
                        let _ = writeln!(out, "Sharpe ratio:      {:.6}", s);
                    }
                    SharpeOutcome::ZeroVolatility => {
                        out.push_str("Sharpe ratio:      undefined (zero volatility)\n");
                    }
                }
                let _ = writeln!(
                    out,
                    "Max drawdown:      {:.6} ({:.2}%)",
                    summary.max_drawdown,
                    summary.max_drawdown * 100.0
                );
            }
            Evaluation::NoTrades => {
                out.push_str("No trades executed. Cannot compute performance metrics.\n");
            }
        }

        out.push_str("\ndate,strategy_return\n");
        for (date, r) in result.dates.iter().zip(result.strategy_returns.iter()) {
            let _ = writeln!(out, "{},{:.9}", date, r);
        }

        out
    }
}

impl Default for TextReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for TextReportAdapter {
    fn write(
        &self,
        result: &BacktestResult,
        config: &BacktestConfig,
        universe: &[String],
        output_path: &str,
    ) -> Result<(), CrossrankError> {
        let content = Self::render(result, config, universe);

        if let Some(parent) = Path::new(output_path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(output_path, content)?;
        Ok(())
    }
}
