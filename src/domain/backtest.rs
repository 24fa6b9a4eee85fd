//! Backtest configuration and the five-stage evaluation pipeline.

use crate::domain::attribution::{attribute_returns, strategy_returns};
use crate::domain::error::CrossrankError;
use crate::domain::metrics::{evaluate, Evaluation};
use crate::domain::price::PriceMatrix;
use crate::domain::ranking::rank_returns;
use crate::domain::returns::compute_returns;
use crate::domain::signal::generate_signals;
use chrono::NaiveDate;

pub const DEFAULT_RANK_THRESHOLD: u32 = 22;

#[derive(Debug, Clone)]
pub struct BacktestConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rank_threshold: u32,
    pub risk_free_rate: f64,
    pub trading_days: f64,
}

#[derive(Debug, Clone)]
pub struct BacktestResult {
    /// One date per surviving return row.
    pub dates: Vec<NaiveDate>,
    pub strategy_returns: Vec<f64>,
    pub evaluation: Evaluation,
}

/// Run the full pipeline: prices → returns → ranks → signals → attributed
/// returns → statistics. Every stage allocates a fresh value; the input
/// matrix is never mutated.
pub fn run_backtest(
    prices: &PriceMatrix,
    config: &BacktestConfig,
) -> Result<BacktestResult, CrossrankError> {
    if prices.ticker_count() == 0 {
        return Err(CrossrankError::EmptyUniverse);
    }

    let returns = compute_returns(prices)?;
    let ranks = rank_returns(&returns);
    let signals = generate_signals(&ranks, returns.ticker_count(), config.rank_threshold);
    let attributed = attribute_returns(&signals, &returns)?;
    let series = strategy_returns(&attributed)?;
    let evaluation = evaluate(&series, config.risk_free_rate, config.trading_days);

    Ok(BacktestResult {
        dates: returns.dates,
        strategy_returns: series,
        evaluation,
    })
}
