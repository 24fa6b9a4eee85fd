//! Performance statistics for the strategy return series.

use crate::domain::error::CrossrankError;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Sharpe ratio outcome. Zero volatility is a valid, informative backtest
/// result, so it is carried as a tagged value instead of an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SharpeOutcome {
    Defined(f64),
    ZeroVolatility,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceSummary {
    pub cumulative_return: f64,
    pub sharpe: SharpeOutcome,
    pub max_drawdown: f64,
}

/// Result of evaluating a strategy return series. An empty series means the
/// backtest executed no trades; that is reported, not raised.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    Summary(PerformanceSummary),
    NoTrades,
}

fn wealth_series(returns: &[f64]) -> Vec<f64> {
    let mut wealth = Vec::with_capacity(returns.len());
    let mut value = 1.0;
    for r in returns {
        value *= 1.0 + r;
        wealth.push(value);
    }
    wealth
}

fn sharpe_of(returns: &[f64], annual_rf_rate: f64, trading_days: f64) -> SharpeOutcome {
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    if stddev == 0.0 {
        return SharpeOutcome::ZeroVolatility;
    }

    // The daily mean is deliberately not annualized while the volatility is;
    // this replicates the strategy's published scaling.
    SharpeOutcome::Defined((mean - annual_rf_rate) / (stddev * trading_days.sqrt()))
}

fn drawdown_of(wealth: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for &value in wealth {
        if value > peak {
            peak = value;
        }
        let drawdown = (value - peak) / peak;
        if drawdown < worst {
            worst = drawdown;
        }
    }
    worst
}

/// Compounded wealth curve `cumprod(1 + r_t)`, starting from 1.
pub fn wealth_curve(returns: &[f64]) -> Result<Vec<f64>, CrossrankError> {
    if returns.is_empty() {
        return Err(CrossrankError::EmptySeries);
    }
    Ok(wealth_series(returns))
}

/// Final cumulative return `cumprod(1 + r_t) - 1`.
pub fn cumulative_return(returns: &[f64]) -> Result<f64, CrossrankError> {
    let wealth = wealth_curve(returns)?;
    Ok(wealth[wealth.len() - 1] - 1.0)
}

/// `(mean(r) - annual_rf_rate) / (std(r) * sqrt(trading_days))` with
/// population standard deviation.
pub fn sharpe_ratio(
    returns: &[f64],
    annual_rf_rate: f64,
    trading_days: f64,
) -> Result<SharpeOutcome, CrossrankError> {
    if returns.is_empty() {
        return Err(CrossrankError::EmptySeries);
    }
    Ok(sharpe_of(returns, annual_rf_rate, trading_days))
}

/// Most negative peak-relative decline of the wealth curve. Empty or
/// non-decreasing series yield 0.
pub fn max_drawdown(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    drawdown_of(&wealth_series(returns))
}

/// Fold the three statistics into one evaluation of the series.
pub fn evaluate(returns: &[f64], annual_rf_rate: f64, trading_days: f64) -> Evaluation {
    if returns.is_empty() {
        return Evaluation::NoTrades;
    }

    let wealth = wealth_series(returns);
    Evaluation::Summary(PerformanceSummary {
        cumulative_return: wealth[wealth.len() - 1] - 1.0,
        sharpe: sharpe_of(returns, annual_rf_rate, trading_days),
        max_drawdown: drawdown_of(&wealth),
    })
}
