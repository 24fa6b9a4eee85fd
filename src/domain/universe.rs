//! Universe parsing and validation against a data port.
//!
//! Parses ticker lists from configuration and checks each ticker has enough
//! price history before the matrix is assembled.

use crate::domain::error::CrossrankError;
use crate::domain::price::TickerSeries;
use crate::domain::returns::MIN_PRICE_ROWS;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::collections::HashSet;

pub const MIN_PRICE_BARS: usize = MIN_PRICE_ROWS;

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in ticker list")]
    EmptyToken,

    #[error("duplicate ticker: {0}")]
    DuplicateTicker(String),
}

/// Split a comma-separated ticker list into trimmed, uppercased symbols.
pub fn parse_tickers(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut tickers = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let ticker = trimmed.to_uppercase();
        if seen.contains(&ticker) {
            return Err(UniverseError::DuplicateTicker(ticker));
        }
        seen.insert(ticker.clone());
        tickers.push(ticker);
    }

    Ok(tickers)
}

#[derive(Debug)]
pub struct UniverseValidationResult {
    /// Surviving tickers with their fetched histories, in request order.
    pub series: Vec<TickerSeries>,
    pub skipped: Vec<SkippedTicker>,
}

#[derive(Debug, Clone)]
pub struct SkippedTicker {
    pub ticker: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone)]
pub enum SkipReason {
    NoData,
    InsufficientBars { bars: usize },
}

/// Fetch every ticker, warn and skip the ones with no usable rows, and fail
/// only when none survive. Completely missing tickers are reported, never
/// silently substituted.
pub fn validate_universe(
    data_port: &dyn DataPort,
    tickers: Vec<String>,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<UniverseValidationResult, CrossrankError> {
    let total = tickers.len();
    let mut series = Vec::new();
    let mut skipped = Vec::new();

    for ticker in tickers {
        let bars = match data_port.fetch_prices(&ticker, start_date, end_date) {
            Ok(data) => data,
            Err(e) => {
                eprintln!("Warning: skipping {} ({})", ticker, e);
                skipped.push(SkippedTicker {
                    ticker,
                    reason: SkipReason::NoData,
                });
                continue;
            }
        };

        if bars.is_empty() {
            eprintln!("Warning: skipping {} (no data found)", ticker);
            skipped.push(SkippedTicker {
                ticker,
                reason: SkipReason::NoData,
            });
            continue;
        }

        if bars.len() < MIN_PRICE_BARS {
            eprintln!(
                "Warning: skipping {} (only {} bars, minimum {} required)",
                ticker,
                bars.len(),
                MIN_PRICE_BARS
            );
            skipped.push(SkippedTicker {
                ticker,
                reason: SkipReason::InsufficientBars { bars: bars.len() },
            });
            continue;
        }

        eprintln!("  {}: {} bars [OK]", ticker, bars.len());
        series.push(TickerSeries::new(ticker, bars));
    }

    if series.is_empty() {
        return Err(CrossrankError::InsufficientData {
            rows: 0,
            minimum: MIN_PRICE_BARS,
        });
    }

    if !skipped.is_empty() {
        eprintln!("Backtesting {} of {} tickers", series.len(), total);
    }

    Ok(UniverseValidationResult { series, skipped })
}
