//! Simple daily returns from the price matrix.

use crate::domain::error::CrossrankError;
use crate::domain::price::PriceMatrix;
use chrono::NaiveDate;

/// Minimum price rows needed to compute a single return.
pub const MIN_PRICE_ROWS: usize = 2;

/// Dense return matrix. Rows that would contain any missing return are
/// dropped wholesale, so every surviving row is complete for all tickers.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnMatrix {
    pub tickers: Vec<String>,
    /// Date of the later price in each surviving pair.
    pub dates: Vec<NaiveDate>,
    pub rows: Vec<Vec<f64>>,
}

impl ReturnMatrix {
    pub fn ticker_count(&self) -> usize {
        self.tickers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// `return[t][a] = (price[t][a] - price[t-1][a]) / price[t-1][a]`.
///
/// A return row needs both the current and the previous price for every
/// ticker; rows where any ticker is missing either one are dropped entirely.
pub fn compute_returns(prices: &PriceMatrix) -> Result<ReturnMatrix, CrossrankError> {
    if prices.date_count() < MIN_PRICE_ROWS {
        return Err(CrossrankError::InsufficientData {
            rows: prices.date_count(),
            minimum: MIN_PRICE_ROWS,
        });
    }

    let mut dates = Vec::new();
    let mut rows = Vec::new();

    for t in 1..prices.date_count() {
        let prev = &prices.cells[t - 1];
        let curr = &prices.cells[t];

        let row: Option<Vec<f64>> = prev
            .iter()
            .zip(curr.iter())
            .map(|(p, c)| match (p, c) {
                (Some(p), Some(c)) => Some((c - p) / p),
                _ => None,
            })
            .collect();

        if let Some(row) = row {
            dates.push(prices.dates[t]);
            rows.push(row);
        }
    }

    if rows.is_empty() && !prices.tickers.is_empty() {
        return Err(CrossrankError::InsufficientData {
            rows: 0,
            minimum: 1,
        });
    }

    Ok(ReturnMatrix {
        tickers: prices.tickers.clone(),
        dates,
        rows,
    })
}
