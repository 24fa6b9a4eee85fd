#![allow(dead_code)]

use chrono::NaiveDate;
use crossrank::domain::backtest::BacktestConfig;
use crossrank::domain::error::CrossrankError;
use crossrank::domain::metrics::TRADING_DAYS_PER_YEAR;
pub use crossrank::domain::price::{PriceBar, PriceMatrix, TickerSeries};
use crossrank::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, CrossrankError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(CrossrankError::Database {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(ticker)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_tickers(&self) -> Result<Vec<String>, CrossrankError> {
        let mut tickers: Vec<String> = self.data.keys().cloned().collect();
        tickers.sort();
        Ok(tickers)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, CrossrankError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(CrossrankError::Database {
                reason: reason.clone(),
            });
        }
        match self.data.get(ticker) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.date).min().unwrap();
                let max = bars.iter().map(|b| b.date).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(ticker: &str, date_str: &str, adj_close: f64) -> PriceBar {
    PriceBar {
        ticker: ticker.to_string(),
        date: NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap(),
        open: adj_close - 1.0,
        high: adj_close + 1.0,
        low: adj_close - 2.0,
        close: adj_close,
        adj_close,
        volume: 1000,
    }
}

pub fn generate_bars(ticker: &str, start_date: &str, count: usize, start_price: f64) -> Vec<PriceBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    (0..count)
        .map(|i| PriceBar {
            ticker: ticker.to_string(),
            date: start + chrono::Duration::days(i as i64),
            open: start_price + i as f64,
            high: start_price + i as f64 + 1.0,
            low: start_price + i as f64 - 1.0,
            close: start_price + i as f64,
            adj_close: start_price + i as f64,
            volume: 1000,
        })
        .collect()
}

/// Build a price matrix from a dense time-by-asset price table, one column
/// per ticker, daily dates starting 2024-01-01.
pub fn matrix_from_table(tickers: &[&str], table: &[Vec<f64>]) -> PriceMatrix {
    let start = date(2024, 1, 1);
    let series: Vec<TickerSeries> = tickers
        .iter()
        .enumerate()
        .map(|(col, ticker)| {
            let bars = table
                .iter()
                .enumerate()
                .map(|(row, prices)| PriceBar {
                    ticker: ticker.to_string(),
                    date: start + chrono::Duration::days(row as i64),
                    open: prices[col],
                    high: prices[col],
                    low: prices[col],
                    close: prices[col],
                    adj_close: prices[col],
                    volume: 1000,
                })
                .collect();
            TickerSeries::new(ticker.to_string(), bars)
        })
        .collect();
    PriceMatrix::assemble(&series).unwrap()
}

pub fn sample_config() -> BacktestConfig {
    BacktestConfig {
        start_date: date(2024, 1, 1),
        end_date: date(2024, 12, 31),
        rank_threshold: 2,
        risk_free_rate: 0.0,
        trading_days: TRADING_DAYS_PER_YEAR,
    }
}
