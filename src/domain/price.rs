//! Daily price bars and the price matrix the engine consumes.

use crate::domain::error::CrossrankError;
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

/// One daily bar for one ticker. The engine itself only reads `adj_close`;
/// the other columns are carried for storage round-trips.
#[derive(Debug, Clone)]
pub struct PriceBar {
    pub ticker: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: i64,
}

/// Per-ticker bar history with a date lookup index.
#[derive(Debug, Clone)]
pub struct TickerSeries {
    pub ticker: String,
    pub bars: Vec<PriceBar>,
    pub date_index: HashMap<NaiveDate, usize>,
}

impl TickerSeries {
    pub fn new(ticker: String, bars: Vec<PriceBar>) -> Self {
        let date_index = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| (bar.date, i))
            .collect();
        Self {
            ticker,
            bars,
            date_index,
        }
    }

    pub fn bar_count(&self) -> usize {
        self.bars.len()
    }

    pub fn get_bar(&self, date: NaiveDate) -> Option<&PriceBar> {
        self.date_index.get(&date).map(|&i| &self.bars[i])
    }
}

/// Adjusted-close prices on a merged ascending timeline. A `None` cell means
/// the ticker had no bar on that date; the return stage drops those rows.
#[derive(Debug, Clone)]
pub struct PriceMatrix {
    pub tickers: Vec<String>,
    pub dates: Vec<NaiveDate>,
    /// Row-major, one row per date, one column per ticker.
    pub cells: Vec<Vec<Option<f64>>>,
}

impl PriceMatrix {
    /// Merge per-ticker series onto the union of their dates. Column order
    /// follows the order of `series`. Non-positive adjusted closes are
    /// rejected here, before any return is computed from them.
    pub fn assemble(series: &[TickerSeries]) -> Result<Self, CrossrankError> {
        for s in series {
            for bar in &s.bars {
                if bar.adj_close <= 0.0 {
                    return Err(CrossrankError::InvalidPrice {
                        ticker: s.ticker.clone(),
                        date: bar.date,
                        price: bar.adj_close,
                    });
                }
            }
        }

        let dates: Vec<NaiveDate> = series
            .iter()
            .flat_map(|s| s.bars.iter().map(|bar| bar.date))
            .collect::<BTreeSet<NaiveDate>>()
            .into_iter()
            .collect();

        let cells = dates
            .iter()
            .map(|&date| {
                series
                    .iter()
                    .map(|s| s.get_bar(date).map(|bar| bar.adj_close))
                    .collect()
            })
            .collect();

        Ok(Self {
            tickers: series.iter().map(|s| s.ticker.clone()).collect(),
            dates,
            cells,
        })
    }

    pub fn ticker_count(&self) -> usize {
        self.tickers.len()
    }

    pub fn date_count(&self) -> usize {
        self.dates.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bar(ticker: &str, date: &str, adj_close: f64) -> PriceBar {
        PriceBar {
            ticker: ticker.to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: adj_close - 1.0,
            high: adj_close + 1.0,
            low: adj_close - 2.0,
            close: adj_close,
            adj_close,
            volume: 1000,
        }
    }

    #[test]
    fn ticker_series_builds_date_index() {
        let bars = vec![
            make_bar("AAPL", "2024-01-01", 100.0),
            make_bar("AAPL", "2024-01-02", 101.0),
        ];
        let series = TickerSeries::new("AAPL".into(), bars);

        assert_eq!(series.bar_count(), 2);
        let bar = series.get_bar(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert!(bar.is_some());
        assert!((bar.unwrap().adj_close - 101.0).abs() < f64::EPSILON);
        assert!(series
            .get_bar(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap())
            .is_none());
    }

    #[test]
    fn assemble_merges_timelines() {
        let aapl = TickerSeries::new(
            "AAPL".into(),
            vec![
                make_bar("AAPL", "2024-01-02", 100.0),
                make_bar("AAPL", "2024-01-05", 101.0),
            ],
        );
        let msft = TickerSeries::new(
            "MSFT".into(),
            vec![
                make_bar("MSFT", "2024-01-01", 50.0),
                make_bar("MSFT", "2024-01-02", 51.0),
            ],
        );

        let matrix = PriceMatrix::assemble(&[aapl, msft]).unwrap();

        assert_eq!(matrix.tickers, vec!["AAPL", "MSFT"]);
        assert_eq!(matrix.date_count(), 3);
        assert_eq!(matrix.dates[0], NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(matrix.cells[0], vec![None, Some(50.0)]);
        assert_eq!(matrix.cells[1], vec![Some(100.0), Some(51.0)]);
        assert_eq!(matrix.cells[2], vec![Some(101.0), None]);
    }

    #[test]
    fn assemble_rejects_zero_price() {
        let series = TickerSeries::new(
            "AAPL".into(),
            vec![
                make_bar("AAPL", "2024-01-01", 100.0),
                make_bar("AAPL", "2024-01-02", 0.0),
            ],
        );

        let err = PriceMatrix::assemble(&[series]).unwrap_err();
        assert!(matches!(
            err,
            CrossrankError::InvalidPrice { ticker, .. } if ticker == "AAPL"
        ));
    }

    #[test]
    fn assemble_rejects_negative_price() {
        let series = TickerSeries::new(
            "AAPL".into(),
            vec![make_bar("AAPL", "2024-01-01", -5.0)],
        );

        assert!(matches!(
            PriceMatrix::assemble(&[series]),
            Err(CrossrankError::InvalidPrice { .. })
        ));
    }

    #[test]
    fn assemble_empty_universe_yields_empty_matrix() {
        let matrix = PriceMatrix::assemble(&[]).unwrap();
        assert_eq!(matrix.ticker_count(), 0);
        assert_eq!(matrix.date_count(), 0);
    }

    #[test]
    fn column_order_follows_input_order() {
        let a = TickerSeries::new("NVDA".into(), vec![make_bar("NVDA", "2024-01-01", 1.0)]);
        let b = TickerSeries::new("AAPL".into(), vec![make_bar("AAPL", "2024-01-01", 2.0)]);

        let matrix = PriceMatrix::assemble(&[a, b]).unwrap();
        assert_eq!(matrix.tickers, vec!["NVDA", "AAPL"]);
        assert_eq!(matrix.cells[0], vec![Some(1.0), Some(2.0)]);
    }
}
