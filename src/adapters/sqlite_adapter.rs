//! SQLite data adapter backed by the `stock_data` table.

use crate::domain::error::CrossrankError;
use crate::domain::price::PriceBar;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, CrossrankError> {
        let db_path =
            config
                .get_string("sqlite", "path")
                .ok_or_else(|| CrossrankError::ConfigMissing {
                    section: "sqlite".into(),
                    key: "path".into(),
                })?;

        let pool_size = config.get_int("sqlite", "pool_size", 4) as u32;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool = Pool::builder().max_size(pool_size).build(manager).map_err(
            |e: r2d2::Error| CrossrankError::Database {
                reason: e.to_string(),
            },
        )?;

        Ok(Self { pool })
    }

    pub fn in_memory() -> Result<Self, CrossrankError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder().max_size(1).build(manager).map_err(
            |e: r2d2::Error| CrossrankError::Database {
                reason: e.to_string(),
            },
        )?;

        Ok(Self { pool })
    }

    pub fn initialize_schema(&self) -> Result<(), CrossrankError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| CrossrankError::Database {
                reason: e.to_string(),
            })?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS stock_data (
                ticker TEXT NOT NULL,
                date TEXT NOT NULL,
                open REAL NOT NULL,
                high REAL NOT NULL,
                low REAL NOT NULL,
                close REAL NOT NULL,
                adj_close REAL NOT NULL,
                volume INTEGER NOT NULL,
                PRIMARY KEY (ticker, date)
            );
            CREATE INDEX IF NOT EXISTS idx_stock_data_ticker ON stock_data(ticker);
            CREATE INDEX IF NOT EXISTS idx_stock_data_date ON stock_data(date);",
        )
        .map_err(|e: rusqlite::Error| CrossrankError::DatabaseQuery {
            reason: e.to_string(),
        })?;

        Ok(())
    }

    pub fn insert_bars(&self, bars: &[PriceBar]) -> Result<(), CrossrankError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| CrossrankError::Database {
                reason: e.to_string(),
            })?;

        let tx = conn
            .transaction()
            .map_err(|e: rusqlite::Error| CrossrankError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        for bar in bars {
            tx.execute(
                "INSERT OR REPLACE INTO stock_data
                     (ticker, date, open, high, low, close, adj_close, volume)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    bar.ticker,
                    bar.date.format("%Y-%m-%d").to_string(),
                    bar.open,
                    bar.high,
                    bar.low,
                    bar.close,
                    bar.adj_close,
                    bar.volume
                ],
            )
            .map_err(|e: rusqlite::Error| CrossrankError::DatabaseQuery {
                reason: e.to_string(),
            })?;
        }

        tx.commit()
            .map_err(|e: rusqlite::Error| CrossrankError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        Ok(())
    }
}

impl DataPort for SqliteAdapter {
    fn fetch_prices(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, CrossrankError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| CrossrankError::Database {
                reason: e.to_string(),
            })?;

        let start_str = start_date.format("%Y-%m-%d").to_string();
        let end_str = end_date.format("%Y-%m-%d").to_string();

        let query = "SELECT ticker, date, open, high, low, close, adj_close, volume
                     FROM stock_data
                     WHERE ticker = ?1 AND date >= ?2 AND date <= ?3
                     ORDER BY date ASC";

        let mut stmt =
            conn.prepare(query)
                .map_err(|e: rusqlite::Error| CrossrankError::DatabaseQuery {
                    reason: e.to_string(),
                })?;

        let rows = stmt
            .query_map(params![ticker, start_str, end_str], |row| {
                let date_str: String = row.get(1)?;
                let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        date_str.len(),
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?;
                Ok(PriceBar {
                    ticker: row.get(0)?,
                    date,
                    open: row.get(2)?,
                    high: row.get(3)?,
                    low: row.get(4)?,
                    close: row.get(5)?,
                    adj_close: row.get(6)?,
                    volume: row.get(7)?,
                })
            })
            .map_err(|e: rusqlite::Error| CrossrankError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let mut bars = Vec::new();
        for row in rows {
            bars.push(
                row.map_err(|e: rusqlite::Error| CrossrankError::DatabaseQuery {
                    reason: e.to_string(),
                })?,
            );
        }

        Ok(bars)
    }

    fn list_tickers(&self) -> Result<Vec<String>, CrossrankError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| CrossrankError::Database {
                reason: e.to_string(),
            })?;

        let query = "SELECT DISTINCT ticker FROM stock_data ORDER BY ticker";

        let mut stmt =
            conn.prepare(query)
                .map_err(|e: rusqlite::Error| CrossrankError::DatabaseQuery {
                    reason: e.to_string(),
                })?;

        let rows = stmt
            .query_map([], |row| row.get(0))
            .map_err(|e: rusqlite::Error| CrossrankError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let mut tickers = Vec::new();
        for row in rows {
            tickers.push(
                row.map_err(|e: rusqlite::Error| CrossrankError::DatabaseQuery {
                    reason: e.to_string(),
                })?,
            );
        }

        Ok(tickers)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, CrossrankError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| CrossrankError::Database {
                reason: e.to_string(),
            })?;

        let query = "SELECT MIN(date), MAX(date), COUNT(*) FROM stock_data WHERE ticker = ?1";

        let result: (Option<String>, Option<String>, i64) = conn
            .query_row(query, params![ticker], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })
            .map_err(|e: rusqlite::Error| CrossrankError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        match result {
            (Some(min_str), Some(max_str), count) if count > 0 => {
                let min = NaiveDate::parse_from_str(&min_str, "%Y-%m-%d").map_err(
                    |e: chrono::ParseError| CrossrankError::Database {
                        reason: e.to_string(),
                    },
                )?;
                let max = NaiveDate::parse_from_str(&max_str, "%Y-%m-%d").map_err(
                    |e: chrono::ParseError| CrossrankError::Database {
                        reason: e.to_string(),
                    },
                )?;
                Ok(Some((min, max, count as usize)))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EmptyConfig;

    impl ConfigPort for EmptyConfig {
        fn get_string(&self, _section: &str, _key: &str) -> Option<String> {
            None
        }
        fn get_int(&self, _section: &str, _key: &str, default: i64) -> i64 {
            default
        }
        fn get_double(&self, _section: &str, _key: &str, default: f64) -> f64 {
            default
        }
        fn get_bool(&self, _section: &str, _key: &str, default: bool) -> bool {
            default
        }
    }

    fn bar(ticker: &str, y: i32, m: u32, d: u32, adj_close: f64) -> PriceBar {
        PriceBar {
            ticker: ticker.to_string(),
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            open: adj_close - 0.5,
            high: adj_close + 1.0,
            low: adj_close - 1.0,
            close: adj_close,
            adj_close,
            volume: 1000,
        }
    }

    #[test]
    fn from_config_missing_path() {
        let result = SqliteAdapter::from_config(&EmptyConfig);
        match result {
            Err(CrossrankError::ConfigMissing { section, key }) => {
                assert_eq!(section, "sqlite");
                assert_eq!(key, "path");
            }
            Err(other) => panic!("expected ConfigMissing, got: {other}"),
            Ok(_) => panic!("expected error, got Ok"),
        }
    }

    #[test]
    fn in_memory_initialization() {
        let adapter = SqliteAdapter::in_memory().unwrap();
        adapter.initialize_schema().unwrap();
    }

    #[test]
    fn fetch_prices_returns_ordered_window() {
        let adapter = SqliteAdapter::in_memory().unwrap();
        adapter.initialize_schema().unwrap();

        adapter
            .insert_bars(&[
                bar("AAPL", 2024, 1, 3, 102.0),
                bar("AAPL", 2024, 1, 1, 100.0),
                bar("AAPL", 2024, 1, 2, 101.0),
                bar("MSFT", 2024, 1, 1, 300.0),
            ])
            .unwrap();

        let fetched = adapter
            .fetch_prices(
                "AAPL",
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            )
            .unwrap();

        assert_eq!(fetched.len(), 2);
        assert_eq!(fetched[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(fetched[1].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert!((fetched[1].adj_close - 101.0).abs() < f64::EPSILON);
    }

    #[test]
    fn insert_replaces_duplicate_dates() {
        let adapter = SqliteAdapter::in_memory().unwrap();
        adapter.initialize_schema().unwrap();

        adapter.insert_bars(&[bar("AAPL", 2024, 1, 1, 100.0)]).unwrap();
        adapter.insert_bars(&[bar("AAPL", 2024, 1, 1, 105.0)]).unwrap();

        let fetched = adapter
            .fetch_prices(
                "AAPL",
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            )
            .unwrap();

        assert_eq!(fetched.len(), 1);
        assert!((fetched[0].adj_close - 105.0).abs() < f64::EPSILON);
    }

    #[test]
    fn list_tickers_distinct_sorted() {
        let adapter = SqliteAdapter::in_memory().unwrap();
        adapter.initialize_schema().unwrap();

        adapter
            .insert_bars(&[
                bar("MSFT", 2024, 1, 1, 300.0),
                bar("AAPL", 2024, 1, 1, 100.0),
                bar("AAPL", 2024, 1, 2, 101.0),
            ])
            .unwrap();

        let tickers = adapter.list_tickers().unwrap();
        assert_eq!(tickers, vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn get_data_range_reports_bounds_and_count() {
        let adapter = SqliteAdapter::in_memory().unwrap();
        adapter.initialize_schema().unwrap();

        adapter
            .insert_bars(&[
                bar("AAPL", 2024, 1, 1, 100.0),
                bar("AAPL", 2024, 1, 5, 104.0),
            ])
            .unwrap();

        let (min, max, count) = adapter.get_data_range("AAPL").unwrap().unwrap();
        assert_eq!(min, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(max, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(count, 2);
    }

    #[test]
    fn get_data_range_none_when_no_rows() {
        let adapter = SqliteAdapter::in_memory().unwrap();
        adapter.initialize_schema().unwrap();
        assert!(adapter.get_data_range("AAPL").unwrap().is_none());
    }
}
