//! CSV file data adapter: one `{TICKER}.csv` per asset under a base directory.

use crate::domain::error::CrossrankError;
use crate::domain::price::PriceBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }

    fn field<'r>(
        record: &'r csv::StringRecord,
        index: usize,
        name: &str,
    ) -> Result<&'r str, CrossrankError> {
        record.get(index).ok_or_else(|| CrossrankError::Database {
            reason: format!("missing {} column", name),
        })
    }

    fn numeric_field<T: std::str::FromStr>(
        record: &csv::StringRecord,
        index: usize,
        name: &str,
    ) -> Result<T, CrossrankError>
    where
        T::Err: std::fmt::Display,
    {
        Self::field(record, index, name)?
            .parse()
            .map_err(|e| CrossrankError::Database {
                reason: format!("invalid {} value: {}", name, e),
            })
    }
}

impl DataPort for CsvAdapter {
    fn fetch_prices(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, CrossrankError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path).map_err(|e| CrossrankError::Database {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| CrossrankError::Database {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = Self::field(&record, 0, "date")?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                CrossrankError::Database {
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            if date < start_date || date > end_date {
                continue;
            }

            bars.push(PriceBar {
                ticker: ticker.to_string(),
                date,
                open: Self::numeric_field(&record, 1, "open")?,
                high: Self::numeric_field(&record, 2, "high")?,
                low: Self::numeric_field(&record, 3, "low")?,
                close: Self::numeric_field(&record, 4, "close")?,
                adj_close: Self::numeric_field(&record, 5, "adj_close")?,
                volume: Self::numeric_field(&record, 6, "volume")?,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn list_tickers(&self) -> Result<Vec<String>, CrossrankError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| CrossrankError::Database {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut tickers = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| CrossrankError::Database {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(ticker) = name_str.strip_suffix(".csv") {
                tickers.push(ticker.to_string());
            }
        }

        tickers.sort();
        Ok(tickers)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, CrossrankError> {
        let bars = self.fetch_prices(ticker, NaiveDate::MIN, NaiveDate::MAX)?;
        match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date, bars.len()))),
            _ => Ok(None),
        }
    }
}
