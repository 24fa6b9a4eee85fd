//! Data access port trait.

use crate::domain::error::CrossrankError;
use crate::domain::price::PriceBar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily bars for one ticker in ascending date order, bounded inclusively
    /// by the window.
    fn fetch_prices(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, CrossrankError>;

    fn list_tickers(&self) -> Result<Vec<String>, CrossrankError>;

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, CrossrankError>;
}
