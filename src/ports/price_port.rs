//! Close-price retrieval port.

use crate::domain::error::QuantError;
use chrono::NaiveDate;

pub trait PricePort {
    /// Closing prices for `ticker` with dates in `[start, end]`, oldest first.
    fn fetch_closes(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<f64>, QuantError>;

    fn list_tickers(&self) -> Result<Vec<String>, QuantError>;
}
