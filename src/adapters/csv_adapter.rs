//! CSV close-price adapter.
//!
//! Reads `<dir>/<TICKER>.csv`, matching the file name without regard to case,
//! so `aapl.csv` and `AAPL.CSV` both serve ticker `AAPL`. The first column is an ISO date; the close is
//! taken from a `close` or `adj_close` header, or from the second column of a
//! two-column file. Rows whose close does not parse are skipped so that price
//! cleaning happens in one place.

use crate::domain::error::QuantError;
use crate::ports::price_port::PricePort;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

const CLOSE_HEADERS: [&str; 3] = ["close", "adj_close", "adj close"];

pub struct CsvPriceAdapter {
    base_path: PathBuf,
}

impl CsvPriceAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        let ticker = ticker.trim().to_uppercase();
        let exact = self.base_path.join(format!("{}.csv", ticker));
        if exact.is_file() {
            return exact;
        }
        fs::read_dir(&self.base_path)
            .into_iter()
            .flatten()
            .flatten()
            .map(|entry| entry.path())
            .find(|path| csv_ticker(path).is_some_and(|stem| stem == ticker))
            .unwrap_or(exact)
    }
}

/// Upper-cased ticker for a `.csv` file, `None` for anything else.
fn csv_ticker(path: &Path) -> Option<String> {
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv || !path.is_file() {
        return None;
    }
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_uppercase())
}

fn source_error(reason: impl Into<String>) -> QuantError {
    QuantError::DataSource {
        reason: reason.into(),
    }
}

fn close_column(headers: &csv::StringRecord) -> Option<usize> {
    headers
        .iter()
        .position(|h| CLOSE_HEADERS.contains(&h.trim().to_lowercase().as_str()))
        .or_else(|| (headers.len() == 2).then_some(1))
}

impl PricePort for CsvPriceAdapter {
    fn fetch_closes(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<f64>, QuantError> {
        if ticker.trim().is_empty() {
            return Err(source_error("ticker must not be empty"));
        }
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path)
            .map_err(|e| source_error(format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| source_error(format!("CSV header error: {}", e)))?
            .clone();
        let close_idx = close_column(&headers).ok_or_else(|| {
            source_error(format!("{} has no close column", path.display()))
        })?;

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| source_error(format!("CSV parse error: {}", e)))?;

            let date_str = record
                .get(0)
                .ok_or_else(|| source_error("missing date column"))?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
                .map_err(|e| source_error(format!("invalid date '{}': {}", date_str, e)))?;

            if date < start || date > end {
                continue;
            }

            let close = record.get(close_idx).and_then(|v| v.trim().parse::<f64>().ok());
            if let Some(close) = close {
                rows.push((date, close));
            }
        }

        if rows.is_empty() {
            return Err(source_error(format!(
                "no prices for {} between {} and {}",
                ticker, start, end
            )));
        }

        rows.sort_by_key(|&(date, _)| date);
        Ok(rows.into_iter().map(|(_, close)| close).collect())
    }

    fn list_tickers(&self) -> Result<Vec<String>, QuantError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| {
            source_error(format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ))
        })?;

        let mut tickers = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| source_error(format!("directory entry error: {}", e)))?;
            if let Some(ticker) = csv_ticker(&entry.path()) {
                tickers.push(ticker);
            }
        }

        tickers.sort();
        tickers.dedup();
        Ok(tickers)
    }
}
