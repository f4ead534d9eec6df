#![allow(dead_code)]

use chrono::NaiveDate;
use quantkit::domain::error::QuantError;
use quantkit::domain::options::{OptionContract, OptionType};
use quantkit::ports::price_port::PricePort;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;

/// In-memory price source recording every request it serves.
pub struct MockPricePort {
    pub data: HashMap<String, Vec<f64>>,
    pub errors: HashMap<String, String>,
    pub requests: RefCell<Vec<(String, NaiveDate, NaiveDate)>>,
}

impl MockPricePort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn with_closes(mut self, ticker: &str, closes: Vec<f64>) -> Self {
        self.data.insert(ticker.to_string(), closes);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl PricePort for MockPricePort {
    fn fetch_closes(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<f64>, QuantError> {
        self.requests
            .borrow_mut()
            .push((ticker.to_string(), start, end));
        if let Some(reason) = self.errors.get(ticker) {
            return Err(QuantError::DataSource {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(ticker).cloned().unwrap_or_default())
    }

    fn list_tickers(&self) -> Result<Vec<String>, QuantError> {
        let mut tickers: Vec<String> = self.data.keys().cloned().collect();
        tickers.sort();
        Ok(tickers)
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Deterministic up-then-down series with some noise.
pub fn wave(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            let price = 100.0 + 10.0 * (t / 15.0).sin() + 0.3 * (t * 1.7).cos();
            (price * 100.0).round() / 100.0
        })
        .collect()
}

pub fn rising(n: usize) -> Vec<f64> {
    (0..n).map(|i| 100.0 + i as f64).collect()
}

pub fn atm(option_type: OptionType) -> OptionContract {
    OptionContract::new(100.0, 100.0, 1.0, 0.05, 0.2, option_type)
}

pub fn write_temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
