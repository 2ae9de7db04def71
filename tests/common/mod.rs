#![allow(dead_code)]

use chrono::{Days, NaiveDate};
use oppscan::domain::error::OppscanError;
use oppscan::domain::fundamentals::RawFundamentals;
use oppscan::domain::price::{PricePoint, PriceSeries};
use oppscan::ports::data_port::MarketDataPort;
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory market data keyed by ticker. Records every ticker requested.
pub struct MockDataPort {
    pub closes: HashMap<String, Vec<f64>>,
    pub fundamentals: HashMap<String, RawFundamentals>,
    pub errors: HashMap<String, String>,
    pub fundamentals_errors: HashMap<String, String>,
    pub requested: RefCell<Vec<String>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            closes: HashMap::new(),
            fundamentals: HashMap::new(),
            errors: HashMap::new(),
            fundamentals_errors: HashMap::new(),
            requested: RefCell::new(Vec::new()),
        }
    }

    pub fn with_closes(mut self, ticker: &str, closes: Vec<f64>) -> Self {
        self.closes.insert(ticker.to_string(), closes);
        self
    }

    pub fn with_fundamentals(mut self, ticker: &str, fields: &[(&str, &str)]) -> Self {
        let raw = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.fundamentals.insert(ticker.to_string(), raw);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }

    pub fn with_fundamentals_error(mut self, ticker: &str, reason: &str) -> Self {
        self.fundamentals_errors
            .insert(ticker.to_string(), reason.to_string());
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl MarketDataPort for MockDataPort {
    fn fetch_closes(&self, ticker: &str) -> Result<PriceSeries, OppscanError> {
        self.requested.borrow_mut().push(ticker.to_string());
        if let Some(reason) = self.errors.get(ticker) {
            return Err(OppscanError::DataSource {
                reason: reason.clone(),
            });
        }
        match self.closes.get(ticker) {
            Some(closes) => Ok(series(closes)),
            None => Err(OppscanError::NoData {
                symbol: ticker.to_string(),
            }),
        }
    }

    fn fetch_fundamentals(&self, ticker: &str) -> Result<RawFundamentals, OppscanError> {
        if let Some(reason) = self.fundamentals_errors.get(ticker) {
            return Err(OppscanError::DataSource {
                reason: reason.clone(),
            });
        }
        Ok(self.fundamentals.get(ticker).cloned().unwrap_or_default())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Consecutive calendar days starting 2024-01-01.
pub fn series(closes: &[f64]) -> PriceSeries {
    let start = date(2024, 1, 1);
    PriceSeries::new(
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                date: start.checked_add_days(Days::new(i as u64)).unwrap(),
                close,
            })
            .collect(),
    )
}

/// Flat history followed by `down_days` consecutive falling closes.
pub fn falling_tail(flat_days: usize, start: f64, down_days: usize, step: f64) -> Vec<f64> {
    let mut closes = vec![start; flat_days];
    for i in 1..=down_days {
        closes.push(start - step * i as f64);
    }
    closes
}

/// Steadily rising closes.
pub fn rising(len: usize, start: f64, step: f64) -> Vec<f64> {
    (0..len).map(|i| start + step * i as f64).collect()
}

pub fn strong_fundamentals() -> Vec<(&'static str, &'static str)> {
    vec![
        ("sector", "Defence"),
        ("returnOnEquity", "0.18"),
        ("earningsGrowth", "0.20"),
        ("revenueGrowth", "0.12"),
        ("debtToEquity", "0.5"),
    ]
}
