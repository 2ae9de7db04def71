//! CSV file data adapter.
//!
//! Directory layout:
//! - `prices/<TICKER>.csv` with at least `date` and `close` columns
//! - `fundamentals.csv` keyed by a `ticker` or `symbol` column
//!
//! Universe and holdings spreadsheets are read from CSV exports as well.

use crate::domain::error::OppscanError;
use crate::domain::fundamentals::RawFundamentals;
use crate::domain::holdings::Holding;
use crate::domain::price::{PricePoint, PriceSeries};
use crate::domain::universe::UniverseTable;
use crate::ports::data_port::MarketDataPort;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn prices_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join("prices").join(format!("{}.csv", ticker))
    }

    fn fundamentals_path(&self) -> PathBuf {
        self.base_path.join("fundamentals.csv")
    }
}

fn source_error(reason: String) -> OppscanError {
    OppscanError::DataSource { reason }
}

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time component.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let day = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

impl MarketDataPort for CsvAdapter {
    fn fetch_closes(&self, ticker: &str) -> Result<PriceSeries, OppscanError> {
        let path = self.prices_path(ticker);
        if !path.exists() {
            return Err(OppscanError::NoData {
                symbol: ticker.to_string(),
            });
        }

        let mut rdr = csv::Reader::from_path(&path)
            .map_err(|e| source_error(format!("failed to read {}: {}", path.display(), e)))?;
        let headers = rdr
            .headers()
            .map_err(|e| source_error(format!("CSV header error in {}: {}", path.display(), e)))?
            .clone();

        let date_col = find_column(&headers, &["date", "datetime"])
            .ok_or_else(|| source_error(format!("missing date column in {}", path.display())))?;
        let close_col = find_column(&headers, &["close"])
            .ok_or_else(|| source_error(format!("missing close column in {}", path.display())))?;

        let mut points = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| source_error(format!("CSV parse error: {}", e)))?;

            let close_str = record.get(close_col).unwrap_or("").trim();
            if close_str.is_empty() {
                continue;
            }

            let date_str = record.get(date_col).unwrap_or("");
            let date = parse_date(date_str)
                .ok_or_else(|| source_error(format!("invalid date '{}' for {}", date_str, ticker)))?;
            let close: f64 = close_str.parse().map_err(|e| {
                source_error(format!("invalid close '{}' for {}: {}", close_str, ticker, e))
            })?;

            points.push(PricePoint { date, close });
        }

        Ok(PriceSeries::new(points))
    }

    fn fetch_fundamentals(&self, ticker: &str) -> Result<RawFundamentals, OppscanError> {
        let path = self.fundamentals_path();
        if !path.exists() {
            return Ok(RawFundamentals::new());
        }

        let mut rdr = csv::Reader::from_path(&path)
            .map_err(|e| source_error(format!("failed to read {}: {}", path.display(), e)))?;
        let headers = rdr
            .headers()
            .map_err(|e| source_error(format!("CSV header error in {}: {}", path.display(), e)))?
            .clone();
        let key_col = find_column(&headers, &["ticker", "symbol"]).ok_or_else(|| {
            source_error(format!("missing ticker column in {}", path.display()))
        })?;

        let base = ticker.split('.').next().unwrap_or(ticker);
        let mut fallback = None;

        for result in rdr.records() {
            let record = result.map_err(|e| source_error(format!("CSV parse error: {}", e)))?;
            let key = record.get(key_col).unwrap_or("").trim();

            let to_map = || -> RawFundamentals {
                headers
                    .iter()
                    .zip(record.iter())
                    .enumerate()
                    .filter(|(i, _)| *i != key_col)
                    .map(|(_, (h, v))| (h.to_string(), v.to_string()))
                    .collect()
            };

            if key.eq_ignore_ascii_case(ticker) {
                return Ok(to_map());
            }
            if fallback.is_none() && key.eq_ignore_ascii_case(base) {
                fallback = Some(to_map());
            }
        }

        Ok(fallback.unwrap_or_default())
    }
}

/// Reads a universe export. Rows may be ragged.
pub fn read_universe(path: &Path) -> Result<UniverseTable, OppscanError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| source_error(format!("failed to read {}: {}", path.display(), e)))?;

    let headers = rdr
        .headers()
        .map_err(|e| source_error(format!("CSV header error in {}: {}", path.display(), e)))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| source_error(format!("CSV parse error: {}", e)))?;
        rows.push(record.iter().map(|c| c.to_string()).collect());
    }

    Ok(UniverseTable { headers, rows })
}

#[derive(Debug, Deserialize)]
struct HoldingRecord {
    #[serde(rename = "Symbol")]
    symbol: String,
    #[serde(rename = "Quantity Available", default)]
    quantity: String,
    #[serde(rename = "Average Price", default)]
    average_price: String,
}

fn lenient_number(value: &str) -> f64 {
    value
        .trim()
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Reads a broker holdings export. Non-numeric quantities and prices read as 0.
pub fn read_holdings(path: &Path) -> Result<Vec<Holding>, OppscanError> {
    let mut rdr = csv::Reader::from_path(path)
        .map_err(|e| source_error(format!("failed to read {}: {}", path.display(), e)))?;

    let mut holdings = Vec::new();
    for result in rdr.deserialize::<HoldingRecord>() {
        let record = result.map_err(|e| source_error(format!("holdings parse error: {}", e)))?;
        let symbol = record.symbol.trim().to_uppercase();
        if symbol.is_empty() {
            continue;
        }
        holdings.push(Holding {
            symbol,
            quantity: lenient_number(&record.quantity),
            average_price: lenient_number(&record.average_price),
        });
    }
    Ok(holdings)
}
