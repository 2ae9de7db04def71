//! Holdings P&L: previous close vs latest close, per position.

use crate::domain::screen::resolve_ticker;
use crate::ports::data_port::MarketDataPort;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq)]
pub struct Holding {
    pub symbol: String,
    pub quantity: f64,
    pub average_price: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HoldingRow {
    pub symbol: String,
    pub quantity: f64,
    pub average_price: f64,
    pub ticker: Option<String>,
    pub previous_close: Option<f64>,
    pub today_price: Option<f64>,
    pub todays_profit_per_share: Option<f64>,
    pub total_profit_per_share: Option<f64>,
    pub todays_profit: Option<f64>,
    pub total_profit: Option<f64>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl HoldingRow {
    pub fn unpriced(holding: &Holding) -> Self {
        Self {
            symbol: holding.symbol.clone(),
            quantity: holding.quantity,
            average_price: round2(holding.average_price),
            ticker: None,
            previous_close: None,
            today_price: None,
            todays_profit_per_share: None,
            total_profit_per_share: None,
            todays_profit: None,
            total_profit: None,
        }
    }

    pub fn priced(holding: &Holding, ticker: &str, previous_close: f64, today_price: f64) -> Self {
        let day_per_share = today_price - previous_close;
        let total_per_share = today_price - holding.average_price;
        Self {
            ticker: Some(ticker.to_string()),
            previous_close: Some(round2(previous_close)),
            today_price: Some(round2(today_price)),
            todays_profit_per_share: Some(round2(day_per_share)),
            total_profit_per_share: Some(round2(total_per_share)),
            todays_profit: Some(round2(day_per_share * holding.quantity)),
            total_profit: Some(round2(total_per_share * holding.quantity)),
            ..Self::unpriced(holding)
        }
    }
}

pub fn price_holdings(
    port: &dyn MarketDataPort,
    holdings: &[Holding],
    exchange_suffixes: &[String],
) -> Vec<HoldingRow> {
    holdings
        .iter()
        .map(|holding| {
            let resolved = resolve_ticker(port, &holding.symbol, exchange_suffixes, 1);
            let quote = resolved.and_then(|(ticker, series)| {
                Some((ticker, series.previous_close()?, series.last_close()?))
            });
            match quote {
                Some((ticker, prev, today)) => HoldingRow::priced(holding, &ticker, prev, today),
                None => {
                    tracing::warn!(symbol = %holding.symbol, "no price history for holding");
                    HoldingRow::unpriced(holding)
                }
            }
        })
        .collect()
}

/// Unpriced rows sort after every priced row in both directions.
fn by_todays_profit(a: &HoldingRow, b: &HoldingRow, descending: bool) -> Ordering {
    match (a.todays_profit, b.todays_profit) {
        (Some(x), Some(y)) if descending => y.total_cmp(&x),
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn top_losers(rows: &[HoldingRow], n: usize) -> Vec<&HoldingRow> {
    let mut sorted: Vec<&HoldingRow> = rows.iter().collect();
    sorted.sort_by(|a, b| by_todays_profit(a, b, false));
    sorted.truncate(n);
    sorted
}

pub fn top_gainers(rows: &[HoldingRow], n: usize) -> Vec<&HoldingRow> {
    let mut sorted: Vec<&HoldingRow> = rows.iter().collect();
    sorted.sort_by(|a, b| by_todays_profit(a, b, true));
    sorted.truncate(n);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn holding(symbol: &str, quantity: f64, average_price: f64) -> Holding {
        Holding {
            symbol: symbol.into(),
            quantity,
            average_price,
        }
    }

    #[test]
    fn priced_row_profit() {
        let row = HoldingRow::priced(&holding("TCS", 10.0, 3000.0), "TCS.NS", 3500.0, 3512.5);

        assert_eq!(row.ticker.as_deref(), Some("TCS.NS"));
        assert_relative_eq!(row.todays_profit_per_share.unwrap(), 12.5);
        assert_relative_eq!(row.todays_profit.unwrap(), 125.0);
        assert_relative_eq!(row.total_profit_per_share.unwrap(), 512.5);
        assert_relative_eq!(row.total_profit.unwrap(), 5125.0);
    }

    #[test]
    fn priced_row_rounds_to_cents() {
        let row = HoldingRow::priced(&holding("INFY", 3.0, 1000.0), "INFY.NS", 1500.0, 1500.0 + 1.0 / 3.0);
        assert_relative_eq!(row.todays_profit_per_share.unwrap(), 0.33);
        assert_relative_eq!(row.todays_profit.unwrap(), 1.0);
    }

    #[test]
    fn unpriced_row_is_empty() {
        let row = HoldingRow::unpriced(&holding("XYZ", 5.0, 10.0));
        assert!(row.ticker.is_none());
        assert!(row.todays_profit.is_none());
    }

    #[test]
    fn losers_and_gainers_order() {
        let rows = vec![
            HoldingRow::priced(&holding("A", 1.0, 100.0), "A.NS", 100.0, 90.0),
            HoldingRow::priced(&holding("B", 1.0, 100.0), "B.NS", 100.0, 120.0),
            HoldingRow::unpriced(&holding("C", 1.0, 100.0)),
            HoldingRow::priced(&holding("D", 1.0, 100.0), "D.NS", 100.0, 101.0),
        ];

        let losers: Vec<&str> = top_losers(&rows, 3).iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(losers, vec!["A", "D", "B"]);

        let gainers: Vec<&str> = top_gainers(&rows, 2).iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(gainers, vec!["B", "D"]);
    }
}
