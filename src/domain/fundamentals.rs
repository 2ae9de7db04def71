//! Fundamentals normalization.
//!
//! Market-data sources hand back loosely-typed key/value records with
//! inconsistent key spelling and frequently missing values. This module maps
//! them onto the handful of fields the growth scorer reads. Anything absent,
//! blank, or non-numeric becomes `None`.

use std::collections::HashMap;

/// Raw key/value fundamentals as delivered by a data source.
pub type RawFundamentals = HashMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FundamentalsRecord {
    pub sector: Option<String>,
    pub return_on_equity: Option<f64>,
    pub earnings_growth: Option<f64>,
    pub revenue_growth: Option<f64>,
    /// Either a ratio (0.5) or a percentage (50); sources disagree.
    pub debt_to_equity: Option<f64>,
    pub quote_type: Option<String>,
}

const SECTOR_KEYS: &[&str] = &["sector"];
const ROE_KEYS: &[&str] = &["returnonequity", "roe"];
const EARNINGS_KEYS: &[&str] = &["earningsgrowth", "epsgrowth"];
const REVENUE_KEYS: &[&str] = &["revenuegrowth", "salesgrowth"];
const DEBT_KEYS: &[&str] = &["debttoequity", "de"];
const QUOTE_TYPE_KEYS: &[&str] = &["quotetype"];

/// Lowercase and drop everything but ASCII letters and digits.
fn canonical_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl FundamentalsRecord {
    pub fn from_raw(raw: &RawFundamentals) -> Self {
        let canonical: HashMap<String, &str> = raw
            .iter()
            .map(|(k, v)| (canonical_key(k), v.as_str()))
            .collect();

        let lookup = |keys: &[&str]| keys.iter().find_map(|k| canonical.get(*k).copied());
        let number = |keys: &[&str]| lookup(keys).and_then(parse_number);
        let text = |keys: &[&str]| lookup(keys).and_then(parse_text);

        Self {
            sector: text(SECTOR_KEYS),
            return_on_equity: number(ROE_KEYS),
            earnings_growth: number(EARNINGS_KEYS),
            revenue_growth: number(REVENUE_KEYS),
            debt_to_equity: number(DEBT_KEYS),
            quote_type: text(QUOTE_TYPE_KEYS),
        }
    }
}

/// Symbols whose price follows a basket rather than one business.
#[derive(Debug, Clone, PartialEq)]
pub struct FundRules {
    pub suffixes: Vec<String>,
    pub symbols: Vec<String>,
}

impl Default for FundRules {
    fn default() -> Self {
        Self {
            suffixes: vec!["BEES".to_string()],
            symbols: vec!["MON100".to_string(), "MASPTOP50".to_string()],
        }
    }
}

impl FundRules {
    pub fn is_fund_like(&self, symbol: &str, fundamentals: &FundamentalsRecord) -> bool {
        let quote_is_etf = fundamentals
            .quote_type
            .as_deref()
            .is_some_and(|qt| qt.to_uppercase().contains("ETF"));
        if quote_is_etf {
            return true;
        }

        let symbol = symbol.to_uppercase();
        self.suffixes
            .iter()
            .any(|s| !s.is_empty() && symbol.ends_with(s.as_str()))
            || self.symbols.iter().any(|s| *s == symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> RawFundamentals {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn from_raw_reads_camel_case_keys() {
        let record = FundamentalsRecord::from_raw(&raw(&[
            ("sector", "Industrials"),
            ("returnOnEquity", "0.18"),
            ("earningsGrowth", "0.2"),
            ("revenueGrowth", "0.12"),
            ("debtToEquity", "45.3"),
            ("quoteType", "EQUITY"),
        ]));

        assert_eq!(record.sector.as_deref(), Some("Industrials"));
        assert_eq!(record.return_on_equity, Some(0.18));
        assert_eq!(record.earnings_growth, Some(0.2));
        assert_eq!(record.revenue_growth, Some(0.12));
        assert_eq!(record.debt_to_equity, Some(45.3));
        assert_eq!(record.quote_type.as_deref(), Some("EQUITY"));
    }

    #[test]
    fn from_raw_accepts_snake_case_and_aliases() {
        let record = FundamentalsRecord::from_raw(&raw(&[
            ("Return_On_Equity", "0.1"),
            ("Debt to Equity", "0.7"),
        ]));
        assert_eq!(record.return_on_equity, Some(0.1));
        assert_eq!(record.debt_to_equity, Some(0.7));

        let record = FundamentalsRecord::from_raw(&raw(&[("ROE", "0.3")]));
        assert_eq!(record.return_on_equity, Some(0.3));
    }

    #[test]
    fn blank_and_garbage_values_are_absent() {
        let record = FundamentalsRecord::from_raw(&raw(&[
            ("sector", "   "),
            ("returnOnEquity", ""),
            ("earningsGrowth", "n/a"),
            ("revenueGrowth", "NaN"),
            ("debtToEquity", "inf"),
        ]));
        assert_eq!(record, FundamentalsRecord::default());
    }

    #[test]
    fn empty_raw_is_all_absent() {
        let record = FundamentalsRecord::from_raw(&RawFundamentals::new());
        assert_eq!(record, FundamentalsRecord::default());
    }

    #[test]
    fn etf_quote_type_is_fund_like() {
        let rules = FundRules::default();
        let record = FundamentalsRecord {
            quote_type: Some("etf".into()),
            ..Default::default()
        };
        assert!(rules.is_fund_like("NIFTYIETF", &record));
    }

    #[test]
    fn fund_suffix_and_list() {
        let rules = FundRules::default();
        let none = FundamentalsRecord::default();
        assert!(rules.is_fund_like("GOLDBEES", &none));
        assert!(rules.is_fund_like("mon100", &none));
        assert!(rules.is_fund_like("MASPTOP50", &none));
        assert!(!rules.is_fund_like("HDFCBANK", &none));
    }

    #[test]
    fn empty_suffix_matches_nothing() {
        let rules = FundRules {
            suffixes: vec![String::new()],
            symbols: vec![],
        };
        assert!(!rules.is_fund_like("TCS", &FundamentalsRecord::default()));
    }
}
