//! Symbol normalization and exchange-ticker candidates.

use std::collections::HashMap;

const SERIES_SUFFIXES: &[&str] = &["-EQ", "-BE", "-BZ", "-BL", "-SM"];
const EXCHANGE_PREFIXES: &[&str] = &["NSE:", "BSE:"];

pub const DEFAULT_EXCHANGE_SUFFIXES: &[&str] = &[".NS", ".BO"];

/// Common misspellings mapped to the listed symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolAliases {
    map: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid alias entry '{0}', expected FROM=TO")]
pub struct AliasParseError(pub String);

impl SymbolAliases {
    pub fn empty() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Parses `FROM=TO,FROM=TO`. Blank entries are skipped.
    pub fn parse(input: &str) -> Result<Self, AliasParseError> {
        let mut map = HashMap::new();
        for entry in input.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let (from, to) = entry
                .split_once('=')
                .ok_or_else(|| AliasParseError(entry.to_string()))?;
            let (from, to) = (from.trim().to_uppercase(), to.trim().to_uppercase());
            if from.is_empty() || to.is_empty() {
                return Err(AliasParseError(entry.to_string()));
            }
            map.insert(from, to);
        }
        Ok(Self { map })
    }

    pub fn resolve<'a>(&'a self, symbol: &'a str) -> &'a str {
        self.map.get(symbol).map(String::as_str).unwrap_or(symbol)
    }
}

impl Default for SymbolAliases {
    fn default() -> Self {
        let map = [("SILVERBEE", "SILVERBEES"), ("GOLDBEE", "GOLDBEES")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self { map }
    }
}

/// Uppercase, strip broker series suffixes and exchange prefixes, drop
/// spaces, then apply aliases.
pub fn normalize_symbol(raw: &str, aliases: &SymbolAliases) -> String {
    let mut s = raw.trim().to_uppercase();

    for suffix in SERIES_SUFFIXES {
        if let Some(stripped) = s.strip_suffix(suffix) {
            s = stripped.to_string();
        }
    }
    for prefix in EXCHANGE_PREFIXES {
        if let Some(stripped) = s.strip_prefix(prefix) {
            s = stripped.to_string();
        }
    }

    s.retain(|c| c != ' ');
    aliases.resolve(&s).to_string()
}

/// Tickers to try, in order. A symbol already carrying an exchange suffix
/// is tried as-is first.
pub fn ticker_candidates(symbol: &str, exchange_suffixes: &[String]) -> Vec<String> {
    let existing = exchange_suffixes
        .iter()
        .find(|suffix| !suffix.is_empty() && symbol.ends_with(suffix.as_str()));

    let mut candidates = Vec::new();
    let base = match existing {
        Some(suffix) => {
            candidates.push(symbol.to_string());
            &symbol[..symbol.len() - suffix.len()]
        }
        None => symbol,
    };

    for suffix in exchange_suffixes {
        let ticker = format!("{}{}", base, suffix);
        if !candidates.contains(&ticker) {
            candidates.push(ticker);
        }
    }
    candidates
}
