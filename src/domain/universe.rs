//! Universe selection.
//!
//! Picks the symbol column out of a loosely formatted spreadsheet export,
//! normalizes every entry and removes duplicates, or parses an explicit
//! comma-separated symbol list.

use crate::domain::symbol::{normalize_symbol, SymbolAliases};
use std::collections::HashSet;

/// Header names tried in order, compared trimmed and lowercased.
pub const PREFERRED_COLUMNS: &[&str] = &["symbol", "stock", "stock name", "name", "ticker"];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in symbol list")]
    EmptyToken,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),

    #[error("no valid symbols found in universe")]
    NoSymbols,
}

/// Tabular universe as read from disk: headers plus raw cell text.
#[derive(Debug, Clone, Default)]
pub struct UniverseTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl UniverseTable {
    fn column_is_empty(&self, index: usize) -> bool {
        self.rows
            .iter()
            .all(|row| row.get(index).is_none_or(|cell| cell.trim().is_empty()))
    }

    /// Index of the symbol column, ignoring columns with no values at all.
    /// Falls back to the first non-empty column.
    pub fn symbol_column(&self) -> Option<usize> {
        let populated: Vec<usize> = (0..self.headers.len())
            .filter(|&i| !self.column_is_empty(i))
            .collect();

        for name in PREFERRED_COLUMNS {
            let found = populated
                .iter()
                .copied()
                .find(|&i| self.headers[i].trim().to_lowercase() == *name);
            if found.is_some() {
                return found;
            }
        }

        let fallback = populated.first().copied();
        if let Some(i) = fallback {
            tracing::info!(column = %self.headers[i], "using first column as universe symbols");
        }
        fallback
    }

    /// Normalized, de-duplicated symbols in file order.
    pub fn symbols(&self, aliases: &SymbolAliases) -> Result<Vec<String>, UniverseError> {
        let column = self.symbol_column().ok_or(UniverseError::NoSymbols)?;
        let mut seen = HashSet::new();
        let mut symbols = Vec::new();

        for row in &self.rows {
            let Some(cell) = row.get(column) else {
                continue;
            };
            if cell.trim().is_empty() {
                continue;
            }
            let symbol = normalize_symbol(cell, aliases);
            if symbol.is_empty() || symbol == "NAN" {
                continue;
            }
            if seen.insert(symbol.clone()) {
                symbols.push(symbol);
            }
        }

        if symbols.is_empty() {
            return Err(UniverseError::NoSymbols);
        }
        Ok(symbols)
    }
}

/// Strict comma list: blank tokens and repeats are errors.
pub fn parse_symbols(input: &str, aliases: &SymbolAliases) -> Result<Vec<String>, UniverseError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let symbol = normalize_symbol(trimmed, aliases);
        if !seen.insert(symbol.clone()) {
            return Err(UniverseError::DuplicateSymbol(symbol));
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}
