//! Per-symbol screening pipeline and the aggregated report.
//!
//! Resolution and fetching go through [`MarketDataPort`]; everything after
//! that is pure. A symbol that cannot be resolved is excluded and listed as
//! unresolved, never scored.

use crate::domain::alert::{compare_alert_rows, severity_rank, AlertSet, AlertThresholds};
use crate::domain::classify::{Action, ScoreResult};
use crate::domain::fundamentals::{FundRules, FundamentalsRecord};
use crate::domain::indicator::trend::MIN_TREND_POINTS;
use crate::domain::indicator::Indicators;
use crate::domain::price::PriceSeries;
use crate::domain::scoring::{score_growth, score_panic, GrowthSectors};
use crate::domain::symbol::{ticker_candidates, DEFAULT_EXCHANGE_SUFFIXES};
use crate::ports::data_port::MarketDataPort;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenSettings {
    /// Drawdown/run-up window in closes; 0 means the whole series.
    pub lookback: usize,
    pub thresholds: AlertThresholds,
    pub growth_sectors: GrowthSectors,
    pub fund_rules: FundRules,
    pub exchange_suffixes: Vec<String>,
    pub top_n: usize,
}

impl Default for ScreenSettings {
    fn default() -> Self {
        Self {
            lookback: 120,
            thresholds: AlertThresholds::default(),
            growth_sectors: GrowthSectors::default(),
            fund_rules: FundRules::default(),
            exchange_suffixes: DEFAULT_EXCHANGE_SUFFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            top_n: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenRow {
    pub symbol: String,
    pub ticker: String,
    pub fund_like: bool,
    pub indicators: Indicators,
    pub score: ScoreResult,
    pub alerts: AlertSet,
    pub severity: u32,
}

pub fn screen_symbol(
    symbol: &str,
    ticker: &str,
    closes: &[f64],
    fundamentals: &FundamentalsRecord,
    settings: &ScreenSettings,
) -> ScreenRow {
    let indicators = Indicators::compute(closes, settings.lookback);
    let fund_like = settings.fund_rules.is_fund_like(symbol, fundamentals);

    let panic = score_panic(
        indicators.down_streak,
        indicators.drawdown_pct,
        settings.thresholds.streak_days,
    );
    let growth = score_growth(fundamentals, fund_like, &settings.growth_sectors);

    ScreenRow {
        symbol: symbol.to_string(),
        ticker: ticker.to_string(),
        fund_like,
        indicators,
        score: ScoreResult::new(panic, growth),
        alerts: AlertSet::evaluate(&indicators, &settings.thresholds),
        severity: severity_rank(&indicators, &settings.thresholds),
    }
}

/// First candidate ticker with at least `min_points` closes.
pub fn resolve_ticker(
    port: &dyn MarketDataPort,
    symbol: &str,
    exchange_suffixes: &[String],
    min_points: usize,
) -> Option<(String, PriceSeries)> {
    for ticker in ticker_candidates(symbol, exchange_suffixes) {
        match port.fetch_closes(&ticker) {
            Ok(series) if series.len() >= min_points => return Some((ticker, series)),
            Ok(series) => {
                tracing::debug!(%ticker, closes = series.len(), minimum = min_points, "too little history");
            }
            Err(e) => {
                tracing::debug!(%ticker, error = %e, "candidate rejected");
            }
        }
    }
    None
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenReport {
    pub rows: Vec<ScreenRow>,
    pub unresolved: Vec<String>,
    pub universe_size: usize,
}

impl ScreenReport {
    pub fn processed(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows for one action, strongest first: panic desc, growth desc,
    /// deepest drawdown first, then symbol. At most `top_n` rows.
    pub fn bucket(&self, action: Action, top_n: usize) -> Vec<&ScreenRow> {
        let mut rows: Vec<&ScreenRow> = self
            .rows
            .iter()
            .filter(|r| r.score.action == action)
            .collect();
        rows.sort_by(|a, b| compare_bucket_rows(a, b));
        rows.truncate(top_n);
        rows
    }

    /// Rows with at least one alert, most severe first.
    pub fn alert_rows(&self) -> Vec<&ScreenRow> {
        let mut rows: Vec<&ScreenRow> = self.rows.iter().filter(|r| !r.alerts.is_empty()).collect();
        rows.sort_by(|a, b| {
            compare_alert_rows(a.severity, &a.indicators, b.severity, &b.indicators)
                .then_with(|| a.symbol.cmp(&b.symbol))
        });
        rows
    }
}

fn compare_bucket_rows(a: &ScreenRow, b: &ScreenRow) -> Ordering {
    b.score
        .panic_score
        .cmp(&a.score.panic_score)
        .then_with(|| b.score.growth_score.cmp(&a.score.growth_score))
        .then_with(|| a.indicators.drawdown_pct.total_cmp(&b.indicators.drawdown_pct))
        .then_with(|| a.symbol.cmp(&b.symbol))
}

/// Resolves, fetches and screens every symbol in `symbols`.
pub fn run_screen(
    port: &dyn MarketDataPort,
    symbols: &[String],
    settings: &ScreenSettings,
) -> ScreenReport {
    let mut rows = Vec::with_capacity(symbols.len());
    let mut unresolved = Vec::new();

    for symbol in symbols {
        let Some((ticker, series)) =
            resolve_ticker(port, symbol, &settings.exchange_suffixes, MIN_TREND_POINTS)
        else {
            tracing::warn!(%symbol, "unresolved, skipping");
            unresolved.push(symbol.clone());
            continue;
        };

        let fundamentals = match port.fetch_fundamentals(&ticker) {
            Ok(raw) => FundamentalsRecord::from_raw(&raw),
            Err(e) => {
                tracing::warn!(%ticker, error = %e, "fundamentals unavailable");
                FundamentalsRecord::default()
            }
        };

        let row = screen_symbol(symbol, &ticker, &series.closes(), &fundamentals, settings);
        tracing::debug!(
            %symbol,
            %ticker,
            panic = row.score.panic_score,
            growth = row.score.growth_score,
            action = %row.score.action,
            "screened"
        );
        rows.push(row);
    }

    tracing::info!(
        processed = rows.len(),
        universe = symbols.len(),
        unresolved = unresolved.len(),
        "screen complete"
    );

    ScreenReport {
        rows,
        unresolved,
        universe_size: symbols.len(),
    }
}
