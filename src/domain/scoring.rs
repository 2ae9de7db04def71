//! Panic (price-shock) and growth (business-quality) scoring.
//!
//! Both scores are additive over independent rules. Missing inputs never
//! contribute and never fail.

use crate::domain::fundamentals::FundamentalsRecord;

pub const DEFAULT_GROWTH_SECTORS: &[&str] = &[
    "DEFENCE",
    "RAIL",
    "INFRA",
    "POWER",
    "RENEWABLE",
    "CAPITAL GOODS",
    "MANUFACTURING",
    "INSURANCE",
];

/// Sector keywords that earn the structural-growth point.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthSectors {
    keywords: Vec<String>,
}

impl GrowthSectors {
    /// Keywords are trimmed and uppercased; blanks are dropped.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_uppercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    pub fn matches(&self, sector: &str) -> bool {
        let sector = sector.to_uppercase();
        self.keywords.iter().any(|k| sector.contains(k.as_str()))
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

impl Default for GrowthSectors {
    fn default() -> Self {
        Self::new(DEFAULT_GROWTH_SECTORS)
    }
}

pub fn score_panic(down_streak: u32, drawdown_pct: f64, streak_threshold: u32) -> u32 {
    let mut score = 0;

    if down_streak >= streak_threshold {
        score += 2;
    } else if down_streak >= (streak_threshold / 2).max(3) {
        score += 1;
    }

    if drawdown_pct <= -20.0 {
        score += 2;
    } else if drawdown_pct <= -10.0 {
        score += 1;
    }

    score
}

pub fn score_growth(
    fundamentals: &FundamentalsRecord,
    is_fund_like: bool,
    sectors: &GrowthSectors,
) -> u32 {
    if is_fund_like {
        return 0;
    }

    let mut score = 0;

    match fundamentals.earnings_growth {
        Some(eg) if eg > 0.15 => score += 2,
        Some(eg) if eg > 0.05 => score += 1,
        _ => {}
    }

    if fundamentals.revenue_growth.is_some_and(|rg| rg > 0.10) {
        score += 1;
    }

    if fundamentals.return_on_equity.is_some_and(|roe| roe > 0.15) {
        score += 1;
    }

    // ratio (<= 1) and percentage (<= 100) readings share one bucket
    if fundamentals
        .debt_to_equity
        .is_some_and(|de| de >= 0.0 && (de <= 1.0 || de <= 100.0))
    {
        score += 1;
    }

    if fundamentals
        .sector
        .as_deref()
        .is_some_and(|s| sectors.matches(s))
    {
        score += 1;
    }

    score
}
