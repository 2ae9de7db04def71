//! Alert conditions and severity ordering.
//!
//! Unlike classification, every matching rule contributes an alert. The
//! severity rank only orders the alert table; it never decides which
//! symbols get flagged.

use std::cmp::Ordering;
use std::fmt;

use crate::domain::indicator::{Indicators, Trend};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertThresholds {
    pub streak_days: u32,
    /// Positive magnitude; a drawdown alert fires at `-drawdown_pct` or below.
    pub drawdown_pct: f64,
    pub runup_pct: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            streak_days: 7,
            drawdown_pct: 8.0,
            runup_pct: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Alert {
    DownStreak(u32),
    UpStreak(u32),
    Drawdown(f64),
    Runup(f64),
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alert::DownStreak(days) => write!(f, "Down {} days", days),
            Alert::UpStreak(days) => write!(f, "Up {} days", days),
            Alert::Drawdown(pct) => write!(f, "Drawdown {:.1}%", pct),
            Alert::Runup(pct) => write!(f, "Run-up {:.1}%", pct),
        }
    }
}

/// Alerts in rule order; empty means nothing to flag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertSet {
    alerts: Vec<Alert>,
}

impl AlertSet {
    pub fn evaluate(indicators: &Indicators, thresholds: &AlertThresholds) -> Self {
        let mut alerts = Vec::new();

        if indicators.down_streak >= thresholds.streak_days {
            alerts.push(Alert::DownStreak(indicators.down_streak));
        }
        if indicators.up_streak >= thresholds.streak_days {
            alerts.push(Alert::UpStreak(indicators.up_streak));
        }
        if indicators.trend == Trend::Down && indicators.drawdown_pct <= -thresholds.drawdown_pct {
            alerts.push(Alert::Drawdown(indicators.drawdown_pct));
        }
        if indicators.trend == Trend::Up && indicators.runup_pct >= thresholds.runup_pct {
            alerts.push(Alert::Runup(indicators.runup_pct));
        }

        Self { alerts }
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn messages(&self) -> Vec<String> {
        self.alerts.iter().map(|a| a.to_string()).collect()
    }
}

impl fmt::Display for AlertSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join("; "))
    }
}

pub fn severity_rank(indicators: &Indicators, thresholds: &AlertThresholds) -> u32 {
    let mut rank = 0;
    if indicators.trend == Trend::Down {
        rank += 2;
    }
    if indicators.drawdown_pct <= -thresholds.drawdown_pct {
        rank += 2;
    }
    if indicators.down_streak >= thresholds.streak_days {
        rank += 1;
    }
    rank
}

/// Alert-table order: severity desc, drawdown asc (deepest first), down-streak desc.
pub fn compare_alert_rows(
    a_severity: u32,
    a: &Indicators,
    b_severity: u32,
    b: &Indicators,
) -> Ordering {
    b_severity
        .cmp(&a_severity)
        .then_with(|| a.drawdown_pct.total_cmp(&b.drawdown_pct))
        .then_with(|| b.down_streak.cmp(&a.down_streak))
}
