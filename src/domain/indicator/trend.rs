//! Short-term trend from a fast/slow exponentially weighted average cross.

use std::fmt;

use crate::domain::indicator::ema::latest_ewm;

pub const FAST_SPAN: usize = 5;
pub const SLOW_SPAN: usize = 10;

/// Below this many closes the cross is too noisy to report.
pub const MIN_TREND_POINTS: usize = 15;

const FLAT_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trend {
    Up,
    Down,
    Flat,
    NotAvailable,
}

impl Trend {
    pub fn from_closes(closes: &[f64]) -> Self {
        if closes.len() < MIN_TREND_POINTS {
            return Trend::NotAvailable;
        }
        let (Some(fast), Some(slow)) = (latest_ewm(closes, FAST_SPAN), latest_ewm(closes, SLOW_SPAN))
        else {
            return Trend::NotAvailable;
        };

        // relative tolerance so a constant series reads as flat
        let diff = fast - slow;
        if diff.abs() <= FLAT_TOLERANCE * slow.abs().max(1.0) {
            Trend::Flat
        } else if diff > 0.0 {
            Trend::Up
        } else {
            Trend::Down
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Up => write!(f, "UP"),
            Trend::Down => write!(f, "DOWN"),
            Trend::Flat => write!(f, "FLAT"),
            Trend::NotAvailable => write!(f, "NA"),
        }
    }
}
