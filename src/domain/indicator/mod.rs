//! Technical indicators derived from a closing-price sequence.
//!
//! - `streak`: trailing down/up runs
//! - `excursion`: drawdown and run-up within a lookback window
//! - `ema` / `trend`: fast/slow span EWM cross direction
//!
//! Every function is total: too little history yields zero or `NotAvailable`.

pub mod ema;
pub mod excursion;
pub mod streak;
pub mod trend;

pub use trend::Trend;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Indicators {
    pub down_streak: u32,
    pub up_streak: u32,
    pub drawdown_pct: f64,
    pub runup_pct: f64,
    pub trend: Trend,
}

impl Indicators {
    pub fn compute(closes: &[f64], lookback: usize) -> Self {
        let (up_streak, down_streak) = streak::up_down_streak(closes);
        Self {
            down_streak,
            up_streak,
            drawdown_pct: excursion::drawdown_pct(closes, lookback),
            runup_pct: excursion::runup_pct(closes, lookback),
            trend: Trend::from_closes(closes),
        }
    }
}

impl Default for Indicators {
    fn default() -> Self {
        Self {
            down_streak: 0,
            up_streak: 0,
            drawdown_pct: 0.0,
            runup_pct: 0.0,
            trend: Trend::NotAvailable,
        }
    }
}
