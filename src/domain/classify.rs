//! Action classification from the panic and growth scores.
//!
//! An ordered decision list; the first matching rule wins, so the combined
//! STRONG rule must precede the single-factor rules.

use std::fmt;

pub const PANIC_MIN: u32 = 2;
pub const GROWTH_MIN: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    StrongAdd,
    PanicAdd,
    GrowthAdd,
    Wait,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::StrongAdd,
        Action::PanicAdd,
        Action::GrowthAdd,
        Action::Wait,
    ];

    /// Suggested share of fresh capital for this bucket.
    pub fn allocation_range(self) -> &'static str {
        match self {
            Action::StrongAdd => "30–40%",
            Action::PanicAdd | Action::GrowthAdd => "20–30%",
            Action::Wait => "0–10%",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Action::StrongAdd => "Panic + Growth",
            Action::PanicAdd => "Price-led",
            Action::GrowthAdd => "Future-led",
            Action::Wait => "For awareness",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::StrongAdd => write!(f, "STRONG ADD"),
            Action::PanicAdd => write!(f, "PANIC ADD"),
            Action::GrowthAdd => write!(f, "GROWTH ADD"),
            Action::Wait => write!(f, "WAIT"),
        }
    }
}

type Predicate = fn(u32, u32) -> bool;

fn panic_and_growth(panic: u32, growth: u32) -> bool {
    panic >= PANIC_MIN && growth >= GROWTH_MIN
}

fn panic_only(panic: u32, _growth: u32) -> bool {
    panic >= PANIC_MIN
}

fn growth_only(_panic: u32, growth: u32) -> bool {
    growth >= GROWTH_MIN
}

const DECISION_LIST: [(Predicate, Action); 3] = [
    (panic_and_growth, Action::StrongAdd),
    (panic_only, Action::PanicAdd),
    (growth_only, Action::GrowthAdd),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreResult {
    pub panic_score: u32,
    pub growth_score: u32,
    pub action: Action,
}

impl ScoreResult {
    pub fn new(panic_score: u32, growth_score: u32) -> Self {
        Self {
            panic_score,
            growth_score,
            action: classify(panic_score, growth_score),
        }
    }

    pub fn allocation_range(&self) -> &'static str {
        self.action.allocation_range()
    }
}

pub fn classify(panic_score: u32, growth_score: u32) -> Action {
    DECISION_LIST
        .iter()
        .find(|(matches, _)| matches(panic_score, growth_score))
        .map(|&(_, action)| action)
        .unwrap_or(Action::Wait)
}
