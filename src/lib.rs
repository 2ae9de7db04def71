//! oppscan: rule-based equity opportunity screener.
//!
//! Hexagonal architecture: scoring logic in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
