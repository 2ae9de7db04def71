//! Core domain types and logic.

pub mod price;
pub mod indicator;
pub mod fundamentals;
pub mod scoring;
pub mod classify;
pub mod alert;
pub mod symbol;
pub mod universe;
pub mod screen;
pub mod holdings;
pub mod config_validation;
pub mod error;
