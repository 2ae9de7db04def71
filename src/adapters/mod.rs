//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod file_config_adapter;
pub mod html_report_adapter;
#[cfg(feature = "mail")]
pub mod mail_adapter;
