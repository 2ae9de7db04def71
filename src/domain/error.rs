//! Domain error types.
//!
//! Only collaborator boundaries fail hard. The scoring core treats missing
//! history and missing fundamentals as neutral input, never as an error.

use crate::domain::universe::UniverseError;

/// Top-level error type for oppscan.
#[derive(Debug, thiserror::Error)]
pub enum OppscanError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error(transparent)]
    Universe(#[from] UniverseError),

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error("mail error: {reason}")]
    Mail { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&OppscanError> for std::process::ExitCode {
    fn from(err: &OppscanError) -> Self {
        let code: u8 = match err {
            OppscanError::Io(_) | OppscanError::Report { .. } | OppscanError::Mail { .. } => 1,
            OppscanError::ConfigParse { .. }
            | OppscanError::ConfigMissing { .. }
            | OppscanError::ConfigInvalid { .. } => 2,
            OppscanError::DataSource { .. } => 3,
            OppscanError::Universe(_) => 4,
            OppscanError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
