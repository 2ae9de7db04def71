//! Configuration validation.
//!
//! Validates screening and data config fields before any data is fetched.

use crate::domain::error::OppscanError;
use crate::domain::symbol::SymbolAliases;
use crate::ports::config_port::ConfigPort;

pub fn validate_screen_config(config: &dyn ConfigPort) -> Result<(), OppscanError> {
    validate_streak_days(config)?;
    validate_lookback(config)?;
    validate_top_n(config)?;
    validate_alert_thresholds(config)?;
    validate_aliases(config)?;
    validate_exchange_suffixes(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), OppscanError> {
    match config.get_string("data", "dir") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(OppscanError::ConfigMissing {
            section: "data".to_string(),
            key: "dir".to_string(),
        }),
    }
}

fn validate_streak_days(config: &dyn ConfigPort) -> Result<(), OppscanError> {
    let value = config.get_int("screen", "streak_days", 7);
    if value < 1 {
        return Err(OppscanError::ConfigInvalid {
            section: "screen".to_string(),
            key: "streak_days".to_string(),
            reason: "streak_days must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn validate_lookback(config: &dyn ConfigPort) -> Result<(), OppscanError> {
    let value = config.get_int("screen", "lookback", 120);
    if value < 0 {
        return Err(OppscanError::ConfigInvalid {
            section: "screen".to_string(),
            key: "lookback".to_string(),
            reason: "lookback must be non-negative (0 = whole history)".to_string(),
        });
    }
    Ok(())
}

fn validate_top_n(config: &dyn ConfigPort) -> Result<(), OppscanError> {
    let value = config.get_int("screen", "top_n", 10);
    if value < 1 {
        return Err(OppscanError::ConfigInvalid {
            section: "screen".to_string(),
            key: "top_n".to_string(),
            reason: "top_n must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn validate_alert_thresholds(config: &dyn ConfigPort) -> Result<(), OppscanError> {
    for (key, default) in [("drawdown_pct", 8.0), ("runup_pct", 10.0)] {
        let value = config.get_double("alerts", key, default);
        if value <= 0.0 {
            return Err(OppscanError::ConfigInvalid {
                section: "alerts".to_string(),
                key: key.to_string(),
                reason: format!("{} must be positive", key),
            });
        }
    }
    Ok(())
}

fn validate_aliases(config: &dyn ConfigPort) -> Result<(), OppscanError> {
    if let Some(aliases) = config.get_string("symbols", "aliases") {
        SymbolAliases::parse(&aliases).map_err(|e| OppscanError::ConfigInvalid {
            section: "symbols".to_string(),
            key: "aliases".to_string(),
            reason: e.to_string(),
        })?;
    }
    Ok(())
}

fn validate_exchange_suffixes(config: &dyn ConfigPort) -> Result<(), OppscanError> {
    if let Some(suffixes) = config.get_string("symbols", "exchange_suffixes") {
        if suffixes.split(',').all(|s| s.trim().is_empty()) {
            return Err(OppscanError::ConfigInvalid {
                section: "symbols".to_string(),
                key: "exchange_suffixes".to_string(),
                reason: "at least one exchange suffix is required".to_string(),
            });
        }
    }
    Ok(())
}
