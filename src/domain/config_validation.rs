//! Configuration validation.
//!
//! Validates all config fields before a backtest runs.

use crate::domain::error::CrossrankError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), CrossrankError> {
    validate_tickers(config)?;
    validate_dates(config)?;
    validate_rank_threshold(config)?;
    validate_risk_free_rate(config)?;
    validate_trading_days(config)?;
    Ok(())
}

fn validate_tickers(config: &dyn ConfigPort) -> Result<(), CrossrankError> {
    let tickers = config.get_string("backtest", "tickers");
    let ticker = config.get_string("backtest", "ticker");

    match (tickers, ticker) {
        (Some(t), _) if !t.trim().is_empty() => Ok(()),
        (None, Some(t)) if !t.trim().is_empty() => Ok(()),
        _ => Err(CrossrankError::ConfigMissing {
            section: "backtest".to_string(),
            key: "tickers".to_string(),
        }),
    }
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), CrossrankError> {
    let start_str = config.get_string("backtest", "start_date");
    let end_str = config.get_string("backtest", "end_date");

    let start_date = parse_date(start_str.as_deref(), "start_date")?;
    let end_date = parse_date(end_str.as_deref(), "end_date")?;

    if start_date >= end_date {
        return Err(CrossrankError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "start_date".to_string(),
            reason: "start_date must be before end_date".to_string(),
        });
    }
    Ok(())
}

fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, CrossrankError> {
    match value {
        None => Err(CrossrankError::ConfigMissing {
            section: "backtest".to_string(),
            key: field.to_string(),
        }),
        Some(s) => {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| CrossrankError::ConfigInvalid {
                section: "backtest".to_string(),
                key: field.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", field),
            })
        }
    }
}

fn validate_rank_threshold(config: &dyn ConfigPort) -> Result<(), CrossrankError> {
    let value = config.get_int("backtest", "rank_threshold", 22);
    if value < 1 {
        return Err(CrossrankError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "rank_threshold".to_string(),
            reason: "rank_threshold must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn validate_risk_free_rate(config: &dyn ConfigPort) -> Result<(), CrossrankError> {
    let value = config.get_double("backtest", "risk_free_rate", 0.0);
    if value < 0.0 || value >= 1.0 {
        return Err(CrossrankError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "risk_free_rate".to_string(),
            reason: "risk_free_rate must be between 0 and 1".to_string(),
        });
    }
    Ok(())
}

fn validate_trading_days(config: &dyn ConfigPort) -> Result<(), CrossrankError> {
    let value = config.get_double("backtest", "trading_days", 252.0);
    if value <= 0.0 {
        return Err(CrossrankError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "trading_days".to_string(),
            reason: "trading_days must be positive".to_string(),
        });
    }
    Ok(())
}
