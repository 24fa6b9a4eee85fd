//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for crossrank.
#[derive(Debug, thiserror::Error)]
pub enum CrossrankError {
    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

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

    #[error("invalid price for {ticker} on {date}: {price} (prices must be strictly positive)")]
    InvalidPrice {
        ticker: String,
        date: NaiveDate,
        price: f64,
    },

    #[error("no data for {ticker}")]
    NoData { ticker: String },

    #[error("insufficient data: have {rows} usable time steps, need {minimum}")]
    InsufficientData { rows: usize, minimum: usize },

    #[error("empty universe: at least one asset is required")]
    EmptyUniverse,

    #[error("empty return series: no usable time steps after cleaning")]
    EmptySeries,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&CrossrankError> for std::process::ExitCode {
    fn from(err: &CrossrankError) -> Self {
        let code: u8 = match err {
            CrossrankError::Io(_) => 1,
            CrossrankError::ConfigParse { .. }
            | CrossrankError::ConfigMissing { .. }
            | CrossrankError::ConfigInvalid { .. } => 2,
            CrossrankError::Database { .. } | CrossrankError::DatabaseQuery { .. } => 3,
            CrossrankError::InvalidPrice { .. } => 4,
            CrossrankError::NoData { .. }
            | CrossrankError::InsufficientData { .. }
            | CrossrankError::EmptyUniverse
            | CrossrankError::EmptySeries => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_price_message_names_ticker_and_date() {
        let err = CrossrankError::InvalidPrice {
            ticker: "AAPL".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            price: 0.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("AAPL"));
        assert!(msg.contains("2024-01-15"));
    }

    // ExitCode has no PartialEq; compare via Debug formatting.
    fn exit_code_str(err: &CrossrankError) -> String {
        format!("{:?}", std::process::ExitCode::from(err))
    }

    #[test]
    fn exit_codes_by_class() {
        let io = CrossrankError::Io(std::io::Error::other("x"));
        assert_eq!(exit_code_str(&io), format!("{:?}", std::process::ExitCode::from(1)));

        let cfg = CrossrankError::ConfigMissing {
            section: "backtest".into(),
            key: "tickers".into(),
        };
        assert_eq!(exit_code_str(&cfg), format!("{:?}", std::process::ExitCode::from(2)));

        let db = CrossrankError::Database { reason: "x".into() };
        assert_eq!(exit_code_str(&db), format!("{:?}", std::process::ExitCode::from(3)));

        let price = CrossrankError::InvalidPrice {
            ticker: "A".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            price: -1.0,
        };
        assert_eq!(exit_code_str(&price), format!("{:?}", std::process::ExitCode::from(4)));

        assert_eq!(
            exit_code_str(&CrossrankError::EmptyUniverse),
            format!("{:?}", std::process::ExitCode::from(5))
        );
        assert_eq!(
            exit_code_str(&CrossrankError::EmptySeries),
            format!("{:?}", std::process::ExitCode::from(5))
        );
    }
}
