//! Core domain types and logic.

pub mod price;
pub mod returns;
pub mod ranking;
pub mod signal;
pub mod attribution;
pub mod metrics;
pub mod backtest;
pub mod universe;
pub mod config_validation;
pub mod error;
