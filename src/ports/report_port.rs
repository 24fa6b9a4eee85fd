//! Report generation port trait.

use crate::domain::backtest::{BacktestConfig, BacktestResult};
use crate::domain::error::CrossrankError;

/// Port for writing backtest reports.
pub trait ReportPort {
    fn write(
        &self,
        result: &BacktestResult,
        config: &BacktestConfig,
        universe: &[String],
        output_path: &str,
    ) -> Result<(), CrossrankError>;
}
