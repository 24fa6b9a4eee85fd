//! Signal-to-return attribution and portfolio aggregation.

use crate::domain::error::CrossrankError;
use crate::domain::returns::ReturnMatrix;

/// `attributed[t][a] = signal[t][a] * return[t+1][a]`, with the last row
/// forced to zero.
///
/// The one-step shift is mandatory: the signal is decided at the close of
/// day t and realized over day t+1. Attributing against same-day returns
/// would leak the information the signal was ranked on.
pub fn attribute_returns(
    signals: &[Vec<i8>],
    returns: &ReturnMatrix,
) -> Result<Vec<Vec<f64>>, CrossrankError> {
    if returns.ticker_count() == 0 {
        return Err(CrossrankError::EmptyUniverse);
    }

    let rows = signals.len();
    let mut attributed = Vec::with_capacity(rows);

    for t in 0..rows {
        if t + 1 < rows {
            let row = signals[t]
                .iter()
                .zip(returns.rows[t + 1].iter())
                .map(|(&signal, &next_return)| f64::from(signal) * next_return)
                .collect();
            attributed.push(row);
        } else {
            attributed.push(vec![0.0; returns.ticker_count()]);
        }
    }

    Ok(attributed)
}

/// Equal-weighted portfolio return per time step: the mean across tickers
/// of each attributed row.
pub fn strategy_returns(attributed: &[Vec<f64>]) -> Result<Vec<f64>, CrossrankError> {
    let series = attributed
        .iter()
        .map(|row| {
            if row.is_empty() {
                Err(CrossrankError::EmptyUniverse)
            } else {
                Ok(row.iter().sum::<f64>() / row.len() as f64)
            }
        })
        .collect::<Result<Vec<f64>, CrossrankError>>()?;
    Ok(series)
}
