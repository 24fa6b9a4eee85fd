//! Cross-sectional ranking of return rows.

use crate::domain::returns::ReturnMatrix;
use rayon::prelude::*;

/// Rank one return row: rank 1 is the largest return, rank N the smallest.
///
/// Ties break in ascending original column order (stable sort), matching a
/// descending double-argsort. Near a signal threshold this decides which of
/// two equal performers gets shorted, so it is part of the contract, not an
/// implementation detail.
pub fn rank_row(returns: &[f64]) -> Vec<u32> {
    let mut order: Vec<usize> = (0..returns.len()).collect();
    order.sort_by(|&a, &b| returns[b].total_cmp(&returns[a]));

    let mut ranks = vec![0u32; returns.len()];
    for (position, &column) in order.iter().enumerate() {
        ranks[column] = position as u32 + 1;
    }
    ranks
}

/// Rank every row of the return matrix. Rows are independent, so they are
/// ranked in parallel across the rayon pool.
pub fn rank_returns(returns: &ReturnMatrix) -> Vec<Vec<u32>> {
    returns.rows.par_iter().map(|row| rank_row(row)).collect()
}
