//! Rank-to-signal conversion.

/// Convert ranks to trade signals: -1 where `rank < threshold`, +1 otherwise.
///
/// With rank 1 as the best performer this shorts the top-(threshold-1)
/// performers and holds the rest long — a reversal rule, kept exactly as the
/// strategy defines it.
///
/// Thresholds outside `1..=universe_size + 1` make the signal constant; that
/// is reported as a warning rather than an error.
pub fn generate_signals(ranks: &[Vec<u32>], universe_size: usize, threshold: u32) -> Vec<Vec<i8>> {
    if threshold < 1 {
        eprintln!(
            "warning: rank threshold {} is below 1; every signal will be +1",
            threshold
        );
    } else if threshold as usize > universe_size + 1 {
        eprintln!(
            "warning: rank threshold {} exceeds universe size {} + 1; every signal will be -1",
            threshold, universe_size
        );
    }

    ranks
        .iter()
        .map(|row| {
            row.iter()
                .map(|&rank| if rank < threshold { -1 } else { 1 })
                .collect()
        })
        .collect()
}
