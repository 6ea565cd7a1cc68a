use tracing::debug;

use crate::preprocess::{mean, variance};

/// Keep rows whose variance strictly exceeds the pool mean variance, ordered
/// by descending variance; ties keep their original pool order.
///
/// A pool where no row exceeds the mean (all variances equal) is returned
/// unchanged, so the maximum-variance row always survives.
pub(super) fn select(pool: Vec<Vec<f32>>) -> Vec<Vec<f32>> {
    if pool.is_empty() {
        return pool;
    }

    let variances: Vec<f32> = pool.iter().map(|row| variance(row)).collect();
    let threshold = mean(&variances);

    let min_var = variances.iter().copied().fold(f32::INFINITY, f32::min);
    let max_var = variances.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    debug!(
        min_variance = min_var,
        max_variance = max_var,
        mean_variance = threshold,
        std_variance = variance(&variances).sqrt(),
        "pool variance profile"
    );

    let mut ranked: Vec<(usize, f32)> = variances
        .into_iter()
        .enumerate()
        .filter(|(_, var)| *var > threshold)
        .collect();
    if ranked.is_empty() {
        return pool;
    }

    // Stable on equal variances, so original order breaks ties.
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut slots: Vec<Option<Vec<f32>>> = pool.into_iter().map(Some).collect();
    ranked
        .into_iter()
        .map(|(i, _)| slots[i].take().expect("each row selected once"))
        .collect()
}
