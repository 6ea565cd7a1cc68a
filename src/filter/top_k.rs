use tracing::debug;

/// Truncate to the first `selection_count` rows; the caller is assumed to
/// have ordered the pool meaningfully. Smaller pools pass through unchanged.
pub(super) fn select(mut pool: Vec<Vec<f32>>, selection_count: Option<usize>) -> Vec<Vec<f32>> {
    let Some(count) = selection_count else {
        return pool;
    };
    if pool.len() > count {
        pool.truncate(count);
        debug!(selected = count, "truncated pool");
    } else {
        debug!(remaining = pool.len(), "pool already within target size");
    }
    pool
}
