use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;

use crate::error::{AnchorageError, Result};

/// Uniform sample without replacement. Fails when the pool cannot supply
/// `selection_count` rows.
pub(super) fn select(
    pool: Vec<Vec<f32>>,
    selection_count: Option<usize>,
    seed: u64,
) -> Result<Vec<Vec<f32>>> {
    let Some(count) = selection_count else {
        return Ok(pool);
    };
    if count > pool.len() {
        return Err(AnchorageError::InsufficientSamples {
            available: pool.len(),
            required: count,
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let chosen = index::sample(&mut rng, pool.len(), count);

    let mut slots: Vec<Option<Vec<f32>>> = pool.into_iter().map(Some).collect();
    Ok(chosen
        .into_iter()
        .map(|i| slots[i].take().expect("each index sampled once"))
        .collect())
}
