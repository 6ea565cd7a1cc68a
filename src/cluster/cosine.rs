//! Cosine-similarity k-means.
//!
//! Assignment maximizes cosine similarity instead of minimizing Euclidean
//! distance; the update step is still the member mean. Iterates until
//! assignments stabilize or the iteration cap is hit. Numerically this
//! backend is best-effort: a cluster whose member mean lands near zero has
//! no meaningful direction.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use tracing::debug;

use crate::config::ClusteringConfig;

use super::distance::cosine_similarity;

pub(super) fn run(pool: &[Vec<f32>], k: usize, config: &ClusteringConfig) -> Vec<Vec<f32>> {
    let dim = pool[0].len();
    let mut rng = StdRng::seed_from_u64(config.seed);

    // Distinct random rows as the initial centers.
    let mut centers: Vec<Vec<f32>> = index::sample(&mut rng, pool.len(), k)
        .into_iter()
        .map(|i| pool[i].clone())
        .collect();

    let mut assignment = vec![usize::MAX; pool.len()];

    for iteration in 0..config.kmeans_max_iterations {
        let mut changed = false;
        for (row_index, row) in pool.iter().enumerate() {
            let mut best = 0;
            let mut best_similarity = f32::NEG_INFINITY;
            for (i, center) in centers.iter().enumerate() {
                let similarity = cosine_similarity(row, center);
                if similarity > best_similarity {
                    best = i;
                    best_similarity = similarity;
                }
            }
            if assignment[row_index] != best {
                assignment[row_index] = best;
                changed = true;
            }
        }

        if !changed {
            debug!(iteration, "cosine k-means assignments stable");
            break;
        }

        // Re-estimate each center from its members; empty clusters keep
        // their previous center.
        let mut sums = vec![vec![0.0f32; dim]; k];
        let mut counts = vec![0usize; k];
        for (row, &center_index) in pool.iter().zip(&assignment) {
            counts[center_index] += 1;
            for (s, v) in sums[center_index].iter_mut().zip(row.iter()) {
                *s += *v;
            }
        }
        for ((center, sum), count) in centers.iter_mut().zip(sums).zip(&counts) {
            if *count == 0 {
                continue;
            }
            for (c, s) in center.iter_mut().zip(sum) {
                *c = s / *count as f32;
            }
        }
    }

    centers
}
