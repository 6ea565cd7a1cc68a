//! Mini-batch k-means with k-means++ seeding, bounded patience, and
//! low-usage center reassignment.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::ClusteringConfig;

use super::init::{kmeans_plus_plus, nearest_center};

pub(super) fn run(
    pool: &[Vec<f32>],
    k: usize,
    batch_size: usize,
    config: &ClusteringConfig,
) -> Vec<Vec<f32>> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut centers = kmeans_plus_plus(pool, k, &mut rng);
    let mut counts = vec![0usize; k];

    let mut best_inertia = f32::INFINITY;
    let mut stale_batches = 0;

    for batch_index in 0..config.kmeans_max_iterations {
        let batch = index::sample(&mut rng, pool.len(), batch_size);

        // Assign the batch, taking a per-center gradient step with a
        // 1/count learning rate as each member lands.
        let mut batch_inertia = 0.0;
        for idx in batch.iter() {
            let row = &pool[idx];
            let (best, dist) = nearest_center(row, &centers);
            batch_inertia += dist;
            counts[best] += 1;
            let learning_rate = 1.0 / counts[best] as f32;
            for (c, v) in centers[best].iter_mut().zip(row.iter()) {
                *c += learning_rate * (*v - *c);
            }
        }
        batch_inertia /= batch_size as f32;

        // Patience: stop once improvement stalls.
        if batch_inertia < best_inertia {
            best_inertia = batch_inertia;
            stale_batches = 0;
        } else {
            stale_batches += 1;
            if stale_batches >= config.max_no_improvement {
                debug!(batch_index, best_inertia, "mini-batch patience exhausted");
                break;
            }
        }

        reassign_low_usage(
            pool,
            &mut centers,
            &mut counts,
            config.reassignment_ratio,
            &mut rng,
        );
    }

    centers
}

/// Re-seed centers whose usage fell far below the average; keeps dead
/// centers from surviving a bad init.
fn reassign_low_usage(
    pool: &[Vec<f32>],
    centers: &mut [Vec<f32>],
    counts: &mut [usize],
    ratio: f32,
    rng: &mut StdRng,
) {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return;
    }
    let floor = (ratio * total as f32 / centers.len() as f32).ceil() as usize;
    for (center, count) in centers.iter_mut().zip(counts.iter_mut()) {
        if *count < floor {
            let replacement = rng.gen_range(0..pool.len());
            center.clone_from(&pool[replacement]);
            *count = 0;
        }
    }
}
