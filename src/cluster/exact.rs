//! Exact k-means: full Lloyd passes with multiple restarts, best inertia
//! kept.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use tracing::debug;

use crate::config::ClusteringConfig;

use super::distance::euclidean_distance;
use super::init::{kmeans_plus_plus, nearest_center};

pub(super) fn run(pool: &[Vec<f32>], k: usize, config: &ClusteringConfig) -> Vec<Vec<f32>> {
    let restarts = config.kmeans_restarts.max(1);

    let (centroids, inertia) = (0..restarts as u64)
        .into_par_iter()
        .map(|restart| {
            let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(restart));
            lloyd(pool, k, config, &mut rng)
        })
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .expect("at least one restart runs");

    debug!(inertia, restarts, "exact k-means complete");
    centroids
}

/// One Lloyd run from a fresh k-means++ init; returns (centroids, inertia).
fn lloyd(
    pool: &[Vec<f32>],
    k: usize,
    config: &ClusteringConfig,
    rng: &mut StdRng,
) -> (Vec<Vec<f32>>, f32) {
    let dim = pool[0].len();
    let mut centers = kmeans_plus_plus(pool, k, rng);
    let mut inertia = f32::INFINITY;

    for _ in 0..config.kmeans_max_iterations {
        // Assignment pass, accumulating member sums as we go.
        let mut sums = vec![vec![0.0f32; dim]; k];
        let mut counts = vec![0usize; k];
        let mut pass_inertia = 0.0;
        for row in pool {
            let (best, dist) = nearest_center(row, &centers);
            counts[best] += 1;
            for (s, v) in sums[best].iter_mut().zip(row.iter()) {
                *s += *v;
            }
            pass_inertia += dist;
        }
        inertia = pass_inertia;

        // Update pass; empty clusters keep their previous center.
        let mut shift = 0.0f32;
        for (i, (sum, count)) in sums.into_iter().zip(&counts).enumerate() {
            if *count == 0 {
                continue;
            }
            let updated: Vec<f32> = sum.into_iter().map(|s| s / *count as f32).collect();
            shift += euclidean_distance(&centers[i], &updated);
            centers[i] = updated;
        }

        if shift <= config.kmeans_convergence_epsilon {
            break;
        }
    }

    (centers, inertia)
}
