use rand::rngs::StdRng;
use rand::Rng;

use super::distance::euclidean_distance;

/// k-means++ seeding: the first center is uniform, every further center is
/// drawn proportional to squared distance from its nearest chosen center.
pub(super) fn kmeans_plus_plus(pool: &[Vec<f32>], k: usize, rng: &mut StdRng) -> Vec<Vec<f32>> {
    let mut centers: Vec<Vec<f32>> = Vec::with_capacity(k);
    let first = rng.gen_range(0..pool.len());
    centers.push(pool[first].clone());

    let mut dists: Vec<f32> = pool
        .iter()
        .map(|row| euclidean_distance(row, &centers[0]))
        .collect();

    while centers.len() < k {
        let total: f32 = dists.iter().sum();
        let next = if total > 0.0 {
            let mut target = rng.gen_range(0.0..total);
            let mut chosen = pool.len() - 1;
            for (i, d) in dists.iter().enumerate() {
                if target < *d {
                    chosen = i;
                    break;
                }
                target -= d;
            }
            chosen
        } else {
            // Every remaining row coincides with a center; any row works.
            rng.gen_range(0..pool.len())
        };
        centers.push(pool[next].clone());

        let newest = centers.last().expect("center just pushed");
        for (d, row) in dists.iter_mut().zip(pool.iter()) {
            *d = d.min(euclidean_distance(row, newest));
        }
    }

    centers
}

/// Index and squared distance of the center nearest to `row`.
pub(super) fn nearest_center(row: &[f32], centers: &[Vec<f32>]) -> (usize, f32) {
    let mut best = 0;
    let mut best_dist = f32::INFINITY;
    for (i, center) in centers.iter().enumerate() {
        let dist = euclidean_distance(row, center);
        if dist < best_dist {
            best = i;
            best_dist = dist;
        }
    }
    (best, best_dist)
}
