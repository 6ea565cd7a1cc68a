//! Isolation-forest outlier screening.
//!
//! Trees are grown on random subsamples; rows with short average path
//! lengths are easy to isolate and treated as outliers. Scores follow the
//! standard `2^(-E[h]/c(n))` form with the 0.5 inlier threshold.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::debug;

/// Rows considered when fitting the forest; larger pools are subsampled.
const FIT_SAMPLE_CAP: usize = 5000;
/// Rows fed to each tree.
const TREE_SAMPLE_CAP: usize = 256;
/// Trees in the ensemble.
const ENSEMBLE_SIZE: usize = 100;

enum Node {
    Leaf {
        size: usize,
    },
    Split {
        feature: usize,
        threshold: f32,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn grow(rows: &[&[f32]], depth: usize, limit: usize, rng: &mut StdRng) -> Node {
        if depth >= limit || rows.len() <= 1 {
            return Node::Leaf { size: rows.len() };
        }

        let dim = rows[0].len();
        let feature = rng.gen_range(0..dim);
        let (lo, hi) = rows.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), r| {
            (lo.min(r[feature]), hi.max(r[feature]))
        });
        if !(hi > lo) {
            // Constant along the chosen feature; cannot split further here.
            return Node::Leaf { size: rows.len() };
        }

        let threshold = rng.gen_range(lo..hi);
        let (left, right): (Vec<&[f32]>, Vec<&[f32]>) =
            rows.iter().copied().partition(|r| r[feature] < threshold);
        Node::Split {
            feature,
            threshold,
            left: Box::new(Node::grow(&left, depth + 1, limit, rng)),
            right: Box::new(Node::grow(&right, depth + 1, limit, rng)),
        }
    }

    fn path_length(&self, row: &[f32], depth: f32) -> f32 {
        match self {
            Node::Leaf { size } => depth + average_path_length(*size),
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if row[*feature] < *threshold {
                    left.path_length(row, depth + 1.0)
                } else {
                    right.path_length(row, depth + 1.0)
                }
            }
        }
    }
}

/// Expected path length of an unsuccessful BST search over `n` items; the
/// normalizer in the anomaly score.
fn average_path_length(n: usize) -> f32 {
    if n <= 1 {
        return 0.0;
    }
    let n = n as f32;
    2.0 * ((n - 1.0).ln() + 0.577_215_7) - 2.0 * (n - 1.0) / n
}

/// Fit an isolation forest on (a cap-bounded subset of) the pool and yield
/// the rows scored as inliers. The returned sequence is lazy; it is not
/// cached, so restarting it means refitting.
pub fn filter_outliers(pool: Vec<Vec<f32>>, seed: u64) -> impl Iterator<Item = Vec<f32>> {
    let verdicts = score_inliers(&pool, seed);
    pool.into_iter()
        .zip(verdicts)
        .filter_map(|(row, inlier)| inlier.then_some(row))
}

fn score_inliers(pool: &[Vec<f32>], seed: u64) -> Vec<bool> {
    if pool.len() < 2 {
        return vec![true; pool.len()];
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let fit_count = pool.len().min(FIT_SAMPLE_CAP);
    let fit_rows: Vec<&[f32]> = index::sample(&mut rng, pool.len(), fit_count)
        .into_iter()
        .map(|i| pool[i].as_slice())
        .collect();

    let per_tree = fit_rows.len().min(TREE_SAMPLE_CAP);
    let depth_limit = (per_tree as f32).log2().ceil() as usize;
    let tree_seeds: Vec<u64> = (0..ENSEMBLE_SIZE).map(|_| rng.gen()).collect();

    let trees: Vec<Node> = tree_seeds
        .into_par_iter()
        .map(|tree_seed| {
            let mut tree_rng = StdRng::seed_from_u64(tree_seed);
            let subset: Vec<&[f32]> = index::sample(&mut tree_rng, fit_rows.len(), per_tree)
                .into_iter()
                .map(|i| fit_rows[i])
                .collect();
            Node::grow(&subset, 0, depth_limit, &mut tree_rng)
        })
        .collect();

    let normalizer = average_path_length(per_tree);
    let verdicts: Vec<bool> = pool
        .par_iter()
        .map(|row| {
            let mean_path: f32 = trees
                .iter()
                .map(|tree| tree.path_length(row, 0.0))
                .sum::<f32>()
                / trees.len() as f32;
            let score = 2f32.powf(-mean_path / normalizer);
            score < 0.5
        })
        .collect();

    debug!(
        total = pool.len(),
        inliers = verdicts.iter().filter(|v| **v).count(),
        trees = ENSEMBLE_SIZE,
        "scored pool with isolation forest"
    );
    verdicts
}
