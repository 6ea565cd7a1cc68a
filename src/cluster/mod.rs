//! Clustering backends for centroid construction.
//!
//! Three k-means variants sit behind one entry point; `Metric` picks the
//! backend. Every backend returns exactly `k` centroids of the input
//! dimensionality.

pub mod distance;

mod cosine;
mod exact;
mod init;
mod minibatch;

use tracing::{debug, info};

use crate::config::ClusteringConfig;
use crate::error::{AnchorageError, Result};
use crate::types::Metric;

/// Compute `k` centroids from the sample pool.
///
/// Fails fast with `InsufficientSamples` when the pool cannot support the
/// requested `k` or `batch_size`; no partial clustering is ever returned.
pub fn cluster(
    pool: &[Vec<f32>],
    k: usize,
    batch_size: usize,
    metric: Metric,
    config: &ClusteringConfig,
) -> Result<Vec<Vec<f32>>> {
    info!(
        samples = pool.len(),
        k,
        batch_size,
        metric = %metric,
        "clustering sample pool"
    );

    if k == 0 {
        return Err(AnchorageError::Configuration(
            "cluster count k must be nonzero".to_string(),
        ));
    }
    let required = k.max(batch_size);
    if pool.len() < required {
        return Err(AnchorageError::InsufficientSamples {
            available: pool.len(),
            required,
        });
    }

    let run = || match metric {
        Metric::Exact => exact::run(pool, k, config),
        Metric::MiniBatch => minibatch::run(pool, k, batch_size, config),
        Metric::CosineCustom => cosine::run(pool, k, config),
    };

    let centroids = match config.worker_threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| AnchorageError::Configuration(format!("worker pool: {e}")))?
            .install(run),
        None => run(),
    };

    debug!(
        centroids = centroids.len(),
        dim = centroids.first().map(Vec::len).unwrap_or(0),
        "clustering complete"
    );
    Ok(centroids)
}
