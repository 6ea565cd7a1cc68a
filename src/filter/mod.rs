//! Sample-selection strategies applied to the pool before clustering.
//!
//! Each strategy is a pure function over the pool and the caller-owned
//! `FilterConfig`; the randomized strategies draw from an explicit seed so
//! runs are reproducible.

mod outlier;
mod random;
mod top_k;
mod variance;

pub use outlier::filter_outliers;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Which selection strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterStrategy {
    /// Keep rows with above-average variance, highest first.
    VarianceThreshold,
    /// Truncate to the first `selection_count` rows.
    TopK,
    /// Uniform sample without replacement of `selection_count` rows.
    RandomSubset,
    /// Isolation-forest screening; keeps inliers only.
    OutlierRemoval,
}

/// Caller-owned filter settings, never mutated by selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    pub strategy: FilterStrategy,
    /// Target pool size for `TopK` and `RandomSubset`; ignored by the other
    /// strategies. `None` passes the pool through those two unchanged.
    #[serde(default)]
    pub selection_count: Option<usize>,
    /// Seed for the randomized strategies.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_seed() -> u64 {
    42
}

impl FilterConfig {
    pub fn new(strategy: FilterStrategy) -> Self {
        Self {
            strategy,
            selection_count: None,
            seed: default_seed(),
        }
    }

    /// Reduce `pool` to an informative subset.
    ///
    /// `layer_index` is recorded for diagnostics only; every strategy applies
    /// the same thresholding regardless of layer.
    pub fn select(&self, pool: Vec<Vec<f32>>, layer_index: usize) -> Result<Vec<Vec<f32>>> {
        let before = pool.len();
        let selected = match self.strategy {
            FilterStrategy::VarianceThreshold => variance::select(pool),
            FilterStrategy::TopK => top_k::select(pool, self.selection_count),
            FilterStrategy::RandomSubset => random::select(pool, self.selection_count, self.seed)?,
            FilterStrategy::OutlierRemoval => filter_outliers(pool, self.seed).collect(),
        };
        debug!(
            strategy = ?self.strategy,
            layer_index,
            before,
            after = selected.len(),
            "filtered sample pool"
        );
        Ok(selected)
    }
}
