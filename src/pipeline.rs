//! Pipeline orchestrator: sample construction through centroid caching.

use std::path::PathBuf;

use tracing::{debug, info, instrument};

use crate::cluster;
use crate::config::ClusteringConfig;
use crate::error::{AnchorageError, Result};
use crate::filter::FilterConfig;
use crate::patches::build_samples;
use crate::preprocess;
use crate::progress::ProgressObserver;
use crate::store;
use crate::types::{Geometry, Metric};

/// One centroid-construction request: geometry, clustering parameters, and
/// cache locations.
#[derive(Debug, Clone)]
pub struct CentroidRequest<'a> {
    pub cache_path: PathBuf,
    /// When set, the raw sample pool is dumped here before preprocessing.
    pub raw_dump_path: Option<PathBuf>,
    pub geometry: Geometry,
    pub k: usize,
    pub batch_size: usize,
    pub metric: Metric,
    pub use_patches: bool,
    /// Which network layer the centroids are for; diagnostics only.
    pub layer_index: usize,
    pub filter: Option<&'a FilterConfig>,
    /// Rebuild even when the cache already has centroids.
    pub force_create: bool,
}

/// Composes sample building, preprocessing, filtering, clustering, and the
/// centroid cache.
pub struct CentroidPipeline<'a> {
    config: &'a ClusteringConfig,
    observer: &'a dyn ProgressObserver,
}

impl<'a> CentroidPipeline<'a> {
    pub fn new(config: &'a ClusteringConfig, observer: &'a dyn ProgressObserver) -> Self {
        Self { config, observer }
    }

    /// Load cached centroids, or build and cache them when the cache misses
    /// or `force_create` is set.
    #[instrument(
        skip(self, dataset, request),
        fields(layer = request.layer_index, cache = %request.cache_path.display())
    )]
    pub fn load_or_create(
        &self,
        dataset: &[Vec<f32>],
        request: &CentroidRequest<'_>,
    ) -> Result<Vec<Vec<f32>>> {
        if !request.force_create {
            match store::load_centroids(&request.cache_path) {
                Ok(centroids) => {
                    info!(rows = centroids.len(), "centroid cache hit");
                    return Ok(centroids);
                }
                Err(AnchorageError::NotFound { .. }) => {
                    info!("centroid cache miss, rebuilding");
                }
                Err(e) => return Err(e),
            }
        }

        let centroids = self.construct(dataset, request)?;
        store::save_centroids(&request.cache_path, &centroids)?;
        Ok(centroids)
    }

    /// Run the full construction sequence. The order is fixed; every step
    /// consumes the whole pool before the next begins.
    #[instrument(
        skip(self, dataset, request),
        fields(layer = request.layer_index, k = request.k, metric = %request.metric)
    )]
    pub fn construct(
        &self,
        dataset: &[Vec<f32>],
        request: &CentroidRequest<'_>,
    ) -> Result<Vec<Vec<f32>>> {
        info!(
            elements = dataset.len(),
            use_patches = request.use_patches,
            "building centroids"
        );

        let mut pool = build_samples(dataset, &request.geometry, request.use_patches, self.observer)?;

        if let Some(dump) = &request.raw_dump_path {
            store::dump_samples(dump, &pool)?;
        }

        preprocess::standardize_columns(&mut pool);
        preprocess::normalize_rows(&mut pool);

        if let Some(filter) = request.filter {
            pool = filter.select(pool, request.layer_index)?;
        }

        let mut centroids = cluster::cluster(
            &pool,
            request.k,
            request.batch_size,
            request.metric,
            self.config,
        )?;

        // Fixed post-processing order: global centering, row normalization,
        // then per-row centering. Centroid caches written by earlier runs
        // depend on this exact sequence.
        preprocess::center_global_mean(&mut centroids);
        preprocess::normalize_rows(&mut centroids);
        preprocess::center_rows(&mut centroids);

        debug!(
            angle_spread = preprocess::angle_spread(&centroids),
            "centroid direction spread"
        );

        Ok(centroids)
    }
}
