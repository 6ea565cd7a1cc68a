use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{AnchorageError, Result};
use crate::filter::FilterConfig;
use crate::types::{FilterShape, Geometry, InputShape, Metric, Stride};

/// Top-level configuration, loaded from TOML with env overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub clustering: ClusteringConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter when RUST_LOG is unset.
    pub level: String,
    /// "plain" or "json".
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "plain".to_string(),
        }
    }
}

/// Hyper-parameters shared by the clustering backends.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Restarts for the exact backend; best inertia wins.
    pub kmeans_restarts: usize,
    /// Iteration cap per run: Lloyd passes, mini-batches, or cosine rounds.
    pub kmeans_max_iterations: usize,
    /// Centroid-shift threshold that ends a Lloyd run early.
    pub kmeans_convergence_epsilon: f32,
    /// Non-improving mini-batches tolerated before stopping.
    pub max_no_improvement: usize,
    /// Usage fraction below which a mini-batch center is re-seeded.
    pub reassignment_ratio: f32,
    /// Seed for every randomized step, so runs reproduce.
    pub seed: u64,
    /// Worker cap for restart and forest parallelism; `None` uses the
    /// global pool.
    pub worker_threads: Option<usize>,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            kmeans_restarts: 30,
            kmeans_max_iterations: 100,
            kmeans_convergence_epsilon: 1e-4,
            max_no_improvement: 10,
            reassignment_ratio: 0.01,
            seed: 42,
            worker_threads: None,
        }
    }
}

/// What the binary runs: dataset location, geometry, and cache targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// CSV of flattened samples, one per row. Required by the binary.
    pub dataset_path: Option<PathBuf>,
    pub cache_path: PathBuf,
    /// When set, the raw sample pool is dumped here for inspection.
    pub raw_dump_path: Option<PathBuf>,
    pub geometry: Geometry,
    pub k: usize,
    pub batch_size: usize,
    pub metric: Metric,
    pub use_patches: bool,
    pub layer_index: usize,
    pub force_create: bool,
    pub filter: Option<FilterConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dataset_path: None,
            cache_path: PathBuf::from("data/centroids.csv"),
            raw_dump_path: None,
            geometry: Geometry {
                input_shape: InputShape {
                    channels: 1,
                    height: 28,
                    width: 28,
                },
                stride: Stride { row: 1, col: 1 },
                filter_shape: FilterShape {
                    height: 5,
                    width: 5,
                },
            },
            k: 16,
            batch_size: 50,
            metric: Metric::default(),
            use_patches: true,
            layer_index: 0,
            force_create: false,
            filter: None,
        }
    }
}

impl Config {
    /// Load from an explicit path, else `$ANCHORAGE_CONFIG`, else defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let explicit = path.map(PathBuf::from);
        let from_env = std::env::var("ANCHORAGE_CONFIG").ok().map(PathBuf::from);

        let mut config = match explicit.or(from_env) {
            Some(file) => {
                let raw = std::fs::read_to_string(&file).map_err(|e| {
                    AnchorageError::Config(format!("read {}: {e}", file.display()))
                })?;
                toml::from_str(&raw).map_err(|e| {
                    AnchorageError::Config(format!("parse {}: {e}", file.display()))
                })?
            }
            None => Config::default(),
        };

        if let Ok(level) = std::env::var("ANCHORAGE_LOG") {
            config.logging.level = level;
        }

        Ok(config)
    }
}
