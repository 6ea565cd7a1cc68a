mod common;

use common::vectors::{clustered_samples, random_samples};

use anchorage::config::ClusteringConfig;
use anchorage::error::AnchorageError;
use anchorage::filter::{FilterConfig, FilterStrategy};
use anchorage::pipeline::{CentroidPipeline, CentroidRequest};
use anchorage::progress::NullObserver;
use anchorage::store::{load_centroids, load_samples};
use anchorage::types::{FilterShape, Geometry, InputShape, Metric, Stride};

use tempfile::TempDir;

fn flat_geometry() -> Geometry {
    // 1x4x4 inputs used whole; the window is irrelevant in flat mode.
    Geometry {
        input_shape: InputShape {
            channels: 1,
            height: 4,
            width: 4,
        },
        stride: Stride { row: 1, col: 1 },
        filter_shape: FilterShape {
            height: 2,
            width: 2,
        },
    }
}

fn base_request(dir: &TempDir) -> CentroidRequest<'static> {
    CentroidRequest {
        cache_path: dir.path().join("centroids.csv"),
        raw_dump_path: None,
        geometry: flat_geometry(),
        k: 4,
        batch_size: 5,
        metric: Metric::MiniBatch,
        use_patches: false,
        layer_index: 0,
        filter: None,
        force_create: false,
    }
}

// ─── End-to-end ───

#[test]
fn test_end_to_end_flat_minibatch() {
    let dir = TempDir::new().unwrap();
    let dataset = random_samples(100, 16);
    let config = ClusteringConfig::default();
    let pipeline = CentroidPipeline::new(&config, &NullObserver);
    let request = base_request(&dir);

    let centroids = pipeline.load_or_create(&dataset, &request).unwrap();

    assert_eq!(centroids.len(), 4);
    for centroid in &centroids {
        assert_eq!(centroid.len(), 16);

        // The final step zeroes each row's own mean...
        let mean: f32 = centroid.iter().sum::<f32>() / 16.0;
        assert!(mean.abs() < 1e-5, "row mean {mean} should be ~0");

        // ...which only nudges the unit norm from the normalization step
        // downward, never above 1.
        let norm: f32 = centroid.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!(norm <= 1.0 + 1e-4, "norm {norm} cannot exceed 1");
        assert!(norm > 0.5, "norm {norm} collapsed");
    }

    assert!(request.cache_path.exists());
}

#[test]
fn test_end_to_end_patch_mode_with_dump() {
    let dir = TempDir::new().unwrap();
    // 1x6x6 images, 3x3 window at stride 3: 4 patches of length 9 each.
    let geometry = Geometry {
        input_shape: InputShape {
            channels: 1,
            height: 6,
            width: 6,
        },
        stride: Stride { row: 3, col: 3 },
        filter_shape: FilterShape {
            height: 3,
            width: 3,
        },
    };
    let dataset = random_samples(30, 36);
    let config = ClusteringConfig::default();
    let pipeline = CentroidPipeline::new(&config, &NullObserver);

    let request = CentroidRequest {
        raw_dump_path: Some(dir.path().join("raw_pool.csv")),
        geometry,
        k: 3,
        batch_size: 10,
        use_patches: true,
        ..base_request(&dir)
    };

    let centroids = pipeline.load_or_create(&dataset, &request).unwrap();
    assert_eq!(centroids.len(), 3);
    assert!(centroids.iter().all(|c| c.len() == 9));

    // The dump holds the pre-preprocessing pool: 30 images x 4 patches.
    let dumped = load_samples(request.raw_dump_path.as_ref().unwrap()).unwrap();
    assert_eq!(dumped.len(), 120);
    assert!(dumped.iter().all(|row| row.len() == 9));
}

#[test]
fn test_exact_and_cosine_end_to_end() {
    let dir = TempDir::new().unwrap();
    let dataset = random_samples(60, 16);
    let config = ClusteringConfig {
        kmeans_restarts: 5,
        ..Default::default()
    };
    let pipeline = CentroidPipeline::new(&config, &NullObserver);

    for (name, metric) in [("exact", Metric::Exact), ("cosine", Metric::CosineCustom)] {
        let request = CentroidRequest {
            cache_path: dir.path().join(format!("centroids_{name}.csv")),
            k: 3,
            metric,
            ..base_request(&dir)
        };
        let centroids = pipeline.load_or_create(&dataset, &request).unwrap();
        assert_eq!(centroids.len(), 3, "metric {metric}");
        assert!(centroids.iter().all(|c| c.len() == 16), "metric {metric}");
    }
}

// ─── Cache behavior ───

#[test]
fn test_cache_hit_skips_rebuild() {
    let dir = TempDir::new().unwrap();
    let dataset = random_samples(100, 16);
    let config = ClusteringConfig::default();
    let pipeline = CentroidPipeline::new(&config, &NullObserver);
    let request = base_request(&dir);

    let first = pipeline.load_or_create(&dataset, &request).unwrap();

    // An empty dataset cannot be rebuilt; a successful second call proves
    // the result came from the cache.
    let second = pipeline.load_or_create(&[], &request).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_force_create_rebuilds() {
    let dir = TempDir::new().unwrap();
    let config = ClusteringConfig::default();
    let pipeline = CentroidPipeline::new(&config, &NullObserver);

    let first_dataset = random_samples(100, 16);
    let request = base_request(&dir);
    let first = pipeline.load_or_create(&first_dataset, &request).unwrap();

    // Same cache path, different data: a forced run must not reuse it.
    let (second_dataset, _) = clustered_samples(4, 25, 16, 0.3);
    let forced = CentroidRequest {
        force_create: true,
        ..request
    };
    let second = pipeline.load_or_create(&second_dataset, &forced).unwrap();

    assert_ne!(first, second);
    assert_eq!(load_centroids(&forced.cache_path).unwrap(), second);
}

#[test]
fn test_failure_leaves_no_cache() {
    let dir = TempDir::new().unwrap();
    let dataset = random_samples(10, 16);
    let config = ClusteringConfig::default();
    let pipeline = CentroidPipeline::new(&config, &NullObserver);

    let request = CentroidRequest {
        k: 50,
        batch_size: 5,
        ..base_request(&dir)
    };
    let err = pipeline.load_or_create(&dataset, &request).unwrap_err();
    assert!(matches!(err, AnchorageError::InsufficientSamples { .. }));
    assert!(!request.cache_path.exists());
}

#[test]
fn test_failure_preserves_previous_cache() {
    let dir = TempDir::new().unwrap();
    let dataset = random_samples(100, 16);
    let config = ClusteringConfig::default();
    let pipeline = CentroidPipeline::new(&config, &NullObserver);

    let request = base_request(&dir);
    let first = pipeline.load_or_create(&dataset, &request).unwrap();

    let doomed = CentroidRequest {
        k: 500,
        force_create: true,
        ..request
    };
    pipeline.load_or_create(&dataset, &doomed).unwrap_err();

    // The failed run aborted before the write; the old cache is intact.
    assert_eq!(load_centroids(&doomed.cache_path).unwrap(), first);
}

// ─── Filter integration ───

#[test]
fn test_filter_applied_before_clustering() {
    let dir = TempDir::new().unwrap();
    let dataset = random_samples(100, 16);
    let config = ClusteringConfig::default();
    let pipeline = CentroidPipeline::new(&config, &NullObserver);

    let subset_filter = FilterConfig {
        selection_count: Some(40),
        ..FilterConfig::new(FilterStrategy::RandomSubset)
    };
    let request = CentroidRequest {
        filter: Some(&subset_filter),
        ..base_request(&dir)
    };
    let centroids = pipeline.load_or_create(&dataset, &request).unwrap();
    assert_eq!(centroids.len(), 4);
}

#[test]
fn test_variance_filter_end_to_end() {
    let dir = TempDir::new().unwrap();
    let dataset = random_samples(100, 16);
    let config = ClusteringConfig::default();
    let pipeline = CentroidPipeline::new(&config, &NullObserver);

    let variance_filter = FilterConfig::new(FilterStrategy::VarianceThreshold);
    let request = CentroidRequest {
        filter: Some(&variance_filter),
        ..base_request(&dir)
    };
    let centroids = pipeline.load_or_create(&dataset, &request).unwrap();
    assert_eq!(centroids.len(), 4);
    assert!(centroids.iter().all(|c| c.len() == 16));
}

#[test]
fn test_filter_insufficiency_propagates() {
    let dir = TempDir::new().unwrap();
    let dataset = random_samples(20, 16);
    let config = ClusteringConfig::default();
    let pipeline = CentroidPipeline::new(&config, &NullObserver);

    let greedy_filter = FilterConfig {
        selection_count: Some(500),
        ..FilterConfig::new(FilterStrategy::RandomSubset)
    };
    let request = CentroidRequest {
        filter: Some(&greedy_filter),
        ..base_request(&dir)
    };
    let err = pipeline.load_or_create(&dataset, &request).unwrap_err();
    assert!(matches!(err, AnchorageError::InsufficientSamples { .. }));
    assert!(!request.cache_path.exists());
}
