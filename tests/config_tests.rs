use anchorage::config::Config;
use anchorage::error::AnchorageError;
use anchorage::types::Metric;

use tempfile::tempdir;

#[test]
fn test_defaults_without_file() {
    let config = Config::load(None).unwrap();

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, "plain");
    assert_eq!(config.clustering.kmeans_restarts, 30);
    assert_eq!(config.clustering.max_no_improvement, 10);
    assert_eq!(config.clustering.seed, 42);
    assert_eq!(config.pipeline.metric, Metric::MiniBatch);
    assert!(config.pipeline.dataset_path.is_none());
    assert!(!config.pipeline.force_create);
}

#[test]
fn test_parse_partial_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("anchorage.toml");
    std::fs::write(
        &path,
        r#"
[logging]
level = "debug"

[clustering]
seed = 7
kmeans_restarts = 5

[pipeline]
k = 8
batch_size = 20
metric = "mbk"
use_patches = false
"#,
    )
    .unwrap();

    let config = Config::load(Some(path.to_str().unwrap())).unwrap();

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.clustering.seed, 7);
    assert_eq!(config.clustering.kmeans_restarts, 5);
    // Untouched sections keep their defaults.
    assert_eq!(config.clustering.max_no_improvement, 10);
    assert_eq!(config.pipeline.k, 8);
    assert_eq!(config.pipeline.batch_size, 20);
    assert_eq!(config.pipeline.metric, Metric::MiniBatch);
    assert!(!config.pipeline.use_patches);
}

#[test]
fn test_metric_tags_parse() {
    let dir = tempdir().unwrap();

    for (tag, expected) in [
        ("km", Metric::Exact),
        ("exact", Metric::Exact),
        ("mbk", Metric::MiniBatch),
        ("mini_batch", Metric::MiniBatch),
        ("cosine", Metric::CosineCustom),
        ("cosine_custom", Metric::CosineCustom),
    ] {
        let path = dir.path().join(format!("{tag}.toml"));
        std::fs::write(&path, format!("[pipeline]\nmetric = \"{tag}\"\n")).unwrap();
        let config = Config::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.pipeline.metric, expected, "tag {tag}");
    }
}

#[test]
fn test_unknown_metric_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[pipeline]\nmetric = \"manhattan\"\n").unwrap();

    let err = Config::load(Some(path.to_str().unwrap())).unwrap_err();
    assert!(matches!(err, AnchorageError::Config(_)));
}

#[test]
fn test_missing_file_errors() {
    let err = Config::load(Some("/definitely/not/here.toml")).unwrap_err();
    assert!(matches!(err, AnchorageError::Config(_)));
}
