use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use anchorage::config::Config;
use anchorage::error::{AnchorageError, Result};
use anchorage::pipeline::{CentroidPipeline, CentroidRequest};
use anchorage::preprocess;
use anchorage::progress::TracingObserver;
use anchorage::store;

fn main() -> ExitCode {
    // Load .env
    let _ = dotenvy::dotenv();

    // Load config first (needed for logging setup)
    let config = match Config::load(std::env::args().nth(1).as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to load config: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize tracing from LoggingConfig
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .init();
        }
        _ => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }

    tracing::info!("anchorage starting");

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "pipeline failed");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<()> {
    let pipeline_config = &config.pipeline;
    let dataset_path = pipeline_config.dataset_path.as_ref().ok_or_else(|| {
        AnchorageError::Config("pipeline.dataset_path is required".to_string())
    })?;

    let dataset = store::load_samples(dataset_path)?;
    tracing::info!(
        samples = dataset.len(),
        path = %dataset_path.display(),
        "loaded dataset"
    );

    let observer = TracingObserver;
    let pipeline = CentroidPipeline::new(&config.clustering, &observer);

    let request = CentroidRequest {
        cache_path: pipeline_config.cache_path.clone(),
        raw_dump_path: pipeline_config.raw_dump_path.clone(),
        geometry: pipeline_config.geometry,
        k: pipeline_config.k,
        batch_size: pipeline_config.batch_size,
        metric: pipeline_config.metric,
        use_patches: pipeline_config.use_patches,
        layer_index: pipeline_config.layer_index,
        filter: pipeline_config.filter.as_ref(),
        force_create: pipeline_config.force_create,
    };

    let centroids = pipeline.load_or_create(&dataset, &request)?;

    tracing::info!(
        centroids = centroids.len(),
        dim = centroids.first().map(Vec::len).unwrap_or(0),
        angle_spread = preprocess::angle_spread(&centroids),
        "pipeline complete"
    );

    Ok(())
}
