use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnchorageError {
    // Geometry / parameter errors
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("shape mismatch: declared volume {expected}, element length {actual}")]
    InvalidShape { expected: usize, actual: usize },

    #[error("insufficient samples: {available} available, {required} required")]
    InsufficientSamples { available: usize, required: usize },

    // Cache errors
    #[error("centroid cache not found: {path}")]
    NotFound { path: String },

    #[error("invalid centroid data: {0}")]
    InvalidData(String),

    // Config errors
    #[error("config error: {0}")]
    Config(String),

    // IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, AnchorageError>;
