//! Error types for rankwatch
//!
//! Only configuration problems and I/O failures are errors. Defects inside
//! individual cells are recovered by the normalizer and reported through
//! [`NormalizationDiagnostics`](crate::pipeline::NormalizationDiagnostics).

use thiserror::Error;

/// Main error type for rankwatch
#[derive(Error, Debug)]
pub enum RankWatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

/// Result type alias for rankwatch operations
pub type Result<T> = std::result::Result<T, RankWatchError>;
