//! Error types for the driftlens engine

use thiserror::Error;

/// Result type alias for driftlens operations
pub type Result<T> = std::result::Result<T, DriftLensError>;

/// Main error type for the driftlens engine
///
/// Expected data-quality problems (missing columns, degenerate samples,
/// unparsable timestamp values) never surface here; those are reported as
/// `None` fields or empty reports. This enum covers configuration mistakes
/// and infrastructure failures only.
#[derive(Error, Debug)]
pub enum DriftLensError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unparsable cutoff timestamp: {0}")]
    CutoffParse(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<polars::error::PolarsError> for DriftLensError {
    fn from(err: polars::error::PolarsError) -> Self {
        DriftLensError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for DriftLensError {
    fn from(err: serde_json::Error) -> Self {
        DriftLensError::SerializationError(err.to_string())
    }
}
