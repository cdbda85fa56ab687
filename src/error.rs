//! Error types for sleepfeat

use thiserror::Error;

/// Errors that can occur during feature extraction
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("Failed to parse timestamp at row {row}: {value:?}")]
    ParseError { row: usize, value: String },

    #[error("Failed to parse {column} value at row {row}: {value:?}")]
    ValueError {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Duplicate timestamp in series: {0}")]
    DuplicateTimestamp(String),

    #[error("Window width must be at least 1 minute")]
    InvalidWindow,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
