//! Error handling for the ICP pipeline.

pub mod util;

use std::io;
use std::path::{Path, PathBuf};

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

/// Specialized error type for aggregation and scoring runs
#[derive(Debug, thiserror::Error)]
pub enum IcpError {
    /// Error opening, reading or writing a file
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A required input table does not exist
    #[error("Missing {role} input: {path}")]
    MissingInput { role: String, path: PathBuf },

    /// Error decoding or encoding Arrow data
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error processing Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Error writing a JSON report
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error converting between records and Arrow batches
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A required column is absent from an input table
    #[error("Column not found: {column}")]
    ColumnNotFound { column: String },

    /// A cell could not be interpreted
    #[error("Invalid value {value:?} in column {column}: {reason}")]
    InvalidValue {
        column: String,
        value: String,
        reason: String,
    },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl IcpError {
    /// Wrap an IO error with the path it happened on
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// A required input file is absent
    pub fn missing_input(role: &str, path: impl AsRef<Path>) -> Self {
        Self::MissingInput {
            role: role.to_string(),
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn column_not_found(column: &str) -> Self {
        Self::ColumnNotFound {
            column: column.to_string(),
        }
    }

    pub fn invalid_value(column: &str, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            column: column.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_arrow::Error> for IcpError {
    fn from(error: serde_arrow::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

/// Result type for ICP operations
pub type Result<T> = std::result::Result<T, IcpError>;
