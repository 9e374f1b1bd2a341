//! Error types for table queries and loaders.

use thiserror::Error;

/// Result type for sheetquery operations
pub type Result<T> = std::result::Result<T, QueryError>;

/// Errors that can occur while loading or querying a table
#[derive(Debug, Error)]
pub enum QueryError {
    /// Malformed row or column range
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Range reaches past the available rows (strict policy only)
    #[error("Range out of bounds: requested up to row {requested}, table has {available} data rows")]
    OutOfBounds { requested: usize, available: usize },

    /// Referenced column does not exist
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Bad column set, result index or ordering key list
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Cell could not be read as the requested type
    #[error("Type mismatch in column {column}: expected {expected}, found {found}")]
    TypeMismatch {
        column: String,
        expected: String,
        found: String,
    },

    /// Source file does not exist
    #[error("Source not found: {0}")]
    SourceNotFound(String),

    /// Sheet not present in the source
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// No loader handles this file extension
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Underlying reader failed to parse the source
    #[error("Failed to read source: {0}")]
    Source(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<calamine::Error> for QueryError {
    fn from(err: calamine::Error) -> Self {
        QueryError::Source(err.to_string())
    }
}

impl From<csv::Error> for QueryError {
    fn from(err: csv::Error) -> Self {
        QueryError::Source(err.to_string())
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        QueryError::Source(err.to_string())
    }
}

impl From<parquet::errors::ParquetError> for QueryError {
    fn from(err: parquet::errors::ParquetError) -> Self {
        QueryError::Source(err.to_string())
    }
}

impl From<arrow::error::ArrowError> for QueryError {
    fn from(err: arrow::error::ArrowError) -> Self {
        QueryError::Source(err.to_string())
    }
}
