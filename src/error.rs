//! Error types for the event_study crate

use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the event_study crate
#[derive(Debug, Error)]
pub enum EventStudyError {
    /// Error related to input data: missing file, unparseable dates,
    /// missing metric column
    #[error("Input error: {0}")]
    Input(String),

    /// An estimation window held fewer observations than a model requires
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Degenerate arithmetic that would otherwise produce silent NaN/Inf
    #[error("Numeric degeneracy: {0}")]
    NumericDegeneracy(String),

    /// Error related to parameter validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Table error: {0}")]
    Table(String),

    /// Error serializing a report artifact
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, EventStudyError>;

impl From<PolarsError> for EventStudyError {
    fn from(err: PolarsError) -> Self {
        EventStudyError::Table(err.to_string())
    }
}

impl From<serde_json::Error> for EventStudyError {
    fn from(err: serde_json::Error) -> Self {
        EventStudyError::Serialization(err.to_string())
    }
}
