//! Crate-wide error type.
//!
//! Every fallible operation returns [`Result`]. Nothing is retried: a failure
//! means the whole operation failed and no partial output was produced.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatchmentError>;

#[derive(Debug, Error)]
pub enum CatchmentError {
    /// Required input columns are missing from the long-format header.
    #[error("Missing required column(s): {}", .0.join(", "))]
    Schema(Vec<String>),

    /// A record could not be turned into a `(timestamp, site, value)` triple.
    #[error("Line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Daily aggregation needs a date/time row index.
    #[error("Expected a date/time row index, found {found}")]
    TypeMismatch { found: &'static str },

    /// A column or measurement name that does not exist.
    #[error("No such key: `{0}`")]
    KeyNotFound(String),

    /// A table could not be assembled (duplicate labels, ragged rows).
    #[error("Invalid table shape: {0}")]
    Shape(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
