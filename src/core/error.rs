//! Error types for cohort analytics
//!
//! One `thiserror` enum covers every failure the library can surface. Load-time
//! errors abort a command; aggregate errors are kept per dashboard panel.

use crate::core::models::Column;
use thiserror::Error;

/// Main error type for loading, filtering, aggregating and rendering.
#[derive(Error, Debug)]
pub enum CohortError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization of chart data failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTML template rendering failed
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// A column needed by the operation is not in the table
    #[error("Missing required column '{0}'")]
    MissingColumn(Column),

    /// A period cell does not match `<year>/<term>`
    #[error("Malformed period '{value}' in column '{column}' at line {line}; expected <year>/<term>")]
    MalformedPeriod {
        /// Column holding the period
        column: Column,
        /// 1-based line in the source file (header is line 1)
        line: usize,
        /// The offending cell
        value: String,
    },

    /// A numeric cell could not be parsed
    #[error("Invalid value '{value}' in column '{column}' at line {line}")]
    InvalidValue {
        /// Column holding the value
        column: Column,
        /// 1-based line in the source file (header is line 1)
        line: usize,
        /// The offending cell
        value: String,
    },

    /// A status label names no known status
    #[error("Unknown status '{0}'")]
    UnknownStatus(String),

    /// Configuration value could not be interpreted
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, CohortError>;
