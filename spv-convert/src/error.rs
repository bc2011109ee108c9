//! Error types for spv-convert
//!
//! Row-level `vaccine_types` problems are not errors: they are recovered per
//! row and reported as [`crate::models::ParseError`] diagnostics. Everything
//! here aborts the run before any artifact is left behind.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the conversion pipeline
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Source file absent
    #[error("Input file not found: {}", .0.display())]
    Input(PathBuf),

    /// Malformed CSV (bad quoting, ragged rows, invalid UTF-8)
    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Required columns missing from a table header
    #[error("Table '{table}' is missing required columns: {}", missing.join(", "))]
    Schema { table: String, missing: Vec<String> },

    /// Thread row without a usable integer thread_id
    #[error("Row {row}: invalid thread_id {value}")]
    InvalidThreadId { row: usize, value: String },

    /// Consistency checks failed (hard errors from the validator)
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Key derivation, cipher, or base64 failure
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// spv-common error
    #[error(transparent)]
    Common(#[from] spv_common::Error),
}

/// Convenience Result type using spv-convert ConvertError
pub type Result<T> = std::result::Result<T, ConvertError>;
