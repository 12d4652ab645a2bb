//! Error types for gy-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gy-core
///
/// Every variant is fatal: the reconciliation is a batch transform and any
/// disagreement between the two exports aborts the whole run.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing error from the csv crate
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Reference export is structurally unusable
    #[error("failed to parse reference export '{path}': {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Same record identifier seen twice within one export
    #[error("duplicate record identifier '{record}' in the {export} export")]
    DuplicateKey {
        export: &'static str,
        record: String,
    },

    /// A flat record's identifier has no counterpart in the reference table
    #[error("record '{record}' in the flat export has no reference row")]
    MissingReference { record: String },

    /// Flat export ended before the fixed header block was complete
    #[error("flat export header has {found} line(s), expected {expected}")]
    HeaderTooShort { expected: usize, found: usize },

    /// A flat export data line has no identifier token
    #[error("flat export line {line}: record has no identifier token")]
    MissingIdentifier { line: usize },

    /// Physical token count disagrees with the reference row's sub-field counts
    #[error("record '{record}': expected {expected} physical token(s), found {found}")]
    WidthMismatch {
        record: String,
        expected: usize,
        found: usize,
    },

    /// Physical tokens remained after every schema column was consumed
    #[error("record '{record}': {leftover} physical token(s) left over after the last column")]
    ExtraTokens { record: String, leftover: usize },

    /// Reconciled field value disagrees with the reference value
    #[error("record '{record}', column '{column}': reference value {reference:?} does not match reconciled value {reconciled:?}")]
    ValueMismatch {
        record: String,
        column: &'static str,
        reference: String,
        reconciled: String,
    },

    /// A reconciled field contains the output delimiter
    #[error("record '{record}', column '{column}': value {value:?} contains the output delimiter '{delimiter}'")]
    DelimiterCollision {
        record: String,
        column: &'static str,
        value: String,
        delimiter: char,
    },

    /// Flat-record identifiers do not cover the reference table exactly
    #[error("cardinality mismatch: {reference_rows} reference row(s) but {flat_records} distinct flat record(s)")]
    CardinalityMismatch {
        reference_rows: usize,
        flat_records: usize,
    },

    /// Requested record identifier does not exist in the dataset
    #[error("record '{0}' not found")]
    RecordNotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
