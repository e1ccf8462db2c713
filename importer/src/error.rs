//! Error types for the catalog import pipeline.
//!
//! One enum per layer:
//!
//! - [`CsvError`] - CSV reading and decoding errors
//! - [`TranslationError`] - Translation resource errors
//! - [`CatalogError`] - Schema errors raised by the catalog transform
//! - [`SqlError`] - Statement rendering errors
//! - [`PipelineError`] - Top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// CSV Parsing Errors
// =============================================================================

/// Errors while reading the input CSV.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Unknown or unsupported encoding.
    #[error("Unsupported encoding: {0}")]
    EncodingError(String),

    /// Malformed record.
    #[error("Line {line}: {message}")]
    ParseError { line: u64, message: String },

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,

    /// No headers found.
    #[error("No headers found in CSV")]
    NoHeaders,
}

impl CsvError {
    pub fn parse(line: u64, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }
}

// =============================================================================
// Translation Errors
// =============================================================================

/// Errors while loading the column translation resource.
#[derive(Debug, Error)]
pub enum TranslationError {
    /// Failed to read the resource.
    #[error("Cannot read translation file '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Resource is not valid JSON.
    #[error("Translation JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Resource does not match the translation schema.
    #[error("Invalid translation table: {}", errors.join("; "))]
    SchemaError { errors: Vec<String> },

    /// A canonical key has no English label to rename to.
    #[error("Translation key '{0}' has no English label in its first variant")]
    MissingEnglish(String),
}

// =============================================================================
// Catalog Errors
// =============================================================================

/// Errors raised by the catalog transform.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A column the transform cannot work without is absent.
    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

// =============================================================================
// SQL Errors
// =============================================================================

/// Errors while rendering SQL.
#[derive(Debug, Error, PartialEq)]
pub enum SqlError {
    /// DELETE without a WHERE clause.
    #[error("Refusing to render DELETE FROM {table} without filters")]
    UnfilteredDelete { table: String },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level import errors.
///
/// This is the error type returned by [`crate::transform::pipeline::import_csv`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// CSV parsing error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Translation resource error.
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Catalog schema error.
    #[error("Schema error: {0}")]
    Catalog(#[from] CatalogError),

    /// SQL rendering error.
    #[error("SQL error: {0}")]
    Sql(#[from] SqlError),

    /// Output could not be written.
    #[error("Output error at '{path}': {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub(crate) fn output(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Output {
            path: path.into(),
            source,
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for translation loading.
pub type TranslationResult<T> = Result<T, TranslationError>;

/// Result type for the catalog transform.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
