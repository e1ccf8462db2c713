//! # catalog-import - music lesson catalog CSV to SQL
//!
//! Turns a catalog export (one row per lesson item, column names in any of
//! the supported languages) into an SQL script that fills the `types`,
//! `tags`, `pieces` and `piece_tags` tables.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│  Transform  │────▶│  SQL script │
//! │  (any lang) │     │  (auto-enc) │     │ (rename/tag)│     │ (insert.sql)│
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!                                                ▲
//!                                         lang.json (translations)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use catalog_import::{import_csv, ImportOptions};
//! use std::path::Path;
//!
//! let report = import_csv(Path::new("catalog.csv"), &ImportOptions::default()).unwrap();
//! println!("{} pieces, {} tags", report.pieces, report.tags);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per layer
//! - [`models`] - Table and catalog entities
//! - [`parser`] - CSV parsing with auto-detection
//! - [`translation`] - Column translation table
//! - [`validation`] - JSON Schema check of the translation resource
//! - [`transform`] - Catalog transform, grouping, and pipeline
//! - [`sql`] - SQL statement rendering
//! - [`logs`] - Progress logging

// Core modules
pub mod error;
pub mod logs;
pub mod models;

// Input
pub mod parser;
pub mod translation;
pub mod validation;

// Transformation
pub mod transform;

// Output
pub mod sql;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    CatalogError, CsvError, PipelineError, SqlError, TranslationError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Binding, NormalizedCatalog, Table, TagSets, UniqueList};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    decode_content, detect_delimiter, detect_encoding, parse_bytes, parse_csv_file, parse_table,
    ParseOptions, ParseResult,
};

// =============================================================================
// Re-exports - Translation
// =============================================================================

pub use translation::{TranslationEntry, TranslationTable};
pub use validation::{is_valid_translations, validate_translations};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{transform, transform_with_columns, CatalogColumns};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    import_csv, import_csv_at, render_statements, schema_statements, CsvInfo, ImportOptions,
    ImportReport, OutputLayout, OutputTarget, WriteMode,
};

// =============================================================================
// Re-exports - SQL
// =============================================================================

pub use sql::{create_table, delete, insert, parameterized, read, upsert, Fields, SqlValue};
