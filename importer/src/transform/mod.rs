//! Transformation module.
//!
//! - Catalog: column renaming, ID deduplication, tag/piece/type derivation
//! - Grouper: rows grouped by piece into piece-tag bindings
//! - Pipeline: CSV file in, SQL script out

pub mod catalog;
pub mod grouper;
pub mod pipeline;

pub use catalog::{transform, transform_with_columns, CatalogColumns};
pub use grouper::{bind_tags, split_tags, TagColumn};
pub use pipeline::*;
