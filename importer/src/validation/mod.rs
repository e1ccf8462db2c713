//! JSON Schema validation for the column translation resource.
//!
//! The schema is embedded at compile time from
//! `schemas/translations.schema.json` and checked with JSON Schema Draft 7,
//! so a broken resource is reported with every violation at once instead of
//! failing on the first bad entry.
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::json;
//! use catalog_import::validation::validate_translations;
//!
//! let doc = json!({ "Name": [{ "en": "Name", "nb": "Navn" }] });
//! assert!(validate_translations(&doc).is_ok());
//!
//! let bad = json!({ "Name": [{ "nb": "Navn" }] });
//! assert!(validate_translations(&bad).is_err());
//! ```

use once_cell::sync::Lazy;
use serde_json::Value;

static TRANSLATIONS_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/translations.schema.json"))
        .expect("Invalid embedded schema")
});

/// Validate a JSON value against a JSON schema.
///
/// # Returns
/// * `Ok(())` if valid
/// * `Err(Vec<String>)` with every violation otherwise
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Quick check: true/false only.
pub fn is_valid(schema: &Value, data: &Value) -> bool {
    jsonschema::draft7::is_valid(schema, data)
}

/// Validate a translation document.
pub fn validate_translations(data: &Value) -> Result<(), Vec<String>> {
    validate(&TRANSLATIONS_SCHEMA, data)
}

pub fn is_valid_translations(data: &Value) -> bool {
    is_valid(&TRANSLATIONS_SCHEMA, data)
}
