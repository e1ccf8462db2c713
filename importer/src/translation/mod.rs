//! Column translation table.
//!
//! Maps a canonical column key to the labels that column carries in each
//! export language. A column is renamed to the English label of the first
//! key (in document order) that lists its name in any variant.
//!
//! ```text
//! {
//!   "Name": [ { "en": "Name", "nb": "Navn" }, { "en": "Title", "nb": "Tittel" } ],
//!   ...
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;

use crate::error::{TranslationError, TranslationResult};
use crate::validation::validate_translations;

/// Language code of the canonical label.
pub const CANONICAL_LANGUAGE: &str = "en";

/// Language code -> label
pub type LabelVariant = BTreeMap<String, String>;

/// One canonical key and its label variants.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationEntry {
    pub key: String,
    /// English label of the first variant; the rename target
    pub canonical: String,
    pub variants: Vec<LabelVariant>,
}

impl TranslationEntry {
    /// True if any variant labels a column with exactly this name.
    pub fn matches(&self, column: &str) -> bool {
        self.variants
            .iter()
            .any(|variant| variant.values().any(|label| label == column))
    }
}

/// Ordered translation table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationTable {
    entries: Vec<TranslationEntry>,
}

impl TranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a translation file.
    pub fn load(path: impl AsRef<Path>) -> TranslationResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| TranslationError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> TranslationResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Build from an already parsed document, validating it first.
    pub fn from_value(value: &Value) -> TranslationResult<Self> {
        validate_translations(value).map_err(|errors| TranslationError::SchemaError { errors })?;

        let mut table = Self::new();
        if let Some(object) = value.as_object() {
            for (key, variants) in object {
                let variants: Vec<LabelVariant> = serde_json::from_value(variants.clone())?;
                table.push(key.clone(), variants)?;
            }
        }
        Ok(table)
    }

    /// Append a key. Its first variant must have an English label.
    pub fn push(
        &mut self,
        key: impl Into<String>,
        variants: Vec<LabelVariant>,
    ) -> TranslationResult<()> {
        let key = key.into();
        let canonical = variants
            .first()
            .and_then(|v| v.get(CANONICAL_LANGUAGE))
            .cloned()
            .ok_or_else(|| TranslationError::MissingEnglish(key.clone()))?;

        self.entries.push(TranslationEntry {
            key,
            canonical,
            variants,
        });
        Ok(())
    }

    /// Canonical name for a column, if any key lists it. First key wins.
    pub fn canonical_name(&self, column: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.matches(column))
            .map(|entry| entry.canonical.as_str())
    }

    /// Canonical name for a column, or the column itself when unknown.
    pub fn translate<'a>(&'a self, column: &'a str) -> &'a str {
        self.canonical_name(column).unwrap_or(column)
    }

    pub fn entries(&self) -> &[TranslationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
