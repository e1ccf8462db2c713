//! Catalog transform: rename columns, drop duplicate IDs, derive the
//! types / tags / pieces / bindings collections.

use serde::{Deserialize, Serialize};

use super::grouper::{bind_tags, TagColumn};
use crate::error::{CatalogError, CatalogResult};
use crate::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::models::{NormalizedCatalog, Table, TagSets, UniqueList};
use crate::translation::TranslationTable;

/// Canonical names of the columns the transform reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogColumns {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub composer: String,
    pub instrument: String,
    pub grade: String,
    pub scale: String,
}

impl Default for CatalogColumns {
    fn default() -> Self {
        Self {
            id: "ID".to_string(),
            name: "Name".to_string(),
            kind: "Type".to_string(),
            composer: "Composer".to_string(),
            instrument: "Instrument".to_string(),
            grade: "Grade".to_string(),
            scale: "Scale".to_string(),
        }
    }
}

/// Transform with the default column names.
pub fn transform(raw: Table, translations: &TranslationTable) -> CatalogResult<NormalizedCatalog> {
    transform_with_columns(raw, translations, &CatalogColumns::default())
}

pub fn transform_with_columns(
    raw: Table,
    translations: &TranslationTable,
    columns: &CatalogColumns,
) -> CatalogResult<NormalizedCatalog> {
    let mut table = raw;

    log_info("Checking column names");
    let renamed = rename_columns(&mut table, translations);
    for (from, to) in &renamed {
        log_info_indent(format!("{} → {}", from, to), 1);
    }

    let id_column = require_column(&table, &columns.id)?;
    let name_column = require_column(&table, &columns.name)?;

    log_info("Dropping duplicate IDs");
    let duplicates_dropped = drop_duplicate_ids(&mut table, id_column);
    if duplicates_dropped > 0 {
        log_warning(format!("Dropped {} rows with duplicate IDs", duplicates_dropped));
    }

    log_info("Generating types");
    let types = match optional_column(&table, &columns.kind) {
        Some(index) => distinct_values(&table, index),
        None => UniqueList::new(),
    };

    log_info("Generating tags");
    let composer = optional_column(&table, &columns.composer).map(TagColumn::split);
    let instrument = optional_column(&table, &columns.instrument).map(TagColumn::split);
    let grade = optional_column(&table, &columns.grade).map(TagColumn::atomic);
    let scale = optional_column(&table, &columns.scale).map(TagColumn::split);

    let tag_sets = TagSets {
        composers: collect_tags(&table, composer),
        instruments: collect_tags(&table, instrument),
        grades: collect_tags(&table, grade),
        scales: collect_tags(&table, scale),
    };
    let tags = tag_sets.vocabulary();

    log_info("Generating pieces");
    let pieces = distinct_values(&table, name_column);

    log_info("Binding pieces and tags");
    let tag_columns: Vec<TagColumn> = [composer, instrument, grade, scale]
        .into_iter()
        .flatten()
        .collect();
    let bindings = bind_tags(&table, name_column, &tag_columns);

    log_success(format!(
        "{} rows, {} types, {} tags, {} pieces, {} bindings",
        table.len(),
        types.len(),
        tags.len(),
        pieces.len(),
        bindings.len()
    ));

    Ok(NormalizedCatalog {
        table,
        renamed,
        duplicates_dropped,
        types,
        tag_sets,
        tags,
        pieces,
        bindings,
    })
}

/// Rename every column the translation table knows to its canonical name.
///
/// Returns the `(source, canonical)` pairs that actually changed.
pub fn rename_columns(table: &mut Table, translations: &TranslationTable) -> Vec<(String, String)> {
    let mut renamed = Vec::new();
    for header in table.headers.iter_mut() {
        if let Some(canonical) = translations.canonical_name(header) {
            if canonical != header.as_str() {
                renamed.push((header.clone(), canonical.to_string()));
                *header = canonical.to_string();
            }
        }
    }
    renamed
}

/// Keep the first row of every ID, in file order. Returns the number of
/// rows dropped.
///
/// A missing ID is treated as one more ID value, so only the first row
/// without an ID survives.
pub fn drop_duplicate_ids(table: &mut Table, id_column: usize) -> usize {
    let before = table.rows.len();
    let mut seen: UniqueList<Option<String>> = UniqueList::new();
    table
        .rows
        .retain(|row| seen.insert(row.get(id_column).cloned().flatten()));
    before - table.rows.len()
}

/// Distinct non-missing values of a column.
pub fn distinct_values(table: &Table, column: usize) -> UniqueList<String> {
    table.column_values(column).map(String::from).collect()
}

fn collect_tags(table: &Table, column: Option<TagColumn>) -> UniqueList<String> {
    let mut tags = UniqueList::new();
    if let Some(column) = column {
        for cell in table.column_values(column.index) {
            tags.extend(column.explode(cell).into_iter().map(String::from));
        }
    }
    tags
}

fn require_column(table: &Table, name: &str) -> CatalogResult<usize> {
    table
        .column_index(name)
        .ok_or_else(|| CatalogError::MissingColumn(name.to_string()))
}

fn optional_column(table: &Table, name: &str) -> Option<usize> {
    let index = table.column_index(name);
    if index.is_none() {
        log_warning(format!("Column '{}' not found, skipping", name));
    }
    index
}
