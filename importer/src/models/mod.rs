//! Domain models for the catalog import.
//!
//! - [`Table`] - Header row plus rows of optional cells (the loaded CSV)
//! - [`UniqueList`] - Insertion-ordered set used for every derived collection
//! - [`Binding`] - A (piece, tag) association
//! - [`TagSets`] - Tags split by the column they came from
//! - [`NormalizedCatalog`] - Everything derived from one CSV

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// =============================================================================
// Table
// =============================================================================

/// A loaded CSV: ordered headers and rows of cells.
///
/// A missing cell is `None`; an empty string never appears as a value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self { headers, rows: Vec::new() }
    }

    /// Append a row, padding or truncating it to the header width.
    pub fn push_row(&mut self, mut row: Vec<Option<String>>) {
        row.resize(self.headers.len(), None);
        self.rows.push(row);
    }

    /// Index of the first column with this exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell value at `row`, `column`.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .and_then(|c| c.as_deref())
    }

    /// Non-missing values of a column, in row order.
    pub fn column_values(&self, column: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .filter_map(move |r| r.get(column).and_then(|c| c.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// =============================================================================
// UniqueList
// =============================================================================

/// Distinct values in first-seen order.
#[derive(Debug, Clone)]
pub struct UniqueList<T> {
    items: Vec<T>,
    seen: HashSet<T>,
}

impl<T: Clone + Eq + std::hash::Hash> UniqueList<T> {
    pub fn new() -> Self {
        Self { items: Vec::new(), seen: HashSet::new() }
    }

    /// Add a value; returns `false` if it was already present.
    pub fn insert(&mut self, value: T) -> bool {
        if self.seen.contains(&value) {
            return false;
        }
        self.seen.insert(value.clone());
        self.items.push(value);
        true
    }

    pub fn contains(&self, value: &T) -> bool {
        self.seen.contains(value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: PartialEq> PartialEq for UniqueList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Eq> Eq for UniqueList<T> {}

impl<T: Clone + Eq + std::hash::Hash> Default for UniqueList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Eq + std::hash::Hash> Extend<T> for UniqueList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Clone + Eq + std::hash::Hash> FromIterator<T> for UniqueList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<'a, T> IntoIterator for &'a UniqueList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// =============================================================================
// Catalog entities
// =============================================================================

/// "This piece is tagged with this tag."
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Binding {
    pub piece: String,
    pub tag: String,
}

impl Binding {
    pub fn new(piece: impl Into<String>, tag: impl Into<String>) -> Self {
        Self { piece: piece.into(), tag: tag.into() }
    }
}

/// Distinct tag values per source column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSets {
    pub composers: UniqueList<String>,
    pub instruments: UniqueList<String>,
    pub grades: UniqueList<String>,
    pub scales: UniqueList<String>,
}

impl TagSets {
    /// Union of all categories; a value present in several collapses to one.
    pub fn vocabulary(&self) -> UniqueList<String> {
        self.composers
            .iter()
            .chain(self.instruments.iter())
            .chain(self.grades.iter())
            .chain(self.scales.iter())
            .cloned()
            .collect()
    }
}

/// Output of the catalog transform.
#[derive(Debug, Clone)]
pub struct NormalizedCatalog {
    /// Renamed and deduplicated rows
    pub table: Table,
    /// Source column name -> canonical name, for every renamed column
    pub renamed: Vec<(String, String)>,
    /// Rows dropped because their ID was already seen
    pub duplicates_dropped: usize,
    pub types: UniqueList<String>,
    pub tag_sets: TagSets,
    pub tags: UniqueList<String>,
    pub pieces: UniqueList<String>,
    pub bindings: UniqueList<Binding>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_list_keeps_first_seen_order() {
        let list: UniqueList<&str> = ["b", "a", "b", "c", "a"].into_iter().collect();
        assert_eq!(list.as_slice(), &["b", "a", "c"]);
        assert!(list.contains(&"c"));
    }

    #[test]
    fn test_push_row_pads_short_rows() {
        let mut table = Table::new(vec!["ID".into(), "Name".into(), "Type".into()]);
        table.push_row(vec![Some("1".into())]);
        assert_eq!(table.rows[0].len(), 3);
        assert_eq!(table.cell(0, 0), Some("1"));
        assert_eq!(table.cell(0, 2), None);
    }

    #[test]
    fn test_column_index_first_wins() {
        let table = Table::new(vec!["Name".into(), "ID".into(), "Name".into()]);
        assert_eq!(table.column_index("Name"), Some(0));
        assert_eq!(table.column_index("Missing"), None);
    }

    #[test]
    fn test_vocabulary_collapses_across_categories() {
        let mut sets = TagSets::default();
        sets.composers.insert("Bach".into());
        sets.instruments.insert("Piano".into());
        sets.scales.insert("Piano".into());
        sets.grades.insert("3".into());

        let vocab = sets.vocabulary();
        assert_eq!(vocab.as_slice(), &["Bach", "Piano", "3"]);
    }
}
