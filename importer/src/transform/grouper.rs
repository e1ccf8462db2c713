//! Group catalog rows by piece and collect each piece's tags.
//!
//! Several rows can describe the same piece (one per edition, arrangement or
//! lesson). Their tag fields are merged into one set of bindings:
//!
//! ```text
//! CSV rows                                  Bindings
//! ┌──────────────────────────────────┐     ┌──────────────────────┐
//! │ Name: Minuet, Composer: Bach     │     │ (Minuet, Bach)       │
//! │ Name: Minuet, Instrument: Violin │  →  │ (Minuet, Violin)     │
//! │ Name: Gavotte, Composer: Bach    │     │ (Gavotte, Bach)      │
//! └──────────────────────────────────┘     └──────────────────────┘
//! ```

use std::collections::HashMap;

use crate::models::{Binding, Table, UniqueList};

/// A tag-producing column and how its cells are exploded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagColumn {
    pub index: usize,
    /// Split cells on `/` (false for atomic values such as grade)
    pub split: bool,
}

impl TagColumn {
    pub fn split(index: usize) -> Self {
        Self { index, split: true }
    }

    pub fn atomic(index: usize) -> Self {
        Self { index, split: false }
    }

    /// Tags contained in one cell.
    pub fn explode<'a>(&self, cell: &'a str) -> Vec<&'a str> {
        if self.split {
            split_tags(cell).collect()
        } else {
            let value = cell.trim();
            if value.is_empty() { Vec::new() } else { vec![value] }
        }
    }
}

/// Split a multi-value cell on `/`.
///
/// The cell and every fragment are trimmed; empty fragments are dropped.
pub fn split_tags(cell: &str) -> impl Iterator<Item = &str> {
    cell.trim()
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Accumulates the tags of all rows sharing one piece name.
struct PieceBuilder {
    name: String,
    tags: UniqueList<String>,
}

impl PieceBuilder {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tags: UniqueList::new(),
        }
    }

    fn add_row(&mut self, table: &Table, row: usize, columns: &[TagColumn]) {
        for column in columns {
            if let Some(cell) = table.cell(row, column.index) {
                self.tags
                    .extend(column.explode(cell).into_iter().map(String::from));
            }
        }
    }

    fn build(self, bindings: &mut UniqueList<Binding>) {
        for tag in self.tags.into_vec() {
            bindings.insert(Binding::new(self.name.clone(), tag));
        }
    }
}

/// Bind every piece to the union of its rows' tags.
///
/// Rows without a name are ignored. Bindings come out grouped by piece, in
/// first-seen order.
pub fn bind_tags(table: &Table, name_column: usize, columns: &[TagColumn]) -> UniqueList<Binding> {
    let mut builders: Vec<PieceBuilder> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();

    for row in 0..table.len() {
        let Some(name) = table.cell(row, name_column) else {
            continue;
        };
        let slot = *by_name.entry(name.to_string()).or_insert_with(|| {
            builders.push(PieceBuilder::new(name));
            builders.len() - 1
        });
        builders[slot].add_row(table, row, columns);
    }

    let mut bindings = UniqueList::new();
    for builder in builders {
        builder.build(&mut bindings);
    }
    bindings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[[Option<&str>; 3]]) -> Table {
        let mut t = Table::new(vec!["Name".into(), "Composer".into(), "Grade".into()]);
        for r in rows {
            t.push_row(r.iter().map(|c| c.map(String::from)).collect());
        }
        t
    }

    const COLUMNS: [TagColumn; 2] = [
        TagColumn { index: 1, split: true },
        TagColumn { index: 2, split: false },
    ];

    #[test]
    fn test_split_tags() {
        let tags: Vec<&str> = split_tags("Violin/Piano").collect();
        assert_eq!(tags, vec!["Violin", "Piano"]);

        let tags: Vec<&str> = split_tags("  Violin / Piano ").collect();
        assert_eq!(tags, vec!["Violin", "Piano"]);

        let tags: Vec<&str> = split_tags("Bach//").collect();
        assert_eq!(tags, vec!["Bach"]);

        assert_eq!(split_tags("   ").count(), 0);
    }

    #[test]
    fn test_atomic_column_not_split() {
        assert_eq!(TagColumn::atomic(0).explode(" 3/4 "), vec!["3/4"]);
        assert!(TagColumn::atomic(0).explode("  ").is_empty());
    }

    #[test]
    fn test_rows_with_same_name_are_merged() {
        let t = table(&[
            [Some("Minuet"), Some("Bach"), Some("1")],
            [Some("Minuet"), Some("Petzold"), Some("1")],
            [Some("Gavotte"), Some("Bach"), None],
        ]);

        let bindings = bind_tags(&t, 0, &COLUMNS);
        assert_eq!(
            bindings.as_slice(),
            &[
                Binding::new("Minuet", "Bach"),
                Binding::new("Minuet", "1"),
                Binding::new("Minuet", "Petzold"),
                Binding::new("Gavotte", "Bach"),
            ]
        );
    }

    #[test]
    fn test_no_duplicate_bindings() {
        let t = table(&[
            [Some("Minuet"), Some("Bach/Bach"), None],
            [Some("Minuet"), Some("Bach"), None],
        ]);

        let bindings = bind_tags(&t, 0, &COLUMNS);
        assert_eq!(bindings.as_slice(), &[Binding::new("Minuet", "Bach")]);
    }

    #[test]
    fn test_rows_without_name_ignored() {
        let t = table(&[[None, Some("Bach"), Some("2")]]);
        assert!(bind_tags(&t, 0, &COLUMNS).is_empty());
    }

    #[test]
    fn test_piece_without_tags_has_no_bindings() {
        let t = table(&[[Some("Etude"), None, None]]);
        assert!(bind_tags(&t, 0, &COLUMNS).is_empty());
    }
}
