//! SQL text generation for basic CRUD statements.
//!
//! Values are embedded as quoted literals, not bound as parameters. Nothing
//! beyond quoting is escaped, so values from untrusted input must be
//! sanitized by the caller:
//!
//! ```text
//! read("tbl", [user_group = "random'; DROP TABLE tbl; --"])
//! SELECT * FROM tbl WHERE user_group = "random'; DROP TABLE tbl; --";
//! ```
//!
//! Pass `"?"` as a value and run the statement through [`parameterized`] to
//! get a driver-parameterized query instead.
//!
//! # Example
//!
//! ```rust
//! use catalog_import::sql::{insert, parameterized, Fields, SqlValue};
//!
//! let sql = insert("test", &Fields::new().with("c1", SqlValue::Null).with("c2", "?"));
//! assert_eq!(parameterized(&sql), "INSERT INTO test (c1, c2) VALUES (NULL, ?);");
//! ```

mod value;

pub use value::{quote_literal, Fields, SqlValue};

use crate::error::SqlError;

/// Placeholder value that [`parameterized`] turns into a bare `?`.
pub const PLACEHOLDER: &str = "?";

/// Remove the quotes around every `'?'` so the statement can be bound.
pub fn parameterized(sql: &str) -> String {
    sql.replace("'?'", "?")
}

fn join_columns(fields: &Fields) -> String {
    fields.columns().collect::<Vec<_>>().join(", ")
}

fn join_values(fields: &Fields) -> String {
    fields
        .values()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_assignments(fields: &Fields, separator: &str) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{} = {}", k, v))
        .collect::<Vec<_>>()
        .join(separator)
}

fn insert_clause(table: &str, fields: &Fields) -> String {
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        join_columns(fields),
        join_values(fields)
    )
}

/// `INSERT INTO table (k1, k2) VALUES (v1, v2);`
pub fn insert(table: &str, fields: &Fields) -> String {
    format!("{};", insert_clause(table, fields))
}

/// Insert, or update the row if the key already exists.
///
/// `INSERT INTO table (k1) VALUES (v1) ON DUPLICATE KEY UPDATE k1 = v1;`
pub fn upsert(table: &str, fields: &Fields) -> String {
    format!(
        "{} ON DUPLICATE KEY UPDATE {};",
        insert_clause(table, fields),
        join_assignments(fields, ", ")
    )
}

/// `SELECT * FROM table WHERE k1 = v1 AND k2 = v2;`
///
/// With no filters the WHERE clause is left out: `SELECT * FROM table ;`
pub fn read(table: &str, filters: &Fields) -> String {
    let mut sql = format!("SELECT * FROM {} ", table);
    if !filters.is_empty() {
        sql.push_str("WHERE ");
        sql.push_str(&join_assignments(filters, " AND "));
    }
    sql.push(';');
    sql
}

/// `DELETE FROM table WHERE k1 = v1 AND ...;`
///
/// Filters are mandatory; an unfiltered delete is an error.
pub fn delete(table: &str, filters: &Fields) -> Result<String, SqlError> {
    if filters.is_empty() {
        return Err(SqlError::UnfilteredDelete {
            table: table.to_string(),
        });
    }
    Ok(format!(
        "DELETE FROM {} WHERE {};",
        table,
        join_assignments(filters, " AND ")
    ))
}

/// `CREATE TABLE` from literal column definitions.
///
/// ```text
/// CREATE TABLE tags (
/// 	id          	integer primary key autoincrement,
/// 	name        	text not null
/// );
/// ```
pub fn create_table<C, D>(table: &str, columns: &[(C, D)]) -> String
where
    C: AsRef<str>,
    D: AsRef<str>,
{
    let body = columns
        .iter()
        .map(|(name, def)| format!("\t{:<12}\t{}", name.as_ref(), def.as_ref()))
        .collect::<Vec<_>>()
        .join(",\n");

    [format!("CREATE TABLE {} (", table), body, ");".to_string()].join("\n")
}
