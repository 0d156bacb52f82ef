//! SQL statement building for log tables.
//!
//! Identifiers are restricted to `[A-Za-z0-9_]+` and double-quoted; values
//! are never spliced into statement text, only bound as parameters.

use crate::error::{DbError, Result};
use mlogr_schema::{is_valid_name, TableDef};

/// Leading columns present in every log table.
pub const ID_COLUMN: &str = "id";
pub const TIMESTAMP_COLUMN: &str = "timestamp";

/// Quote a table or column name for use in a statement.
pub fn quote_ident(name: &str) -> Result<String> {
    if !is_valid_name(name) {
        return Err(DbError::InvalidIdentifier(name.to_string()));
    }
    Ok(format!("\"{}\"", name))
}

/// `CREATE TABLE "<name>" (id INTEGER PRIMARY KEY, timestamp INTEGER, ...)`
pub fn create_table_sql(def: &TableDef) -> Result<String> {
    let mut columns = vec![
        format!("{} INTEGER PRIMARY KEY", ID_COLUMN),
        format!("{} INTEGER", TIMESTAMP_COLUMN),
    ];
    for column in def.columns() {
        columns.push(format!("{} {}", quote_ident(&column.name)?, column.ty.sql_type()));
    }

    Ok(format!(
        "CREATE TABLE {} ({})",
        quote_ident(def.name())?,
        columns.join(", ")
    ))
}

/// `INSERT INTO "<name>" (timestamp, ...) VALUES (?, ...)`
pub fn insert_sql(def: &TableDef) -> Result<String> {
    let mut columns = vec![TIMESTAMP_COLUMN.to_string()];
    for column in def.columns() {
        columns.push(quote_ident(&column.name)?);
    }
    let placeholders: Vec<&str> = columns.iter().map(|_| "?").collect();

    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(def.name())?,
        columns.join(", "),
        placeholders.join(", ")
    ))
}
