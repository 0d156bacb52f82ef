//! Raw responses collected during an interactive run.

use std::collections::HashMap;

/// Raw text per column of one table. A missing column is absent (skipped).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableResponses {
    values: HashMap<String, String>,
}

impl TableResponses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    pub fn set(&mut self, column: impl Into<String>, raw: impl Into<String>) {
        self.values.insert(column.into(), raw.into());
    }

    /// Mark a column as absent.
    pub fn clear(&mut self, column: &str) {
        self.values.remove(column);
    }

    /// Number of columns holding a value.
    pub fn present(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Responses for every prompted table, keyed by table name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseSet {
    tables: HashMap<String, TableResponses>,
}

impl ResponseSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Response set for `table`, created empty on first access.
    pub fn table_mut(&mut self, table: &str) -> &mut TableResponses {
        self.tables.entry(table.to_string()).or_default()
    }

    pub fn table(&self, table: &str) -> Option<&TableResponses> {
        self.tables.get(table)
    }

    pub fn get(&self, table: &str, column: &str) -> Option<&str> {
        self.table(table).and_then(|responses| responses.get(column))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
