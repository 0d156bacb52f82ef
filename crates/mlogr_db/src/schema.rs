//! Log table creation.

use crate::error::{DbError, Result};
use crate::sql::create_table_sql;
use crate::LogStore;
use mlogr_schema::TableDef;
use rusqlite::OptionalExtension;
use tracing::{debug, info};

/// Outcome of [`LogStore::ensure_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStatus {
    Created,
    Existing,
}

impl LogStore {
    /// Create the log table for `def` unless it already exists.
    ///
    /// An existing table is left untouched; its columns are not compared with
    /// the definition.
    pub fn ensure_table(&self, def: &TableDef) -> Result<TableStatus> {
        let create_error = |source: rusqlite::Error| DbError::CreateTable {
            table: def.name().to_string(),
            source,
        };

        if self.table_exists(def.name()).map_err(create_error)? {
            info!(table = def.name(), "Log table exists");
            return Ok(TableStatus::Existing);
        }

        let sql = create_table_sql(def)?;
        debug!(table = def.name(), sql = %sql, "CREATE TABLE");
        self.conn.execute(&sql, []).map_err(create_error)?;

        info!(table = def.name(), "Created log table");
        Ok(TableStatus::Created)
    }

    fn table_exists(&self, name: &str) -> rusqlite::Result<bool> {
        self.conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE",
                [name],
                |_| Ok(()),
            )
            .optional()
            .map(|found| found.is_some())
    }
}
