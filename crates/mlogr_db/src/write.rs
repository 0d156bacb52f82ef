//! Row insertion for a run's responses.

use crate::error::{DbError, Result};
use crate::sql::insert_sql;
use crate::LogStore;
use mlogr_schema::{ResponseSet, Schema, TableDef, TableResponses, TypedValue};
use rusqlite::types::Value;
use rusqlite::Connection;
use tracing::{debug, info};

/// Result of a write phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// Tables that received a row, in definition order.
    pub written: Vec<String>,
    /// Definitions without any entered value.
    pub skipped: Vec<String>,
}

impl WriteSummary {
    pub fn rows(&self) -> usize {
        self.written.len()
    }
}

/// Insert one row for `def`.
///
/// Binds the timestamp, then one value per column in definition order: the
/// coerced response, or NULL for an absent column.
pub fn insert_row(
    conn: &Connection,
    def: &TableDef,
    responses: &TableResponses,
    timestamp: i64,
) -> Result<()> {
    let sql = insert_sql(def)?;

    let mut values = Vec::with_capacity(def.len() + 1);
    values.push(Value::Integer(timestamp));
    for column in def.columns() {
        let value = match responses.get(&column.name) {
            Some(raw) => Some(column.ty.coerce(&column.name, raw).map_err(|source| {
                DbError::Coercion {
                    table: def.name().to_string(),
                    source,
                }
            })?),
            None => None,
        };
        values.push(to_sql_value(value));
    }

    debug!(table = def.name(), sql = %sql, values = ?values, "INSERT");

    conn.execute(&sql, rusqlite::params_from_iter(values))
        .map_err(|source| DbError::Insert {
            table: def.name().to_string(),
            source,
        })?;
    Ok(())
}

fn to_sql_value(value: Option<TypedValue>) -> Value {
    match value {
        None => Value::Null,
        Some(TypedValue::Boolean(b)) => Value::Integer(i64::from(b)),
        Some(TypedValue::Integer(i)) => Value::Integer(i),
        Some(TypedValue::Real(r)) => Value::Real(r),
        Some(TypedValue::Text(s)) => Value::Text(s),
    }
}

impl LogStore {
    /// Write one row per table definition that has at least one entered
    /// value, all inside a single transaction.
    ///
    /// Any failure rolls the whole write back.
    pub fn write_responses(
        &mut self,
        schema: &Schema,
        responses: &ResponseSet,
        timestamp: i64,
    ) -> Result<WriteSummary> {
        let tx = self.conn.transaction().map_err(DbError::Transaction)?;
        let mut summary = WriteSummary::default();

        for def in schema.table_defs() {
            match responses.table(def.name()) {
                Some(table) if !table.is_empty() => {
                    insert_row(&tx, def, table, timestamp)?;
                    summary.written.push(def.name().to_string());
                }
                _ => {
                    debug!(table = def.name(), "No values entered, skipping row");
                    summary.skipped.push(def.name().to_string());
                }
            }
        }

        tx.commit().map_err(DbError::Transaction)?;
        info!(rows = summary.rows(), timestamp, "Wrote log rows");
        Ok(summary)
    }
}
