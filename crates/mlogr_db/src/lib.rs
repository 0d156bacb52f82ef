//! SQLite storage for mlogr log tables
//!
//! One [`LogStore`] wraps one connection. Tables are created idempotently from
//! the schema, and a run's rows are written in a single transaction.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mlogr_db::LogStore;
//!
//! let mut store = LogStore::open("mlogr.db")?;
//! for def in schema.table_defs() {
//!     store.ensure_table(def)?;
//! }
//! store.write_responses(&schema, &responses, LogStore::now_secs())?;
//! store.close()?;
//! ```

mod error;
mod schema;
pub mod sql;
mod write;

pub use error::{DbError, Result};
pub use schema::TableStatus;
pub use write::{insert_row, WriteSummary};

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing::info;

/// Exclusive handle on the log database.
pub struct LogStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl LogStore {
    /// Open or create a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path).map_err(|source| DbError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), "Database opened");

        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| DbError::Open {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        Ok(Self { conn, path: None })
    }

    /// Database file path, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Underlying connection (escape hatch for inspection in tests).
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Close the database connection.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, err)| DbError::Close(err))?;
        info!("Database closed");
        Ok(())
    }

    /// Current time as seconds since Unix epoch.
    pub fn now_secs() -> i64 {
        chrono::Utc::now().timestamp()
    }
}
