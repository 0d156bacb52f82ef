//! Error types for the storage layer.

use mlogr_schema::CoercionError;
use std::path::PathBuf;
use thiserror::Error;

/// Storage operation result type.
pub type Result<T> = std::result::Result<T, DbError>;

/// Storage errors.
#[derive(Error, Debug)]
pub enum DbError {
    /// The database file could not be opened or created
    #[error("Failed to open database '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// IO error (file system operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A table or column name that cannot be used as an SQL identifier
    #[error("Invalid SQL identifier: '{0}'")]
    InvalidIdentifier(String),

    /// CREATE TABLE failed for a reason other than the table existing
    #[error("Failed to create log table '{table}': {source}")]
    CreateTable {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    /// INSERT failed
    #[error("Failed to insert row into '{table}': {source}")]
    Insert {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    /// A stored response no longer coerces to its column type
    #[error("Cannot store response for table '{table}': {source}")]
    Coercion {
        table: String,
        #[source]
        source: CoercionError,
    },

    /// Begin/commit of the write transaction failed
    #[error("Transaction error: {0}")]
    Transaction(#[source] rusqlite::Error),

    /// Closing the connection failed
    #[error("Failed to close database: {0}")]
    Close(#[source] rusqlite::Error),
}
