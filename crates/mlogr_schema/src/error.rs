//! Error types for configuration loading and validation.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration result type.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration errors. All of them are fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist
    #[error("Supplied config file '{}' does not exist", path.display())]
    NoConfigFile { path: PathBuf },

    /// The configuration file exists but could not be read
    #[error("Failed to read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML
    #[error("Config file is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document does not have the expected shape
    #[error("Malformed config: {reason}")]
    Malformed { reason: String },

    /// A table is listed more than once
    #[error("Table '{0}' is listed more than once")]
    DuplicateTable(String),

    /// A table name fails the identifier pattern
    #[error("Table '{0}' has a bad name")]
    BadTableName(String),

    /// A listed table has no definition block
    #[error("Table '{0}' is not defined in the config file")]
    TableMissingDef(String),

    /// A column name fails the identifier pattern
    #[error("Column '{0}' has an invalid name")]
    BadColumnName(String),

    /// A column declares a type outside the supported set
    #[error("Column '{column}' has bad type definition '{ty}'")]
    BadColumnType { column: String, ty: String },
}

impl ConfigError {
    /// Create a malformed document error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }
}
