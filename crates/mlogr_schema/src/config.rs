//! Configuration parsing and schema validation.
//!
//! The config document is a mapping with a `tables` key listing the active
//! tables, and one sibling key per table definition:
//!
//! ```yaml
//! tables: [events]
//! events:
//!   name: text
//!   count: integer
//! ```

use crate::error::{ConfigError, Result};
use crate::types::{ColumnDef, ColumnType, TableDef};
use serde_yaml::{Mapping, Value};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Key listing the active tables.
pub const TABLES_KEY: &str = "tables";

/// Returns true if `name` matches `^[A-Za-z0-9_]+$`.
///
/// Every table and column name passes through this check before it is
/// spliced into SQL.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validated log schema. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    tables: Vec<String>,
    table_defs: Vec<TableDef>,
}

impl Schema {
    /// Load and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::NoConfigFile {
                path: path.to_path_buf(),
            });
        }

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Read config file");

        Self::from_yaml_str(&contents)
    }

    /// Decode a YAML document and validate it.
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let raw: Value = serde_yaml::from_str(contents)?;
        Self::parse(&raw)
    }

    /// Validate an already-decoded config document.
    ///
    /// Checks run in a fixed order and the first failure wins: duplicate
    /// listed tables, then each listed table's name and definition, then every
    /// definition block (listed or not) column by column.
    pub fn parse(raw: &Value) -> Result<Self> {
        debug!(raw = ?raw, "Parsing raw config");

        let doc = raw
            .as_mapping()
            .ok_or_else(|| ConfigError::malformed("top level must be a mapping"))?;

        let tables = listed_tables(doc)?;
        debug!(tables = ?tables, "Listed tables");

        let mut blocks: Vec<(String, &Value)> = Vec::new();
        for (key, value) in doc {
            let name = scalar_name(key).ok_or_else(|| {
                ConfigError::malformed(format!("key {} is not a table name", describe(key)))
            })?;
            if name == TABLES_KEY {
                continue;
            }
            blocks.push((name, value));
        }

        let mut seen = HashSet::with_capacity(tables.len());
        for table in &tables {
            if !seen.insert(table.as_str()) {
                return Err(ConfigError::DuplicateTable(table.clone()));
            }
        }

        for table in &tables {
            if !is_valid_name(table) {
                return Err(ConfigError::BadTableName(table.clone()));
            }
            if !blocks.iter().any(|(name, _)| name == table) {
                return Err(ConfigError::TableMissingDef(table.clone()));
            }
        }

        let mut table_defs = Vec::with_capacity(blocks.len());
        for (name, block) in blocks {
            table_defs.push(parse_table_def(name, block)?);
        }
        debug!(definitions = table_defs.len(), "Table definitions validated");

        Ok(Self { tables, table_defs })
    }

    /// Active tables, in prompt order.
    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    /// Every table definition, listed or not, in document order.
    pub fn table_defs(&self) -> &[TableDef] {
        &self.table_defs
    }

    pub fn table_def(&self, name: &str) -> Option<&TableDef> {
        self.table_defs.iter().find(|def| def.name() == name)
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.tables.iter().any(|t| t == name)
    }

    /// Definitions of the active tables, in prompt order.
    pub fn active_defs(&self) -> impl Iterator<Item = &TableDef> + '_ {
        self.tables.iter().filter_map(move |t| self.table_def(t))
    }

    /// Re-serialize into the config document shape.
    pub fn to_config_value(&self) -> Result<Value> {
        let mut doc = Mapping::new();
        doc.insert(
            Value::from(TABLES_KEY),
            Value::Sequence(self.tables.iter().map(|t| Value::from(t.as_str())).collect()),
        );
        for def in &self.table_defs {
            let mut columns = Mapping::new();
            for column in def.columns() {
                columns.insert(
                    Value::from(column.name.as_str()),
                    serde_yaml::to_value(column.ty)?,
                );
            }
            doc.insert(Value::from(def.name()), Value::Mapping(columns));
        }
        Ok(Value::Mapping(doc))
    }

    /// Render the schema as a YAML config document.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.to_config_value()?)?)
    }
}

fn listed_tables(doc: &Mapping) -> Result<Vec<String>> {
    let listed = doc
        .get(TABLES_KEY)
        .ok_or_else(|| ConfigError::malformed("missing required 'tables' key"))?;
    let listed = listed
        .as_sequence()
        .ok_or_else(|| ConfigError::malformed("'tables' must be a list of table names"))?;

    listed
        .iter()
        .map(|value| {
            scalar_name(value).ok_or_else(|| {
                ConfigError::malformed(format!("table entry {} is not a name", describe(value)))
            })
        })
        .collect()
}

fn parse_table_def(name: String, block: &Value) -> Result<TableDef> {
    let mapping = block.as_mapping().ok_or_else(|| {
        ConfigError::malformed(format!(
            "table '{}' must map column names to types, found {}",
            name,
            describe(block)
        ))
    })?;

    let mut columns = Vec::with_capacity(mapping.len());
    for (key, value) in mapping {
        let column = scalar_name(key).ok_or_else(|| ConfigError::BadColumnName(describe(key)))?;
        if !is_valid_name(&column) {
            return Err(ConfigError::BadColumnName(column));
        }

        // Only plain strings name a type; tagged scalars like `!real` do not.
        let ty = value
            .is_string()
            .then(|| serde_yaml::from_value::<ColumnType>(value.clone()).ok())
            .flatten()
            .ok_or_else(|| ConfigError::BadColumnType {
                column: column.clone(),
                ty: describe(value),
            })?;
        columns.push(ColumnDef::new(column, ty));
    }

    Ok(TableDef::new(name, columns))
}

/// Names may be written as YAML strings or bare numbers.
fn scalar_name(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Sequence(_) => "a list".to_string(),
        Value::Mapping(_) => "a mapping".to_string(),
        Value::Tagged(tagged) => format!("{}", tagged.tag),
    }
}
