//! Column and table definition types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declared type of a log column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Boolean,
    Integer,
    Real,
    Text,
}

impl ColumnType {
    pub const ALL: [ColumnType; 4] = [Self::Boolean, Self::Integer, Self::Real, Self::Text];

    /// Tag used in configuration documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Real => "real",
            Self::Text => "text",
        }
    }

    /// Declared SQLite column type.
    pub fn sql_type(&self) -> &'static str {
        match self {
            Self::Boolean => "BOOLEAN",
            Self::Integer => "INTEGER",
            Self::Real => "REAL",
            Self::Text => "TEXT",
        }
    }

    /// Parse a configuration tag. Tags are case-sensitive.
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.as_str() == tag)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A type tag outside {boolean, integer, real, text}.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownColumnType(pub String);

impl fmt::Display for UnknownColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown column type '{}'", self.0)
    }
}

impl std::error::Error for UnknownColumnType {}

impl FromStr for ColumnType {
    type Err = UnknownColumnType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownColumnType(s.to_string()))
    }
}

/// A single typed column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub ty: ColumnType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A named log table and its columns, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDef {
    name: String,
    columns: Vec<ColumnDef>,
}

impl TableDef {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDef>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Columns in declaration order. The order drives prompting, the
    /// correction menu indices and the SQL column order.
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&ColumnDef> {
        self.columns.get(index)
    }

    pub fn find_column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_tags() {
        assert_eq!("boolean".parse::<ColumnType>(), Ok(ColumnType::Boolean));
        assert_eq!("integer".parse::<ColumnType>(), Ok(ColumnType::Integer));
        assert_eq!("real".parse::<ColumnType>(), Ok(ColumnType::Real));
        assert_eq!("text".parse::<ColumnType>(), Ok(ColumnType::Text));
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert_eq!(
            "Integer".parse::<ColumnType>(),
            Err(UnknownColumnType("Integer".to_string()))
        );
        assert!(ColumnType::parse("varchar").is_none());
    }

    #[test]
    fn table_def_lookup() {
        let def = TableDef::new(
            "events",
            vec![
                ColumnDef::new("name", ColumnType::Text),
                ColumnDef::new("count", ColumnType::Integer),
            ],
        );
        assert_eq!(def.len(), 2);
        assert_eq!(def.column(1).map(|c| c.name.as_str()), Some("count"));
        assert_eq!(def.find_column("name").map(|c| c.ty), Some(ColumnType::Text));
        assert!(def.column(2).is_none());
    }
}
