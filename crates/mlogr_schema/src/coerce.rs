//! Raw console text → typed column values.

use crate::types::ColumnType;
use std::fmt;
use thiserror::Error;

/// A value ready to be bound into an insert statement
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Boolean(bool),
    Integer(i64),
    Real(f64),
    Text(String),
}

impl TypedValue {
    pub fn column_type(&self) -> ColumnType {
        match self {
            Self::Boolean(_) => ColumnType::Boolean,
            Self::Integer(_) => ColumnType::Integer,
            Self::Real(_) => ColumnType::Real,
            Self::Text(_) => ColumnType::Text,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(v) => write!(f, "{}", v),
            Self::Integer(v) => write!(f, "{}", v),
            Self::Real(v) => write!(f, "{}", v),
            Self::Text(v) => f.write_str(v),
        }
    }
}

/// Errors raised while checking or converting a response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoercionError {
    /// Text that does not parse as the column's type. Recoverable: the
    /// session re-prompts for the same column.
    #[error("Bad response '{value}' for column '{column}' of type '{ty}'")]
    BadResponse {
        column: String,
        ty: ColumnType,
        value: String,
    },

    /// A type tag that is not part of the schema vocabulary. Only reachable
    /// when an unvalidated tag gets past the config layer.
    #[error("Invalid type '{ty}' for value '{value}'")]
    InvalidType { ty: String, value: String },
}

impl ColumnType {
    /// Check that `raw` can be coerced without materializing the value.
    pub fn validate(&self, column: &str, raw: &str) -> Result<(), CoercionError> {
        let ok = match self {
            Self::Boolean | Self::Text => true,
            Self::Integer => raw.trim().parse::<i64>().is_ok(),
            Self::Real => parse_real(raw).is_some(),
        };
        if ok {
            Ok(())
        } else {
            Err(self.bad_response(column, raw))
        }
    }

    /// Convert `raw` into the typed value stored for this column.
    ///
    /// Booleans are truthy for any non-empty text, so `"false"` and `"0"`
    /// both coerce to `true`; only empty text is `false`.
    pub fn coerce(&self, column: &str, raw: &str) -> Result<TypedValue, CoercionError> {
        match self {
            Self::Boolean => Ok(TypedValue::Boolean(!raw.is_empty())),
            Self::Integer => raw
                .trim()
                .parse::<i64>()
                .map(TypedValue::Integer)
                .map_err(|_| self.bad_response(column, raw)),
            Self::Real => parse_real(raw)
                .map(TypedValue::Real)
                .ok_or_else(|| self.bad_response(column, raw)),
            Self::Text => Ok(TypedValue::Text(raw.to_string())),
        }
    }

    fn bad_response(&self, column: &str, raw: &str) -> CoercionError {
        CoercionError::BadResponse {
            column: column.to_string(),
            ty: *self,
            value: raw.to_string(),
        }
    }
}

/// NaN is refused: SQLite binds it as NULL, which would read back as a
/// skipped column.
fn parse_real(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Coerce `raw` using a type tag that has not been resolved yet.
pub fn coerce_tagged(tag: &str, column: &str, raw: &str) -> Result<TypedValue, CoercionError> {
    let ty = ColumnType::parse(tag).ok_or_else(|| CoercionError::InvalidType {
        ty: tag.to_string(),
        value: raw.to_string(),
    })?;
    ty.coerce(column, raw)
}
