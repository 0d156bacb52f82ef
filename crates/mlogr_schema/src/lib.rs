//! Schema layer for mlogr
//!
//! Turns the decoded configuration document into a validated [`Schema`],
//! and converts raw console text into typed column values.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mlogr_schema::{ColumnType, Schema};
//!
//! let schema = Schema::load("mlogr.conf")?;
//! for table in schema.tables() {
//!     let def = schema.table_def(table).unwrap();
//!     for column in def.columns() {
//!         column.ty.validate(&column.name, "42")?;
//!     }
//! }
//! ```

mod coerce;
mod config;
mod error;
mod responses;
mod types;

pub use coerce::{coerce_tagged, CoercionError, TypedValue};
pub use config::{is_valid_name, Schema, TABLES_KEY};
pub use error::{ConfigError, Result};
pub use responses::{ResponseSet, TableResponses};
pub use types::{ColumnDef, ColumnType, TableDef, UnknownColumnType};
