//! User-facing rendering of fatal run errors.
//!
//! A report is printed as `ERROR:`, an optional `CONTEXT:` line and a list
//! of `TRY:` hints.

use crate::app::AppError;
use crate::session::SessionError;
use mlogr_db::DbError;
use mlogr_schema::ConfigError;
use std::fmt;
use std::path::Path;

/// A fatal error together with what the user can do about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpfulError {
    pub message: String,
    pub context: Option<String>,
    pub hints: Vec<String>,
}

impl HelpfulError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            hints: Vec::new(),
        }
    }

    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Append a hint; rendered with a `TRY:` prefix.
    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    fn config_not_found(path: &Path) -> Self {
        Self::new(format!("Config file not found: {}", path.display()))
            .context("mlogr needs a config file describing the log tables")
            .hint(format!("Check that the file exists: ls -la {}", path.display()))
            .hint("Point at another file: mlogr --config-file FILE")
    }

    fn invalid_config(err: &ConfigError) -> Self {
        Self::new(err.to_string())
            .context("The config file was rejected before the database was opened")
            .hint("List active tables under 'tables:' and define each one as 'column: type'")
            .hint("Names may only use letters, digits and '_'")
            .hint("Column types are boolean, integer, real or text")
    }

    fn storage(err: &DbError) -> Self {
        let report = Self::new(err.to_string());
        match err {
            DbError::Open { path, .. } => report
                .context("The database file could not be opened")
                .hint(format!("Check permissions: ls -la {}", path.display()))
                .hint("Use another database: mlogr --file FILE"),
            DbError::Insert { .. } | DbError::Transaction(_) | DbError::Coercion { .. } => {
                report.context("No rows were written; the whole entry was rolled back")
            }
            _ => report,
        }
    }

    fn table_setup(failed: &[String]) -> Self {
        Self::new(format!("Could not set up log tables: {}", failed.join(", ")))
            .context("Tables that already exist with other columns are not migrated")
            .hint("Run with --debug to see the CREATE TABLE statements")
            .hint("Avoid column names 'id' and 'timestamp', they are added to every table")
    }

    fn session(err: &SessionError) -> Self {
        let report = Self::new(err.to_string());
        match err {
            SessionError::InputClosed => report.context("Nothing was written to the database"),
            SessionError::Io(_) => report,
        }
    }
}

impl From<&AppError> for HelpfulError {
    fn from(err: &AppError) -> Self {
        match err {
            AppError::Config(ConfigError::NoConfigFile { path }) => Self::config_not_found(path),
            AppError::Config(config) => Self::invalid_config(config),
            AppError::Db(db) => Self::storage(db),
            AppError::Session(session) => Self::session(session),
            AppError::TableSetup { failed } => Self::table_setup(failed),
            AppError::Io(_) => Self::new(err.to_string()),
        }
    }
}

impl fmt::Display for HelpfulError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ERROR: {}", self.message)?;
        if let Some(context) = &self.context {
            writeln!(f, "CONTEXT: {}", context)?;
        }
        if self.hints.is_empty() {
            return Ok(());
        }
        writeln!(f)?;
        self.hints
            .iter()
            .try_for_each(|hint| writeln!(f, "  TRY: {}", hint))
    }
}

impl std::error::Error for HelpfulError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn renders_context_and_hints() {
        let report = HelpfulError::new("Disk full")
            .context("While writing rows")
            .hint("Free some space");

        assert_eq!(
            report.to_string(),
            "ERROR: Disk full\nCONTEXT: While writing rows\n\n  TRY: Free some space\n"
        );
        assert_eq!(HelpfulError::new("bare").to_string(), "ERROR: bare\n");
    }

    #[test]
    fn missing_config_points_at_flag() {
        let err = AppError::Config(ConfigError::NoConfigFile {
            path: PathBuf::from("/nonexistent/mlogr.conf"),
        });
        let display = HelpfulError::from(&err).to_string();
        assert!(display.contains("ERROR: Config file not found: /nonexistent/mlogr.conf"));
        assert!(display.contains("TRY: Point at another file: mlogr --config-file FILE"));
    }

    #[test]
    fn invalid_config_keeps_reason() {
        let err = AppError::Config(ConfigError::BadColumnType {
            column: "when".to_string(),
            ty: "date".to_string(),
        });
        let display = HelpfulError::from(&err).to_string();
        assert!(display.contains("Column 'when' has bad type definition 'date'"));
        assert!(display.contains("TRY: Column types are boolean, integer, real or text"));
    }

    #[test]
    fn table_setup_lists_failed_tables() {
        let err = AppError::TableSetup {
            failed: vec!["broken".to_string(), "old".to_string()],
        };
        let report = HelpfulError::from(&err);
        assert_eq!(report.message, "Could not set up log tables: broken, old");
        assert_eq!(report.hints.len(), 2);
    }

    #[test]
    fn closed_input_mentions_nothing_written() {
        let err = AppError::Session(SessionError::InputClosed);
        let display = HelpfulError::from(&err).to_string();
        assert!(display.contains("Nothing was written"));
    }
}
