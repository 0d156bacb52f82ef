//! Run orchestration: config → storage → session → write → post-hook.

use crate::hook::{HookOutcome, PostHook};
use crate::session::{InputSession, SessionError};
use mlogr_db::{DbError, LogStore, TableStatus, WriteSummary};
use mlogr_schema::{ConfigError, Schema};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, error, info};

/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "mlogr.conf";
/// Default database file, relative to the working directory.
pub const DEFAULT_DATABASE_FILE: &str = "mlogr.db";

/// Settings for one run, built from the command line.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config_file: PathBuf,
    pub database: PathBuf,
    pub print_config: bool,
    pub debug: bool,
    pub post_hook: PostHook,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
            database: PathBuf::from(DEFAULT_DATABASE_FILE),
            print_config: false,
            debug: false,
            post_hook: PostHook::in_dir("."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// `--print-config`: schema printed, storage never opened
    PrintedConfig,
    /// Rows committed
    Written(WriteSummary),
}

/// Fatal run errors.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Could not set up log tables: {}", failed.join(", "))]
    TableSetup { failed: Vec<String> },

    #[error("Console error: {0}")]
    Io(#[from] io::Error),
}

/// Run mlogr against the given console.
///
/// Nothing is written to the database unless every active table was
/// accepted in the session.
pub fn run<R, W, E>(
    options: &RunOptions,
    input: R,
    mut output: W,
    mut errors: E,
) -> Result<RunOutcome, AppError>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    if options.debug {
        writeln!(output, "Printing DEBUG information...")?;
    }

    writeln!(
        output,
        "Reading configuration from {}...",
        options.config_file.display()
    )?;
    let schema = Schema::load(&options.config_file)?;
    debug!(tables = ?schema.tables(), definitions = schema.table_defs().len(), "Schema loaded");

    if options.print_config {
        write!(output, "{}", schema.to_yaml()?)?;
        return Ok(RunOutcome::PrintedConfig);
    }

    writeln!(
        output,
        "Connecting to database {}...",
        options.database.display()
    )?;
    let mut store = LogStore::open(&options.database)?;

    ensure_tables(&store, &schema, &mut output, &mut errors)?;

    let responses = InputSession::new(&schema, input, &mut output, &mut errors).run()?;

    writeln!(output, "\nWriting entered values to database...")?;
    let timestamp = LogStore::now_secs();
    let summary = store.write_responses(&schema, &responses, timestamp)?;
    store.close()?;

    match options.post_hook.run(&mut output) {
        Ok(HookOutcome::Ran) | Ok(HookOutcome::Missing) => {}
        Err(err) => {
            error!(error = %err, "Post-hook failed");
            writeln!(errors, "Error while running post-hook: {}", err)?;
        }
    }

    writeln!(output, "Done!")?;
    info!(rows = summary.rows(), "Run complete");
    Ok(RunOutcome::Written(summary))
}

/// Create every defined table, listed or not. A failing table does not stop
/// the others from being attempted; any failure aborts the run afterwards.
fn ensure_tables(
    store: &LogStore,
    schema: &Schema,
    output: &mut impl Write,
    errors: &mut impl Write,
) -> Result<(), AppError> {
    let mut failed = Vec::new();

    for def in schema.table_defs() {
        match store.ensure_table(def) {
            Ok(TableStatus::Created) => {
                writeln!(output, "Created log table '{}'...", def.name())?
            }
            Ok(TableStatus::Existing) => writeln!(output, "Log table '{}' exists...", def.name())?,
            Err(err) => {
                error!(table = def.name(), error = %err, "Table setup failed");
                writeln!(errors, "{}", err)?;
                failed.push(def.name().to_string());
            }
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(AppError::TableSetup { failed })
    }
}
