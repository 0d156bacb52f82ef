//! mlogr - interactive data entry into SQLite log tables.
//!
//! Reads a YAML schema, prompts on the console for one row per active table,
//! lets the user review and correct the entries, then commits every row in a
//! single transaction.

pub mod app;
pub mod error;
pub mod hook;
pub mod session;

pub use app::{run, AppError, RunOptions, RunOutcome};
pub use error::HelpfulError;
pub use hook::{HookError, HookOutcome, PostHook};
pub use session::{InputSession, SessionError};
