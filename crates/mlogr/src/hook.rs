//! Post-write hook: an optional executable run after a successful commit.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use thiserror::Error;
use tracing::{debug, info};

/// Hook location relative to the working directory.
pub const DEFAULT_HOOK_PATH: &str = "hooks/post-hook";

#[derive(Error, Debug)]
pub enum HookError {
    #[error("Failed to start post-hook '{}': {source}", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Post-hook '{}' failed with {status}", path.display())]
    Failed { path: PathBuf, status: ExitStatus },

    #[error("Console error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    /// No hook installed
    Missing,
    /// Hook ran and exited successfully
    Ran,
}

/// External program invoked with no arguments once rows are committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostHook {
    pub path: PathBuf,
    pub working_dir: PathBuf,
}

impl PostHook {
    /// Hook at [`DEFAULT_HOOK_PATH`] under `working_dir`, run from there.
    pub fn in_dir(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: PathBuf::from(DEFAULT_HOOK_PATH),
            working_dir: working_dir.into(),
        }
    }

    /// Hook location with relative paths resolved against the working
    /// directory.
    pub fn resolved_path(&self) -> PathBuf {
        if self.path.is_absolute() {
            self.path.clone()
        } else {
            self.working_dir.join(&self.path)
        }
    }

    /// Run the hook if it exists. Exit status 0 is success.
    pub fn run(&self, output: &mut impl Write) -> Result<HookOutcome, HookError> {
        let path = self.resolved_path();
        if !path.is_file() {
            debug!(path = %path.display(), "No post-hook installed");
            return Ok(HookOutcome::Missing);
        }

        writeln!(output, "Running post-hook...")?;
        output.flush()?;

        let status = spawn(&path, &self.working_dir)?;
        if !status.success() {
            return Err(HookError::Failed { path, status });
        }

        info!(path = %path.display(), "Post-hook finished");
        Ok(HookOutcome::Ran)
    }
}

fn spawn(path: &Path, working_dir: &Path) -> Result<ExitStatus, HookError> {
    Command::new(path)
        .current_dir(working_dir)
        .status()
        .map_err(|source| HookError::Spawn {
            path: path.to_path_buf(),
            source,
        })
}
