//! Interactive input and correction.
//!
//! The session walks every active table column by column, then shows each
//! table's entries as a numbered menu until the user accepts it. States:
//!
//! - `Prompting(table, column)`: empty input skips the column, invalid input
//!   re-prompts the same column, valid input is stored.
//! - `Correcting(table)`: empty input accepts the table, a menu index edits
//!   that column.
//! - `CorrectingField(table, column)`: empty input keeps the current value,
//!   [`CLEAR_TOKEN`] clears it, anything else is validated and stored.
//!
//! The session ends once every active table is in the accepted set.

use mlogr_schema::{ColumnDef, ResponseSet, Schema, TableDef};
use std::collections::BTreeSet;
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::debug;

/// Input that clears a field while correcting it.
pub const CLEAR_TOKEN: &str = "-";

/// Errors that end a session without producing responses.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Input closed before every table was accepted")]
    InputClosed,

    #[error("Console error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Prompting { table: usize, column: usize },
    Correcting { table: usize },
    CorrectingField { table: usize, column: usize },
    Done,
}

/// One interactive run over the active tables of a schema.
pub struct InputSession<'s, R, W, E> {
    tables: Vec<&'s TableDef>,
    input: R,
    output: W,
    errors: E,
    responses: ResponseSet,
    accepted: BTreeSet<usize>,
}

impl<'s, R: BufRead, W: Write, E: Write> InputSession<'s, R, W, E> {
    /// Prompts go to `output`, rejected input is reported on `errors`.
    pub fn new(schema: &'s Schema, input: R, output: W, errors: E) -> Self {
        Self {
            tables: schema.active_defs().collect(),
            input,
            output,
            errors,
            responses: ResponseSet::new(),
            accepted: BTreeSet::new(),
        }
    }

    /// Run prompting and correction to completion.
    pub fn run(mut self) -> Result<ResponseSet, SessionError> {
        let mut state = self.enter(0, 0)?;
        while state != SessionState::Done {
            state = match state {
                SessionState::Prompting { table, column } => self.prompt(table, column)?,
                SessionState::Correcting { table } => self.correct(table)?,
                SessionState::CorrectingField { table, column } => {
                    self.correct_field(table, column)?
                }
                SessionState::Done => SessionState::Done,
            };
        }
        debug!(responses = ?self.responses, "Session complete");
        Ok(self.responses)
    }

    /// Next prompt at or after (`table`, `column`), announcing tables as
    /// they are entered.
    fn enter(&mut self, mut table: usize, mut column: usize) -> Result<SessionState, SessionError> {
        loop {
            let Some(def) = self.tables.get(table).copied() else {
                return Ok(self.next_unaccepted());
            };
            if column == 0 {
                self.responses.table_mut(def.name());
                writeln!(self.output, "\nGive input for {}...", def.name())?;
                writeln!(self.output, "Empty input skips value.\n")?;
            }
            if column < def.len() {
                return Ok(SessionState::Prompting { table, column });
            }
            table += 1;
            column = 0;
        }
    }

    fn prompt(&mut self, table: usize, column: usize) -> Result<SessionState, SessionError> {
        let def = self.tables[table];
        let col = &def.columns()[column];

        write!(self.output, "{} ({}): ", col.name, col.ty)?;
        let line = self.read_line()?;

        if line.is_empty() {
            debug!(table = def.name(), column = %col.name, "Skipped column");
            self.responses.table_mut(def.name()).clear(&col.name);
            return self.enter(table, column + 1);
        }

        match col.ty.validate(&col.name, &line) {
            Ok(()) => {
                self.responses.table_mut(def.name()).set(col.name.as_str(), line);
                self.enter(table, column + 1)
            }
            Err(err) => {
                writeln!(self.errors, "{}", err)?;
                Ok(SessionState::Prompting { table, column })
            }
        }
    }

    fn correct(&mut self, table: usize) -> Result<SessionState, SessionError> {
        let def = self.tables[table];

        writeln!(self.output, "\nGiven input for {}", def.name())?;
        for (index, col) in def.columns().iter().enumerate() {
            match self.responses.get(def.name(), &col.name) {
                Some(value) => writeln!(self.output, "{}) {} = {}", index, col.name, value)?,
                None => writeln!(self.output, "{}) {} =", index, col.name)?,
            }
        }
        write!(
            self.output,
            "Enter number to change given input or enter to accept: "
        )?;
        let line = self.read_line()?;

        if line.is_empty() {
            debug!(table = def.name(), "Table accepted");
            self.accepted.insert(table);
            return Ok(self.next_unaccepted());
        }

        match line.trim().parse::<usize>() {
            Ok(column) if column < def.len() => {
                writeln!(self.output, "Correct value")?;
                Ok(SessionState::CorrectingField { table, column })
            }
            _ => {
                writeln!(self.errors, "{}", menu_choice_error(&line, def))?;
                Ok(SessionState::Correcting { table })
            }
        }
    }

    fn correct_field(&mut self, table: usize, column: usize) -> Result<SessionState, SessionError> {
        let def = self.tables[table];
        let col: &ColumnDef = &def.columns()[column];
        let current = self
            .responses
            .get(def.name(), &col.name)
            .unwrap_or_default()
            .to_string();

        writeln!(
            self.output,
            "Empty input keeps the current value, '{}' clears it",
            CLEAR_TOKEN
        )?;
        write!(self.output, "{} ({}) [{}]: ", col.name, col.ty, current)?;
        let line = self.read_line()?;

        if line.is_empty() {
            return Ok(SessionState::Correcting { table });
        }
        if line == CLEAR_TOKEN {
            debug!(table = def.name(), column = %col.name, "Cleared column");
            self.responses.table_mut(def.name()).clear(&col.name);
            return Ok(SessionState::Correcting { table });
        }

        match col.ty.validate(&col.name, &line) {
            Ok(()) => {
                debug!(table = def.name(), column = %col.name, "Corrected column");
                self.responses.table_mut(def.name()).set(col.name.as_str(), line);
                Ok(SessionState::Correcting { table })
            }
            Err(err) => {
                writeln!(self.errors, "{}", err)?;
                Ok(SessionState::CorrectingField { table, column })
            }
        }
    }

    /// First active table not yet accepted, or `Done` once all are.
    fn next_unaccepted(&self) -> SessionState {
        if self.accepted.len() == self.tables.len() {
            return SessionState::Done;
        }
        (0..self.tables.len())
            .find(|t| !self.accepted.contains(t))
            .map(|table| SessionState::Correcting { table })
            .unwrap_or(SessionState::Done)
    }

    fn read_line(&mut self) -> Result<String, SessionError> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(SessionError::InputClosed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

fn menu_choice_error(line: &str, def: &TableDef) -> String {
    if def.is_empty() {
        format!(
            "Invalid choice '{}': table '{}' has no columns, enter to accept",
            line,
            def.name()
        )
    } else {
        format!(
            "Invalid choice '{}': enter a number from 0 to {} or enter to accept",
            line,
            def.len() - 1
        )
    }
}
