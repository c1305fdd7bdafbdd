//! Append-only log file output
//!
//! Each admitted event becomes one line:
//!
//! ```text
//! [2025-03-01T12:00:00.000Z INFO] build ok
//! ```
//!
//! A document with line breaks keeps them; continuation lines are indented
//! by [`INDENT`](crate::doc::INDENT) spaces so every record still starts
//! with `[`:
//!
//! ```text
//! [2025-03-01T12:00:00.000Z ERROR] link failed
//!   undefined symbol: main
//! ```
//!
//! The file is opened in append mode for every line and closed again, so
//! several handlers (or processes) may target the same path. Atomicity of
//! each line relies on the operating system's append semantics.

use crate::doc::Doc;
use crate::error::Result;
use crate::event::{Handler, LogEvent};
use crate::verbosity::Verbosity;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fs::OpenOptions;
use std::io::{self, Stderr, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Appends admitted events to a file.
///
/// Write failures never reach the caller: each one is reported as a single
/// line on the error console (standard error by default) and the event is
/// dropped.
pub struct FileHandler<E = Stderr> {
    verbosity: Verbosity,
    path: PathBuf,
    errors: Mutex<E>,
}

impl FileHandler<Stderr> {
    pub fn new(verbosity: Verbosity, path: impl Into<PathBuf>) -> Self {
        Self::with_error_console(verbosity, path, io::stderr())
    }
}

impl<E: Write> FileHandler<E> {
    /// A file handler that reports write failures to `errors`.
    pub fn with_error_console(verbosity: Verbosity, path: impl Into<PathBuf>, errors: E) -> Self {
        Self {
            verbosity,
            path: path.into(),
            errors: Mutex::new(errors),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Give back the error console.
    pub fn into_error_console(self) -> E {
        self.errors.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn append(&self, line: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        // One write per line keeps concurrent appends from interleaving.
        file.write_all(line.as_bytes())
    }

    fn report(&self, error: &io::Error) {
        tracing::debug!(path = %self.path.display(), %error, "log file append failed");
        let mut errors = self.errors.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(
            errors,
            "failed to write log file {}: {}",
            self.path.display(),
            error
        );
    }
}

/// Format one log file record, including the trailing newline.
pub fn format_line(timestamp: DateTime<Utc>, event: &LogEvent) -> String {
    let header = format!(
        "[{} {}] ",
        timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        event.severity.as_str()
    );
    let record = Doc::text(header) + event.document.clone().nest();
    format!("{}\n", record.plain())
}

impl<E: Write> Handler for FileHandler<E> {
    fn handle(&self, event: &LogEvent) -> Result<()> {
        if !self.verbosity.admits(event.severity) {
            return Ok(());
        }

        let line = format_line(Utc::now(), event);
        if let Err(e) = self.append(&line) {
            self.report(&e);
        }
        Ok(())
    }
}
