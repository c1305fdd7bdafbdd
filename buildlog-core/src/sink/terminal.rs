//! Console output

use crate::doc::Doc;
use crate::error::Result;
use crate::event::{Handler, LogEvent, Severity};
use crate::verbosity::Verbosity;
use crossterm::style::Color;
use std::io::{self, Stdout, Write};
use std::sync::{Mutex, PoisonError};

/// Writes admitted events as ANSI-coloured lines.
///
/// Console writes are treated as infallible: errors from the writer are
/// ignored and `handle` always succeeds.
pub struct TerminalHandler<W = Stdout> {
    verbosity: Verbosity,
    out: Mutex<W>,
}

impl TerminalHandler<Stdout> {
    /// A terminal handler writing to standard output.
    pub fn stdout(verbosity: Verbosity) -> Self {
        Self::new(verbosity, io::stdout())
    }
}

impl<W: Write> TerminalHandler<W> {
    pub fn new(verbosity: Verbosity, out: W) -> Self {
        Self {
            verbosity,
            out: Mutex::new(out),
        }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Give back the writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The document a terminal line shows for `event`.
pub fn style(event: &LogEvent) -> Doc {
    let doc = event.document.clone();
    match event.severity {
        Severity::Debug => doc.fg(Color::Blue),
        Severity::Info => doc,
        Severity::Warn => Doc::text("[WARNING] ").fg(Color::Yellow) + doc,
        Severity::Error => Doc::text("[ERROR] ").fg(Color::Red) + doc,
    }
}

impl<W: Write> Handler for TerminalHandler<W> {
    fn handle(&self, event: &LogEvent) -> Result<()> {
        if !self.verbosity.admits(event.severity) {
            return Ok(());
        }

        let line = style(event);
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(out, "{}", line.ansi());
        let _ = out.flush();
        Ok(())
    }
}
