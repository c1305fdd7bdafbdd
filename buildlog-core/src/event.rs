//! Log events and how they reach a handler
//!
//! Callers emit events through a [`Log`]. A `Log` does no I/O of its own: it
//! renders the value into a [`Doc`], wraps it in a [`LogEvent`] and hands it
//! to whatever [`Handler`] the program was wired with. The handler decides
//! what to filter, how to flatten the document and where to write it.
//!
//! ```rust
//! use buildlog_core::event::{from_fn, interpret, LogEvent, Severity};
//! use std::cell::RefCell;
//!
//! let seen = RefCell::new(Vec::new());
//! let handler = from_fn(|event: &LogEvent| {
//!     seen.borrow_mut().push(event.severity);
//!     Ok(())
//! });
//!
//! let answer = interpret(&handler, |log| {
//!     log.info("resolving dependencies");
//!     log.warn("cache is cold");
//!     42
//! })
//! .unwrap();
//!
//! assert_eq!(answer, 42);
//! assert_eq!(*seen.borrow(), vec![Severity::Info, Severity::Warn]);
//! ```

use crate::doc::Doc;
use crate::error::{Error, Result};
use crate::render::Render;
use std::cell::RefCell;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

// ============================================
// Severity
// ============================================

/// Importance of a log event, ordered `Debug < Info < Warn < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
}

impl Severity {
    /// All severities, lowest first.
    pub const ALL: [Severity; 4] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
    ];

    /// Canonical upper-case name used in log files and stored rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            _ => Err(Error::parse("severity", s)),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================
// Events and handlers
// ============================================

/// A single emitted event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub severity: Severity,
    pub document: Doc,
}

impl LogEvent {
    pub fn new(severity: Severity, value: impl Render) -> Self {
        Self {
            severity,
            document: value.render(),
        }
    }
}

/// Consumer of log events.
///
/// Returning from `handle` resumes the emitting caller. Sinks that swallow
/// their own failures always return `Ok(())`.
pub trait Handler {
    fn handle(&self, event: &LogEvent) -> Result<()>;
}

impl<H: Handler + ?Sized> Handler for &H {
    fn handle(&self, event: &LogEvent) -> Result<()> {
        (**self).handle(event)
    }
}

impl<H: Handler + ?Sized> Handler for Box<H> {
    fn handle(&self, event: &LogEvent) -> Result<()> {
        (**self).handle(event)
    }
}

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn handle(&self, event: &LogEvent) -> Result<()> {
        (**self).handle(event)
    }
}

/// A handler backed by a closure. See [`from_fn`].
pub struct FnHandler<F>(F);

/// Use a closure as a handler.
pub fn from_fn<F>(f: F) -> FnHandler<F>
where
    F: Fn(&LogEvent) -> Result<()>,
{
    FnHandler(f)
}

impl<F> Handler for FnHandler<F>
where
    F: Fn(&LogEvent) -> Result<()>,
{
    fn handle(&self, event: &LogEvent) -> Result<()> {
        (self.0)(event)
    }
}

/// Two handlers attached to one emission point.
///
/// Each event goes to `first`, then to `second`. Both are always invoked;
/// if both fail, the first failure is returned.
pub struct Fanout<A, B> {
    first: A,
    second: B,
}

impl<A: Handler, B: Handler> Handler for Fanout<A, B> {
    fn handle(&self, event: &LogEvent) -> Result<()> {
        let first = self.first.handle(event);
        let second = self.second.handle(event);
        first.and(second)
    }
}

/// Handler combinators.
pub trait HandlerExt: Handler + Sized {
    /// Attach another handler that receives every event after this one.
    fn and<H: Handler>(self, other: H) -> Fanout<Self, H> {
        Fanout {
            first: self,
            second: other,
        }
    }
}

impl<H: Handler> HandlerExt for H {}

/// Handler that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl Handler for Discard {
    fn handle(&self, _event: &LogEvent) -> Result<()> {
        Ok(())
    }
}

// ============================================
// Emission
// ============================================

/// Emission context handed to a program by [`interpret`].
///
/// Emitting never fails. When the handler reports an error, the first one
/// is kept and returned by [`Log::finish`]; later events are still
/// delivered so that other sinks composed into the handler keep working.
pub struct Log<'h> {
    handler: &'h dyn Handler,
    failure: RefCell<Option<Error>>,
}

impl<'h> Log<'h> {
    pub fn new(handler: &'h dyn Handler) -> Self {
        Self {
            handler,
            failure: RefCell::new(None),
        }
    }

    /// Emit `value` at `severity`.
    pub fn emit(&self, severity: Severity, value: impl Render) {
        let event = LogEvent::new(severity, value);
        if let Err(e) = self.handler.handle(&event) {
            let mut failure = self.failure.borrow_mut();
            if failure.is_none() {
                tracing::debug!(error = %e, "log handler failed");
                *failure = Some(e);
            }
        }
    }

    pub fn debug(&self, value: impl Render) {
        self.emit(Severity::Debug, value)
    }

    pub fn info(&self, value: impl Render) {
        self.emit(Severity::Info, value)
    }

    pub fn warn(&self, value: impl Render) {
        self.emit(Severity::Warn, value)
    }

    pub fn error(&self, value: impl Render) {
        self.emit(Severity::Error, value)
    }

    /// Whether the handler has reported a failure so far.
    pub fn has_failed(&self) -> bool {
        self.failure.borrow().is_some()
    }

    /// Close the context, returning the first handler failure if any.
    pub fn finish(self) -> Result<()> {
        match self.failure.into_inner() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Run `program`, routing every event it emits through `handler`.
///
/// Returns the program's result, or the first error the handler reported.
pub fn interpret<T>(handler: &dyn Handler, program: impl FnOnce(&Log<'_>) -> T) -> Result<T> {
    let log = Log::new(handler);
    let value = program(&log);
    log.finish()?;
    Ok(value)
}
