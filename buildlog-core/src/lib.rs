//! # buildlog-core
//!
//! Core library for buildlog - severity-tagged log events for build jobs.
//!
//! This library provides:
//! - Styled documents and the [`Render`] capability that produces them
//! - The emission context ([`Log`]) and the [`Handler`] trait events are routed through
//! - Terminal, log file and SQLite handlers
//! - Configuration management
//!
//! ## Architecture
//!
//! Events flow one way:
//! - **Emit:** a caller renders a value into a [`Doc`] and emits it at a [`Severity`]
//! - **Route:** the [`Log`] hands each event, in order, to the wired handler
//! - **Sink:** the handler filters, flattens (plain or ANSI) and writes
//!
//! ## Example
//!
//! ```rust,no_run
//! use buildlog_core::sink::{FileHandler, TerminalHandler};
//! use buildlog_core::{interpret, HandlerExt, Verbosity};
//!
//! let handler = TerminalHandler::stdout(Verbosity::Normal)
//!     .and(FileHandler::new(Verbosity::Verbose, "/tmp/build.log"));
//!
//! interpret(&handler, |log| {
//!     log.debug("cache hit");
//!     log.info("build ok");
//! })
//! .expect("log handler failed");
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use db::{Database, LogStore};
pub use doc::Doc;
pub use error::{Error, Result};
pub use event::{from_fn, interpret, Handler, HandlerExt, Log, LogEvent, Severity};
pub use render::Render;
pub use types::*;
pub use verbosity::Verbosity;

// Public modules
pub mod config;
pub mod db;
pub mod doc;
pub mod error;
pub mod event;
pub mod logging;
pub mod render;
pub mod sink;
pub mod types;
pub mod verbosity;
