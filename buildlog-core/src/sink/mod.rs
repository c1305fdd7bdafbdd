//! Handlers that perform the actual output
//!
//! - [`TerminalHandler`]: coloured lines on standard output, filtered by verbosity
//! - [`FileHandler`]: timestamped plain lines appended to a file, filtered by verbosity
//! - [`DatabaseHandler`]: one stored row per event for a job, unfiltered

pub mod database;
pub mod file;
pub mod terminal;

pub use database::DatabaseHandler;
pub use file::FileHandler;
pub use terminal::TerminalHandler;
