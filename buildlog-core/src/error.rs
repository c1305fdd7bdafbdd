//! Error types for buildlog-core

use thiserror::Error;

/// Main error type for the buildlog-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// A value could not be parsed from text
    #[error("invalid {kind}: {input:?}")]
    Parse { kind: &'static str, input: String },
}

impl Error {
    pub(crate) fn parse(kind: &'static str, input: &str) -> Self {
        Error::Parse {
            kind,
            input: input.to_string(),
        }
    }
}

/// Result type alias for buildlog-core
pub type Result<T> = std::result::Result<T, Error>;
