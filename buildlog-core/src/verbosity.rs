//! Output filtering policy for the terminal and file sinks

use crate::error::{Error, Result};
use crate::event::Severity;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Which severities reach an output sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Nothing is written
    Quiet,
    /// Everything except debug events
    #[default]
    Normal,
    /// Everything
    Verbose,
}

impl Verbosity {
    /// Whether an event of `severity` passes this policy.
    pub fn admits(&self, severity: Severity) -> bool {
        match self {
            Verbosity::Quiet => false,
            Verbosity::Normal => severity != Severity::Debug,
            Verbosity::Verbose => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
        }
    }
}

impl FromStr for Verbosity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" => Ok(Verbosity::Quiet),
            "normal" => Ok(Verbosity::Normal),
            "verbose" => Ok(Verbosity::Verbose),
            _ => Err(Error::parse("verbosity", s)),
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
