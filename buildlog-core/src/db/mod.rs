//! Database layer for buildlog
//!
//! This module provides the storage layer using SQLite with:
//! - Schema migrations
//! - The insert-only [`LogStore`] interface used by the database sink

pub mod repo;
pub mod schema;

pub use repo::{Database, LogStore};
