//! Database repository layer
//!
//! Provides the insert operation used by the database sink and a plain
//! read-back of one job's rows.

use crate::error::{Error, Result};
use crate::event::Severity;
use crate::types::{JobId, LogRow};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Insert-only interface the database sink writes through.
pub trait LogStore {
    fn insert_log_row(&self, row: &LogRow) -> Result<()>;
}

impl<S: LogStore + ?Sized> LogStore for &S {
    fn insert_log_row(&self, row: &LogRow) -> Result<()> {
        (**self).insert_log_row(row)
    }
}

impl<S: LogStore + ?Sized> LogStore for Arc<S> {
    fn insert_log_row(&self, row: &LogRow) -> Result<()> {
        (**self).insert_log_row(row)
    }
}

/// Database handle (single connection shared behind a mutex)
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // WAL lets job workers in other processes append while we write
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA busy_timeout = 5000;
            ",
        )?;

        tracing::debug!(path = %path.display(), "Opened log database");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.connection();
        super::schema::run_migrations(&conn)
    }

    /// Get the underlying connection (for advanced use)
    pub fn connection(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All rows stored for `job_id`, in insertion order.
    pub fn logs_for_job(&self, job_id: &JobId) -> Result<Vec<LogRow>> {
        let conn = self.connection();
        let mut stmt = conn.prepare(
            "SELECT ts, level, job_id, message FROM job_logs WHERE job_id = ? ORDER BY id",
        )?;
        let rows = stmt
            .query_map([job_id.as_str()], Self::row_to_log_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Number of rows stored for `job_id`.
    pub fn count_logs_for_job(&self, job_id: &JobId) -> Result<i64> {
        let conn = self.connection();
        conn.query_row(
            "SELECT COUNT(*) FROM job_logs WHERE job_id = ?",
            [job_id.as_str()],
            |r| r.get(0),
        )
        .map_err(Error::from)
    }

    fn row_to_log_row(row: &Row) -> rusqlite::Result<LogRow> {
        let ts_str: String = row.get("ts")?;
        let level_str: String = row.get("level")?;
        let job_id: String = row.get("job_id")?;

        let timestamp = DateTime::parse_from_rfc3339(&ts_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
            })?;
        let severity: Severity = level_str.parse().map_err(|e: Error| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(LogRow {
            timestamp,
            severity,
            job_id: JobId::from(job_id),
            message: row.get("message")?,
        })
    }
}

impl LogStore for Database {
    fn insert_log_row(&self, row: &LogRow) -> Result<()> {
        let conn = self.connection();
        conn.execute(
            r#"
            INSERT INTO job_logs (ts, level, job_id, message)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                row.timestamp.to_rfc3339(),
                row.severity.as_str(),
                row.job_id.as_str(),
                row.message,
            ],
        )?;
        Ok(())
    }
}
