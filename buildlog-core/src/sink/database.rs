//! Persistent job log storage

use crate::db::LogStore;
use crate::error::Result;
use crate::event::{Handler, LogEvent};
use crate::types::{JobId, LogRow};
use chrono::Utc;

/// Stores every event as a row tied to one job.
///
/// There is no verbosity filter. Insert failures are returned from
/// [`Handler::handle`]; a [`Log`](crate::event::Log) keeps the first one and
/// hands it back from [`interpret`](crate::event::interpret).
pub struct DatabaseHandler<S> {
    store: S,
    job_id: JobId,
}

impl<S: LogStore> DatabaseHandler<S> {
    pub fn new(store: S, job_id: JobId) -> Self {
        Self { store, job_id }
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }
}

impl<S: LogStore> Handler for DatabaseHandler<S> {
    fn handle(&self, event: &LogEvent) -> Result<()> {
        let row = LogRow {
            timestamp: Utc::now(),
            severity: event.severity,
            job_id: self.job_id.clone(),
            message: event.document.to_plain_string(),
        };
        self.store.insert_log_row(&row)
    }
}
