//! Diagnostics for buildlog itself
//!
//! These are operational messages about the library (migrations, store
//! setup, sink failures), not the job log events it routes. They go to
//! standard error through `tracing`.

use crate::config::TracingConfig;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Initialize the diagnostics subscriber
///
/// Sets up tracing with:
/// - Output to standard error through a non-blocking writer
/// - Configurable level via config or RUST_LOG env var
pub fn init(config: &TracingConfig) -> crate::error::Result<LoggingGuard> {
    let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stderr());

    // Build the filter from config or env var
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let stderr_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| crate::error::Error::Config(format!("failed to install subscriber: {}", e)))?;

    tracing::debug!(level = %config.level, "Diagnostics initialized");

    Ok(LoggingGuard { _guard: guard })
}

/// Initialize diagnostics for tests (captured by the test harness)
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .with_span_events(FmtSpan::CLOSE)
        .try_init();
}

/// Guard that keeps the diagnostics writer alive
///
/// When dropped, flushes any pending writes.
pub struct LoggingGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}
