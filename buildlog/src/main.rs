//! buildlog - emit build-job log events from the command line
//!
//! Events go to every sink enabled in the configuration or on the command
//! line: coloured lines on the terminal, timestamped lines in a log file,
//! and rows in a SQLite database tied to a job id.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Database: $XDG_DATA_HOME/buildlog/logs.db (~/.local/share/buildlog/logs.db)
//! - Log file: $XDG_STATE_HOME/buildlog/buildlog.log (~/.local/state/buildlog/buildlog.log)
//! - Config: $XDG_CONFIG_HOME/buildlog/config.toml (~/.config/buildlog/config.toml)

use anyhow::{Context, Result};
use buildlog_core::event::Discard;
use buildlog_core::sink::{DatabaseHandler, FileHandler, TerminalHandler};
use buildlog_core::{
    interpret, Config, Database, Handler, HandlerExt, JobId, Log, Severity, Verbosity,
};
use clap::Parser;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "buildlog")]
#[command(about = "Emit build-job log events to the terminal, a log file and SQLite")]
#[command(version)]
struct Args {
    /// Severity of the emitted events (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    severity: Severity,

    /// Job identifier for stored rows (default: a fresh UUID)
    #[arg(short, long)]
    job: Option<String>,

    /// Terminal verbosity (quiet, normal, verbose), overrides config
    #[arg(short, long)]
    verbosity: Option<Verbosity>,

    /// Append events to this log file (verbosity from config)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Store events in this SQLite database
    #[arg(long)]
    db: Option<PathBuf>,

    /// Do not write to the terminal
    #[arg(long)]
    no_terminal: bool,

    /// Message to emit; without one, each line of stdin is emitted
    message: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Ensure XDG environment variables are set before using core library
    Config::ensure_xdg_env();

    let config = Config::load().context("failed to load configuration")?;

    let _log_guard = buildlog_core::logging::init(&config.tracing)
        .context("failed to initialize diagnostics")?;

    let job_id = args
        .job
        .clone()
        .map(JobId::from)
        .unwrap_or_else(JobId::generate);
    tracing::debug!(job_id = %job_id, "buildlog starting");

    let handler = build_handler(&args, &config, job_id)?;

    interpret(&*handler, |log| emit_all(&args, log)).context("log sink failed")??;

    Ok(())
}

/// Wire the enabled sinks into one handler, terminal first.
fn build_handler(args: &Args, config: &Config, job_id: JobId) -> Result<Box<dyn Handler>> {
    let mut sinks: Vec<Box<dyn Handler>> = Vec::new();

    if config.terminal.enabled && !args.no_terminal {
        let verbosity = args.verbosity.unwrap_or(config.terminal.verbosity);
        sinks.push(Box::new(TerminalHandler::stdout(verbosity)));
    }

    let file_path = match &args.log_file {
        Some(path) => Some(path.clone()),
        None if config.file.enabled => Some(config.file.resolved_path()),
        None => None,
    };
    if let Some(path) = file_path {
        // Best effort: appends to a missing directory are reported by the sink.
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!(dir = %parent.display(), error = %e, "Could not create log directory");
            }
        }
        let file = FileHandler::new(config.file.verbosity, path);
        tracing::debug!(path = %file.path().display(), verbosity = %file.verbosity(), "File sink enabled");
        sinks.push(Box::new(file));
    }

    let db_path = match &args.db {
        Some(path) => Some(path.clone()),
        None if config.database.enabled => Some(config.database.resolved_path()),
        None => None,
    };
    if let Some(path) = db_path {
        let db = Database::open(&path)
            .with_context(|| format!("failed to open database {}", path.display()))?;
        db.migrate().context("failed to run database migrations")?;
        let database = DatabaseHandler::new(Arc::new(db), job_id);
        tracing::debug!(path = %path.display(), job_id = %database.job_id(), "Database sink enabled");
        sinks.push(Box::new(database));
    }

    Ok(sinks
        .into_iter()
        .reduce(|first, second| -> Box<dyn Handler> { Box::new(first.and(second)) })
        .unwrap_or_else(|| -> Box<dyn Handler> { Box::new(Discard) }))
}

/// Emit the message argument, or every stdin line, in order.
fn emit_all(args: &Args, log: &Log<'_>) -> Result<()> {
    if !args.message.is_empty() {
        log.emit(args.severity, args.message.join(" "));
        return Ok(());
    }

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if input
            .read_until(b'\n', &mut buf)
            .context("failed to read stdin")?
            == 0
        {
            return Ok(());
        }
        log.emit(args.severity, decode_line(&buf));
    }
}

/// One stdin line as text, without its line ending. Invalid UTF-8 is replaced.
fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}
