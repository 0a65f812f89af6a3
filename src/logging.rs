//! File logging for wavedraw.
//!
//! The TUI owns the terminal, so nothing is logged to stdout or stderr.
//! Log lines go to daily-rotated files in the XDG state directory, and
//! rotated files older than a week are pruned at startup.

use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::prelude::*;

/// Rotated files are named `wavedraw.log.YYYY-MM-DD`.
pub const LOG_FILE_PREFIX: &str = "wavedraw.log";

/// How long rotated log files are kept.
const LOG_RETENTION: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Initializes tracing with a non-blocking daily-rotated file writer.
///
/// Verbosity comes from `RUST_LOG` (default "info"). Returns the appender
/// guard; dropping it flushes buffered lines, so the caller keeps it alive
/// for the life of the program.
///
/// # Errors
/// - If the log directory cannot be resolved or created
/// - If a global subscriber is already installed
pub fn init() -> Result<WorkerGuard, anyhow::Error> {
    let dir = log_dir().ok_or_else(|| anyhow::anyhow!("Could not determine state directory"))?;
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    prune_logs_older_than(&dir, SystemTime::now() - LOG_RETENTION);

    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(&dir, LOG_FILE_PREFIX));
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {e}"))?;

    tracing::debug!("Logging to {}", dir.display());
    Ok(guard)
}

/// Resolves the wavedraw log directory without creating it.
///
/// `$XDG_STATE_HOME/wavedraw` when set, `~/.local/state/wavedraw` otherwise.
pub fn log_dir() -> Option<PathBuf> {
    dirs::state_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/state")))
        .map(|state| state.join("wavedraw"))
}

/// Deletes rotated log files last written before `cutoff`.
///
/// Files without the log prefix and unreadable entries are left alone.
/// Failures go to stderr since tracing is not up yet.
fn prune_logs_older_than(dir: &Path, cutoff: SystemTime) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        if !entry
            .file_name()
            .to_string_lossy()
            .starts_with(LOG_FILE_PREFIX)
        {
            continue;
        }
        let stale = entry
            .metadata()
            .and_then(|meta| meta.modified())
            .map(|written| written < cutoff)
            .unwrap_or(false);
        if stale {
            let path = entry.path();
            if let Err(e) = fs::remove_file(&path) {
                eprintln!("Warning: could not remove old log {}: {e}", path.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_log_dir(tag: &str) -> PathBuf {
        let dir =
            std::env::temp_dir().join(format!("wavedraw_logs_{}_{}", tag, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn prune_removes_only_stale_log_files() {
        let dir = temp_log_dir("prune");
        let old_log = dir.join("wavedraw.log.2020-01-01");
        let unrelated = dir.join("notes.txt");
        fs::write(&old_log, "x").unwrap();
        fs::write(&unrelated, "x").unwrap();

        // Both files were written just now, so a cutoff in the future marks
        // the log file stale while the unrelated file is never considered.
        prune_logs_older_than(&dir, SystemTime::now() + Duration::from_secs(3600));
        assert!(!old_log.exists());
        assert!(unrelated.exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn prune_keeps_recently_written_log_files() {
        let dir = temp_log_dir("keep");
        let log = dir.join("wavedraw.log.2026-08-29");
        fs::write(&log, "x").unwrap();

        prune_logs_older_than(&dir, SystemTime::now() - Duration::from_secs(3600));
        assert!(log.exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn log_dir_ends_with_the_app_name() {
        let dir = log_dir().unwrap();
        assert!(dir.ends_with("wavedraw"));
    }
}
