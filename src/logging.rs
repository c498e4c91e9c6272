//! Logging setup for Appx
//!
//! The browser owns the terminal, so its log goes to `appx.log` next to the
//! executable. Plain CLI commands and the catalog service log to stderr.
//! The filter is read from `APPX_LOG`, then `RUST_LOG`, defaulting to `info`.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// Log file path (same directory as executable)
pub fn default_log_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("appx.log")
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env("APPX_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn open_log_file(path: &Path) -> Option<File> {
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true) // Start fresh each run
        .open(path)
        .ok()
}

/// Install the global subscriber. Safe to call more than once.
pub fn init(target: LogTarget) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(true);

    let result = match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::File(path) => match open_log_file(&path) {
            Some(file) => builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init(),
            // Nowhere to write without corrupting the TUI
            None => return,
        },
    };

    if result.is_ok() {
        tracing::debug!("logging initialized");
    }
}
