//! Tracing subscriber setup.
//!
//! CLI subcommands log to stderr. The TUI owns the terminal, so it logs to a
//! file when one is given and stays silent otherwise. `RUST_LOG` always wins
//! over the `-v` level.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSink<'a> {
    Stderr,
    File(&'a Path),
    Off,
}

/// Default filter for a `-v` count: warn, info, debug, trace.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "forecast_dash=warn",
        1 => "forecast_dash=info",
        2 => "forecast_dash=debug",
        _ => "forecast_dash=trace,reqwest=debug",
    }
}

pub fn init(sink: LogSink<'_>, verbosity: u8) -> Result<(), AppError> {
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)))
    };

    let log_file = match sink {
        LogSink::Off => return Ok(()),
        LogSink::Stderr => None,
        LogSink::File(path) => Some(
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| AppError::config(format!("Failed to open log file '{}': {e}", path.display())))?,
        ),
    };

    // Keep a subscriber installed earlier by tests or an embedding host.
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let result = match log_file {
        None => tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init(),
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init(),
    };

    // Logging is best effort; the command still runs without it.
    if let Err(e) = result {
        eprintln!("warning: failed to install logger: {e}");
    }
    Ok(())
}
