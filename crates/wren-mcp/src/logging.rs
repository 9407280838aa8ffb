//! Tracing setup for the server binary.
//!
//! Logs always go to stderr, since stdout carries MCP frames. A copy is
//! appended to the configured log file when one is set.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wren_core::ServerConfig;

/// Open `path` for appending, creating it and its parent directory if needed.
pub fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `config.log_level`. A log file that cannot
/// be opened is reported once logging is up and otherwise ignored.
pub fn init_tracing(config: &ServerConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let mut file_error = None;
    let file_layer = config.log_file.as_deref().and_then(|path| match open_log_file(path) {
        Ok(file) => Some(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        ),
        Err(e) => {
            file_error = Some((path.display().to_string(), e));
            None
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(file_layer)
        .try_init()?;

    match (&config.log_file, file_error) {
        (_, Some((path, e))) => {
            tracing::warn!(path = %path, error = %e, "Could not open log file, logging to stderr only")
        }
        (Some(path), None) => tracing::info!(path = %path.display(), "Logging to file"),
        (None, None) => {}
    }

    Ok(())
}
