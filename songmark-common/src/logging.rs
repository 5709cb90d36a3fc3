//! Logging setup
//!
//! Installs a `tracing` subscriber with an `EnvFilter` (`RUST_LOG` overrides
//! the configured level), a stderr `fmt` layer, and an optional plain-text
//! log file layer. The log file is rotated once at startup when it has grown
//! past `max_file_bytes`, keeping a single `<file>.1` backup.

use crate::config::LoggingConfig;
use crate::{Error, Result};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber
///
/// `verbose` forces the `debug` level regardless of the configured one.
pub fn init_logging(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { config.level.as_str() };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| Error::Logging(format!("Invalid log level '{}': {}", level, e)))?;

    let file_layer = match &config.file {
        Some(path) => {
            rotate_if_oversized(path, config.max_file_bytes)?;
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))
}

/// Backup path used when rotating `path`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".1");
    PathBuf::from(name)
}

/// Move `path` to its `.1` backup if it exceeds `max_bytes`
///
/// Returns true when a rotation happened. A missing file is not rotated.
pub fn rotate_if_oversized(path: &Path, max_bytes: u64) -> std::io::Result<bool> {
    let size = match std::fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };

    if size <= max_bytes {
        return Ok(false);
    }

    let backup = backup_path(path);
    if backup.exists() {
        std::fs::remove_file(&backup)?;
    }
    std::fs::rename(path, &backup)?;
    Ok(true)
}
