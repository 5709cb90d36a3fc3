//! Configuration file resolution and TOML loading
//!
//! Config file resolution priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. Per-user config file (`<config dir>/songmark/config.toml`)
//! 4. Compiled defaults (fallback)
//!
//! A missing per-user file is not an error. A file named explicitly on the
//! command line or in the environment must exist and parse.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "SONGMARK_CONFIG";

/// Default maximum log file size before rotation (5 MiB)
pub const DEFAULT_MAX_LOG_BYTES: u64 = 5_242_880;

/// Where a config file path came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    CommandLine,
    Environment,
    UserConfigDir,
}

impl ConfigSource {
    /// Whether the file was named explicitly (and so must exist)
    pub fn is_explicit(self) -> bool {
        !matches!(self, ConfigSource::UserConfigDir)
    }
}

/// Logging configuration (`[logging]` table)
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr only if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Size at which the log file is rotated to `<file>.1` on startup
    #[serde(default = "default_max_log_bytes")]
    pub max_file_bytes: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
            max_file_bytes: default_max_log_bytes(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_bytes() -> u64 {
    DEFAULT_MAX_LOG_BYTES
}

/// Resolve which config file to load, if any
///
/// Returns `None` when neither an explicit path nor a per-user config file
/// exists; callers then fall back to compiled defaults.
pub fn resolve_config_path(
    cli_arg: Option<&Path>,
    env_var_name: &str,
) -> Option<(PathBuf, ConfigSource)> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some((path.to_path_buf(), ConfigSource::CommandLine));
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return Some((PathBuf::from(path), ConfigSource::Environment));
        }
    }

    // Priority 3: Per-user config file
    default_config_path()
        .filter(|path| path.exists())
        .map(|path| (path, ConfigSource::UserConfigDir))
}

/// Per-user config file location for the current platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("songmark").join("config.toml"))
}

/// Load a TOML config, falling back to `T::default()` when no file applies
pub fn load_toml_config<T>(cli_arg: Option<&Path>, env_var_name: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match resolve_config_path(cli_arg, env_var_name) {
        Some((path, source)) => {
            if source.is_explicit() && !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            debug!(path = %path.display(), source = ?source, "Loading config file");
            read_toml_file(&path)
        }
        None => {
            debug!("No config file found, using compiled defaults");
            Ok(T::default())
        }
    }
}

/// Read and parse one TOML file
pub fn read_toml_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}
