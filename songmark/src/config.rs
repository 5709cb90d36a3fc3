//! Configuration for song-adder
//!
//! Loaded from TOML via `songmark_common::config`; every table is optional
//! and falls back to compiled defaults.
//!
//! ```toml
//! [logging]
//! level = "debug"
//!
//! [remux]
//! ffmpeg_path = "/usr/local/bin/ffmpeg"
//!
//! [tags]
//! album_artist = "QueenPb + Vedal987"
//!
//! [validation]
//! accepted_versions = ["1", "1.2", "2", "2.2", "3", "3.4"]
//! ```

use crate::services::{ValidationPolicy, DEFAULT_ALBUM_ARTIST};
use crate::services::remuxer::DEFAULT_FFMPEG;
use serde::Deserialize;
use songmark_common::config::{load_toml_config, LoggingConfig, CONFIG_ENV_VAR};
use songmark_common::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable overriding the ffmpeg binary
pub const FFMPEG_ENV_VAR: &str = "SONGMARK_FFMPEG";

/// `[remux]` table
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RemuxConfig {
    pub ffmpeg_path: PathBuf,
}

impl Default for RemuxConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from(DEFAULT_FFMPEG),
        }
    }
}

/// `[tags]` table
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TagsConfig {
    /// Written to `TPE2` on every output file
    pub album_artist: String,
}

impl Default for TagsConfig {
    fn default() -> Self {
        Self {
            album_artist: DEFAULT_ALBUM_ARTIST.to_string(),
        }
    }
}

/// Full song-adder configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdderConfig {
    pub logging: LoggingConfig,
    pub remux: RemuxConfig,
    pub tags: TagsConfig,
    pub validation: ValidationPolicy,
}

impl AdderConfig {
    /// Resolve and load the config file, then apply environment overrides
    pub fn load(cli_arg: Option<&Path>) -> Result<Self> {
        let mut config: AdderConfig = load_toml_config(cli_arg, CONFIG_ENV_VAR)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var(FFMPEG_ENV_VAR) {
            if !path.trim().is_empty() {
                info!(ffmpeg = %path, "ffmpeg path overridden by {}", FFMPEG_ENV_VAR);
                self.remux.ffmpeg_path = PathBuf::from(path);
            }
        }
    }
}
