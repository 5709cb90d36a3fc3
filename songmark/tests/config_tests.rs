//! song-adder configuration loading
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.

use serial_test::serial;
use songmark::config::{AdderConfig, FFMPEG_ENV_VAR};
use songmark::workflow::AdderSession;
use songmark_common::config::CONFIG_ENV_VAR;
use std::env;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
#[serial]
fn test_full_config_file() {
    env::remove_var(FFMPEG_ENV_VAR);
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[logging]
level = "debug"

[remux]
ffmpeg_path = "/opt/ffmpeg/bin/ffmpeg"

[tags]
album_artist = "Label"

[validation]
accepted_versions = ["1", "2"]
excluded_disc_numbers = [13]

[validation.twins]
first = "Neuro"
second = "Evil"
"#,
    )
    .unwrap();

    let config = AdderConfig::load(Some(&path)).unwrap();
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.remux.ffmpeg_path, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
    assert_eq!(config.tags.album_artist, "Label");
    assert_eq!(config.validation.accepted_versions, vec!["1", "2"]);
    assert_eq!(config.validation.excluded_disc_numbers, vec![13]);
}

#[test]
#[serial]
fn test_ffmpeg_env_override() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[remux]\nffmpeg_path = \"from-file\"\n").unwrap();
    env::set_var(FFMPEG_ENV_VAR, "/usr/local/bin/ffmpeg");

    let config = AdderConfig::load(Some(&path)).unwrap();
    assert_eq!(config.remux.ffmpeg_path, PathBuf::from("/usr/local/bin/ffmpeg"));

    env::remove_var(FFMPEG_ENV_VAR);
}

#[test]
#[serial]
fn test_missing_explicit_config_is_error() {
    env::remove_var(CONFIG_ENV_VAR);
    let dir = TempDir::new().unwrap();
    let result = AdderConfig::load(Some(&dir.path().join("absent.toml")));
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_policy_from_config_reaches_session() {
    env::remove_var(FFMPEG_ENV_VAR);
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[validation]\nmax_disc_number = 5\n").unwrap();

    let config = AdderConfig::load(Some(&path)).unwrap();
    let session = AdderSession::new(&config);
    assert_eq!(session.validator().policy().max_disc_number, 5);
}
