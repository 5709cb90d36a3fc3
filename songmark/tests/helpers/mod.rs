//! Test Helper Utilities
//!
//! Shared utilities for testing songmark

#![allow(dead_code)]

pub mod log_capture;
pub mod mp3_fixture;

pub use log_capture::{capture_logs, LogCapture};
pub use mp3_fixture::{append_id3v1, audio_frames, write_mp3};

use chrono::NaiveDate;
use songmark::models::FieldSet;

/// Fixed "today" for deterministic date checks
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

/// Complete, valid operator input (hash not yet attached)
pub fn sample_fields() -> FieldSet {
    FieldSet {
        date: "2023-01-03".into(),
        title: "Title".into(),
        artist: "Artist".into(),
        cover_artist: "Neuro & Evil".into(),
        version: "1.2".into(),
        disc_number: "1".into(),
        track: "1/98".into(),
        comment: String::new(),
        special: "0".into(),
        xx_hash: String::new(),
        source: None,
    }
}
