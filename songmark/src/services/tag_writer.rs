//! ID3 tag access for MP3 files
//!
//! Reads and writes the descriptive tags and the embedded provenance
//! record. The record lives in a `COMM` frame with language `ved` and an
//! empty description; at most one such frame is kept per file.
//!
//! Audio properties are probed with lofty and are informational only.

use crate::models::{ProvenanceRecord, RecordParseError};
use id3::frame::{Comment, Picture, PictureType};
use id3::{Tag, TagLike, Version};
use lofty::prelude::*;
use lofty::probe::Probe;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Language code of the comment frame holding the provenance record
pub const RECORD_COMMENT_LANG: &str = "ved";

/// Language code of the human-readable comment frame
pub const DESCRIPTIVE_COMMENT_LANG: &str = "eng";

/// Default `TPE2` value
pub const DEFAULT_ALBUM_ARTIST: &str = "QueenPb + Vedal987";

/// Container write failures
///
/// The source file is never modified; these only concern the output file.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ID3 tag error on {}: {source}", .path.display())]
    Tag {
        path: PathBuf,
        #[source]
        source: id3::Error,
    },

    #[error(transparent)]
    Record(#[from] RecordParseError),

    #[error("Unsupported cover image type: {0}")]
    UnsupportedCover(String),

    #[error("Failed to launch {program}: {source}")]
    RemuxSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Remux failed ({status}): {stderr}")]
    RemuxFailed { status: String, stderr: String },
}

/// Descriptive ID3 frames shown to the listener
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptiveTags {
    pub title: String,
    pub artist: String,
    pub album_artist: String,
    pub album: String,
    pub disc: String,
    pub track: String,
    pub date: String,
    pub comment: String,
}

impl DescriptiveTags {
    /// Tags derived from a provenance record
    pub fn from_record(record: &ProvenanceRecord, album_artist: &str) -> Self {
        Self {
            title: record.title().to_string(),
            artist: record.artist().to_string(),
            album_artist: album_artist.to_string(),
            album: format!("Disc {}", record.disc_number()),
            disc: record.disc_number().to_string(),
            track: record.track().to_string(),
            date: record.date().to_string(),
            comment: record.comment().to_string(),
        }
    }

    /// `(frame id, value)` pairs in write order
    pub fn frames(&self) -> [(&'static str, &str); 8] {
        [
            ("TIT2", &self.title),
            ("TPE1", &self.artist),
            ("COMM", &self.comment),
            ("TDRC", &self.date),
            ("TPE2", &self.album_artist),
            ("TRCK", &self.track),
            ("TALB", &self.album),
            ("TPOS", &self.disc),
        ]
    }
}

/// Front cover image to embed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverArt {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl CoverArt {
    /// Load a JPEG or PNG image, typed by file extension
    pub fn load(path: &Path) -> Result<Self, WriteError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let mime_type = match ext.as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            _ => return Err(WriteError::UnsupportedCover(path.display().to_string())),
        };

        let data = std::fs::read(path).map_err(|source| WriteError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            mime_type: mime_type.to_string(),
            data,
        })
    }
}

/// Audio stream properties
#[derive(Debug, Clone, PartialEq)]
pub struct AudioProperties {
    pub duration_seconds: f64,
    pub bitrate_kbps: Option<u32>,
    pub sample_rate: Option<u32>,
    pub channels: Option<u8>,
}

/// Read the ID3v2 tag, `None` when the file has none
fn read_tag(path: &Path) -> Result<Option<Tag>, WriteError> {
    match Tag::read_from_path(path) {
        Ok(tag) => Ok(Some(tag)),
        Err(e) if matches!(e.kind, id3::ErrorKind::NoTag) => Ok(None),
        Err(source) => Err(WriteError::Tag {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn write_tag(tag: &Tag, path: &Path) -> Result<(), WriteError> {
    tag.write_to_path(path, Version::Id3v24)
        .map_err(|source| WriteError::Tag {
            path: path.to_path_buf(),
            source,
        })
}

fn frame_text(tag: &Tag, id: &str) -> String {
    tag.get(id)
        .and_then(|frame| frame.content().text())
        .unwrap_or_default()
        .to_string()
}

fn comment_text<'a>(tag: &'a Tag, lang: &str) -> Option<&'a str> {
    tag.comments()
        .filter(|c| c.lang == lang)
        .last()
        .map(|c| c.text.as_str())
}

fn is_record_frame(frame: &id3::Frame) -> bool {
    frame
        .content()
        .comment()
        .map(|c| c.lang == RECORD_COMMENT_LANG)
        .unwrap_or(false)
}

/// Copy of `tag` with every record comment dropped
fn without_record(tag: &Tag) -> Tag {
    let mut rebuilt = Tag::with_version(tag.version());
    for frame in tag.frames().filter(|f| !is_record_frame(f)) {
        rebuilt.add_frame(frame.clone());
    }
    rebuilt
}

/// Embedded provenance record, `None` when the file carries none
pub fn read_record(path: &Path) -> Result<Option<ProvenanceRecord>, WriteError> {
    let Some(tag) = read_tag(path)? else {
        return Ok(None);
    };

    match comment_text(&tag, RECORD_COMMENT_LANG) {
        Some(text) => Ok(Some(ProvenanceRecord::parse(text)?)),
        None => Ok(None),
    }
}

/// Descriptive frames currently in the file, `None` without a tag
pub fn read_descriptive_tags(path: &Path) -> Result<Option<DescriptiveTags>, WriteError> {
    let Some(tag) = read_tag(path)? else {
        return Ok(None);
    };

    Ok(Some(DescriptiveTags {
        title: frame_text(&tag, "TIT2"),
        artist: frame_text(&tag, "TPE1"),
        album_artist: frame_text(&tag, "TPE2"),
        album: frame_text(&tag, "TALB"),
        disc: frame_text(&tag, "TPOS"),
        track: frame_text(&tag, "TRCK"),
        date: frame_text(&tag, "TDRC"),
        comment: comment_text(&tag, DESCRIPTIVE_COMMENT_LANG)
            .unwrap_or_default()
            .to_string(),
    }))
}

/// Probe duration and stream parameters; `None` when the file cannot be parsed
pub fn probe_audio_properties(path: &Path) -> Option<AudioProperties> {
    let tagged_file = match Probe::open(path).and_then(|probe| probe.read()) {
        Ok(file) => file,
        Err(e) => {
            debug!(file = %path.display(), error = %e, "Audio properties unavailable");
            return None;
        }
    };

    let properties = tagged_file.properties();
    Some(AudioProperties {
        duration_seconds: properties.duration().as_secs_f64(),
        bitrate_kbps: properties.audio_bitrate(),
        sample_rate: properties.sample_rate(),
        channels: properties.channels(),
    })
}

/// Write the descriptive frames (and optional front cover)
///
/// Other frames already in the file are kept.
pub fn write_descriptive_tags(
    path: &Path,
    tags: &DescriptiveTags,
    cover: Option<&CoverArt>,
) -> Result<(), WriteError> {
    let mut tag = read_tag(path)?.unwrap_or_default();

    tag.set_title(tags.title.as_str());
    tag.set_artist(tags.artist.as_str());
    tag.set_album_artist(tags.album_artist.as_str());
    tag.set_album(tags.album.as_str());
    // Raw text keeps "X/Y" and date literals exactly as entered
    tag.set_text("TPOS", tags.disc.as_str());
    tag.set_text("TRCK", tags.track.as_str());
    tag.set_text("TDRC", tags.date.as_str());
    tag.add_frame(Comment {
        lang: DESCRIPTIVE_COMMENT_LANG.to_string(),
        description: String::new(),
        text: tags.comment.clone(),
    });

    if let Some(cover) = cover {
        tag.add_frame(Picture {
            mime_type: cover.mime_type.clone(),
            picture_type: PictureType::CoverFront,
            description: String::new(),
            data: cover.data.clone(),
        });
    }

    write_tag(&tag, path)?;

    debug!(file = %path.display(), title = %tags.title, "Wrote descriptive tags");
    Ok(())
}

/// Embed the serialized record, replacing any previous one
pub fn engrave_record(path: &Path, record: &ProvenanceRecord) -> Result<(), WriteError> {
    let mut tag = match read_tag(path)? {
        Some(tag) => without_record(&tag),
        None => Tag::new(),
    };

    tag.add_frame(Comment {
        lang: RECORD_COMMENT_LANG.to_string(),
        description: String::new(),
        text: record.to_canonical_string(),
    });

    write_tag(&tag, path)?;

    info!(
        file = %path.display(),
        fingerprint = %record.xx_hash(),
        "Engraved provenance record"
    );
    Ok(())
}
