//! Adder session
//!
//! Drives one file at a time through the provenance pipeline:
//!
//! 1. `load_file` picks the source file and pre-fills fields from any
//!    record it already carries
//! 2. `preview` fingerprints, validates and builds the record without
//!    touching the disk
//! 3. `generate` remuxes into a new file, writes the descriptive tags and
//!    engraves the record
//!
//! The source file is only ever read.

use crate::config::AdderConfig;
use crate::error::{AdderError, AdderResult};
use crate::models::{FieldSet, ProvenanceRecord};
use crate::services::tag_writer::{self, CoverArt, DescriptiveTags};
use crate::services::{fingerprint_file, payload_builder, PayloadValidator, Remuxer};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Record and tags that `generate` will write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPreview {
    pub record: ProvenanceRecord,
    pub tags: DescriptiveTags,
}

impl TagPreview {
    /// `(frame id, value)` lines for display, record last
    pub fn lines(&self) -> Vec<(&'static str, String)> {
        let mut lines: Vec<(&'static str, String)> = self
            .tags
            .frames()
            .iter()
            .map(|(id, value)| (*id, value.to_string()))
            .collect();
        lines.push(("COMM:ved", self.record.to_canonical_string()));
        lines
    }
}

/// Single-file adder session
pub struct AdderSession {
    validator: PayloadValidator,
    remuxer: Remuxer,
    album_artist: String,
    loaded: Option<PathBuf>,
    preview: Option<TagPreview>,
}

impl AdderSession {
    /// Create session from loaded configuration
    pub fn new(config: &AdderConfig) -> Self {
        Self {
            validator: PayloadValidator::with_policy(config.validation.clone()),
            remuxer: Remuxer::with_binary(config.remux.ffmpeg_path.as_os_str()),
            album_artist: config.tags.album_artist.clone(),
            loaded: None,
            preview: None,
        }
    }

    pub fn validator(&self) -> &PayloadValidator {
        &self.validator
    }

    pub fn loaded_file(&self) -> Option<&Path> {
        self.loaded.as_deref()
    }

    pub fn current_preview(&self) -> Option<&TagPreview> {
        self.preview.as_ref()
    }

    /// Select the source file
    ///
    /// Returns fields pre-filled from the embedded record, if any. The hash
    /// is never pre-filled. An unreadable record is logged and ignored.
    pub fn load_file(&mut self, path: &Path) -> AdderResult<FieldSet> {
        self.preview = None;
        self.loaded = None;

        if !std::fs::metadata(path)?.is_file() {
            return Err(AdderError::State(format!(
                "Not a file: {}",
                path.display()
            )));
        }

        let prefill = match tag_writer::read_record(path) {
            Ok(Some(record)) => {
                info!(file = %path.display(), "Loaded existing provenance record");
                record.to_field_set()
            }
            Ok(None) => FieldSet::default(),
            Err(e) => {
                warn!(file = %path.display(), error = %e, "Ignoring unreadable provenance record");
                FieldSet::default()
            }
        };

        self.loaded = Some(path.to_path_buf());
        Ok(prefill.with_source(source_name(path)))
    }

    /// Fingerprint, validate and build without writing
    ///
    /// Any previous preview is discarded first, so a failure leaves none.
    pub fn preview(&mut self, fields: &FieldSet, today: NaiveDate) -> AdderResult<&TagPreview> {
        self.preview = None;

        let path = self.require_loaded()?.to_path_buf();
        let fingerprint = fingerprint_file(&path)?;

        let mut fields = fields.clone().with_fingerprint(&fingerprint);
        if fields.source.is_none() {
            fields.source = Some(source_name(&path));
        }

        self.validator.validate(&fields, today)?;
        let record = payload_builder::build(&fields)?;
        let tags = DescriptiveTags::from_record(&record, &self.album_artist);

        info!(
            file = %path.display(),
            fingerprint = %fingerprint,
            "Preview ready"
        );

        Ok(self.preview.insert(TagPreview { record, tags }))
    }

    /// Write the previewed record into a new file under `out_dir`
    ///
    /// Returns the output path.
    pub fn generate(&mut self, out_dir: &Path, cover: Option<&Path>) -> AdderResult<PathBuf> {
        let source = self.require_loaded()?.to_path_buf();
        let preview = self
            .preview
            .as_ref()
            .ok_or_else(|| AdderError::State("No preview: run preview first".to_string()))?;

        let cover = cover.map(CoverArt::load).transpose()?;

        std::fs::create_dir_all(out_dir)?;
        let output = out_dir.join(output_file_name(
            preview.record.artist(),
            preview.record.title(),
        ));

        if is_same_file(&source, &output) {
            return Err(AdderError::State(format!(
                "Output would overwrite the source file: {}",
                output.display()
            )));
        }

        self.remuxer.remux(&source, &output)?;
        tag_writer::write_descriptive_tags(&output, &preview.tags, cover.as_ref())?;
        tag_writer::engrave_record(&output, &preview.record)?;

        info!(
            source = %source.display(),
            output = %output.display(),
            "Generated tagged file"
        );

        Ok(output)
    }

    fn require_loaded(&self) -> AdderResult<&Path> {
        self.loaded
            .as_deref()
            .ok_or_else(|| AdderError::State("No file loaded".to_string()))
    }
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// `<Artist> - <Title>.mp3` with path-unsafe characters replaced by `_`
pub fn output_file_name(artist: &str, title: &str) -> String {
    format!("{} - {}.mp3", sanitize(artist), sanitize(title))
}

fn sanitize(part: &str) -> String {
    let cleaned: String = part
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    cleaned.trim().trim_end_matches('.').to_string()
}
