//! Canonical provenance record
//!
//! Serialized as a single-line JSON object whose keys always appear in the
//! same order:
//!
//! ```text
//! {"Date":"..","Title":"..","Artist":"..","CoverArtist":"..","Version":"..",
//!  "Discnumber":"..","Track":"..","Comment":"..","Special":"..","xxHash":".."}
//! ```
//!
//! Values are JSON-escaped, so quotes, braces and backslashes survive a
//! round trip.

use super::field_set::{FieldName, FieldSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stored comment when the operator left it empty
pub const COMMENT_PLACEHOLDER: &str = "None";

/// Embedded record text that could not be parsed
#[derive(Debug, Error)]
#[error("Malformed provenance record: {0}")]
pub struct RecordParseError(#[from] serde_json::Error);

/// Validated, immutable provenance record
///
/// Only the payload builder creates records from operator input; parsing
/// an embedded record is the other way to obtain one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Artist")]
    artist: String,
    #[serde(rename = "CoverArtist")]
    cover_artist: String,
    #[serde(rename = "Version")]
    version: String,
    #[serde(rename = "Discnumber")]
    disc_number: String,
    #[serde(rename = "Track")]
    track: String,
    #[serde(rename = "Comment")]
    comment: String,
    #[serde(rename = "Special")]
    special: String,
    #[serde(rename = "xxHash")]
    xx_hash: String,
}

impl ProvenanceRecord {
    /// Assemble a record from already-checked values
    pub(crate) fn from_checked(fields: &FieldSet, comment: String) -> Self {
        Self {
            date: fields.date.clone(),
            title: fields.title.clone(),
            artist: fields.artist.clone(),
            cover_artist: fields.cover_artist.clone(),
            version: fields.version.clone(),
            disc_number: fields.disc_number.clone(),
            track: fields.track.clone(),
            comment,
            special: fields.special.clone(),
            xx_hash: fields.xx_hash.clone(),
        }
    }

    /// Parse an embedded record
    pub fn parse(text: &str) -> Result<Self, RecordParseError> {
        Ok(serde_json::from_str(text.trim())?)
    }

    /// Canonical single-line serialization
    pub fn to_canonical_string(&self) -> String {
        self.to_string()
    }

    /// Value stored under one key
    pub fn get(&self, field: FieldName) -> &str {
        match field {
            FieldName::Date => &self.date,
            FieldName::Title => &self.title,
            FieldName::Artist => &self.artist,
            FieldName::CoverArtist => &self.cover_artist,
            FieldName::Version => &self.version,
            FieldName::Discnumber => &self.disc_number,
            FieldName::Track => &self.track,
            FieldName::Comment => &self.comment,
            FieldName::Special => &self.special,
            FieldName::XxHash => &self.xx_hash,
        }
    }

    /// Key/value pairs in canonical order
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        FieldName::ALL
            .iter()
            .map(|&field| (field.key(), self.get(field)))
            .collect()
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn cover_artist(&self) -> &str {
        &self.cover_artist
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn disc_number(&self) -> &str {
        &self.disc_number
    }

    pub fn track(&self) -> &str {
        &self.track
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn special(&self) -> &str {
        &self.special
    }

    pub fn xx_hash(&self) -> &str {
        &self.xx_hash
    }

    /// Field set pre-filled from this record, for editing
    ///
    /// The hash is left empty: it must be recomputed from the file.
    /// A placeholder comment comes back as an empty comment.
    pub fn to_field_set(&self) -> FieldSet {
        let comment = if self.comment == COMMENT_PLACEHOLDER {
            String::new()
        } else {
            self.comment.clone()
        };

        FieldSet {
            date: self.date.clone(),
            title: self.title.clone(),
            artist: self.artist.clone(),
            cover_artist: self.cover_artist.clone(),
            version: self.version.clone(),
            disc_number: self.disc_number.clone(),
            track: self.track.clone(),
            comment,
            special: self.special.clone(),
            xx_hash: String::new(),
            source: None,
        }
    }
}

impl fmt::Display for ProvenanceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}
