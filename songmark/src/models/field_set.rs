//! Raw provenance fields as entered by the operator

use super::fingerprint::ContentFingerprint;
use std::fmt;

/// One of the fixed provenance record keys, in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    Date,
    Title,
    Artist,
    CoverArtist,
    Version,
    Discnumber,
    Track,
    Comment,
    Special,
    XxHash,
}

impl FieldName {
    /// All keys in serialized order
    pub const ALL: [FieldName; 10] = [
        FieldName::Date,
        FieldName::Title,
        FieldName::Artist,
        FieldName::CoverArtist,
        FieldName::Version,
        FieldName::Discnumber,
        FieldName::Track,
        FieldName::Comment,
        FieldName::Special,
        FieldName::XxHash,
    ];

    /// Key as written in the serialized record
    pub fn key(self) -> &'static str {
        match self {
            FieldName::Date => "Date",
            FieldName::Title => "Title",
            FieldName::Artist => "Artist",
            FieldName::CoverArtist => "CoverArtist",
            FieldName::Version => "Version",
            FieldName::Discnumber => "Discnumber",
            FieldName::Track => "Track",
            FieldName::Comment => "Comment",
            FieldName::Special => "Special",
            FieldName::XxHash => "xxHash",
        }
    }

    /// Human-readable label for messages
    pub fn label(self) -> &'static str {
        match self {
            FieldName::Date => "date",
            FieldName::Title => "title",
            FieldName::Artist => "artist",
            FieldName::CoverArtist => "cover artist",
            FieldName::Version => "version",
            FieldName::Discnumber => "disc number",
            FieldName::Track => "track",
            FieldName::Comment => "comment",
            FieldName::Special => "special",
            FieldName::XxHash => "hash",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Candidate provenance fields, prior to validation
///
/// Any field may be empty here; emptiness is itself checked by the
/// validator. `source` names the file the fields describe and is only used
/// in failure messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    pub date: String,
    pub title: String,
    pub artist: String,
    pub cover_artist: String,
    pub version: String,
    pub disc_number: String,
    pub track: String,
    pub comment: String,
    pub special: String,
    pub xx_hash: String,
    pub source: Option<String>,
}

impl FieldSet {
    /// Attach the fingerprint of the file these fields describe
    pub fn with_fingerprint(mut self, fingerprint: &ContentFingerprint) -> Self {
        self.xx_hash = fingerprint.as_str().to_string();
        self
    }

    /// Attach the source file name used in failure messages
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Value of one field
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

    /// Mutable access to one field
    pub fn get_mut(&mut self, field: FieldName) -> &mut String {
        match field {
            FieldName::Date => &mut self.date,
            FieldName::Title => &mut self.title,
            FieldName::Artist => &mut self.artist,
            FieldName::CoverArtist => &mut self.cover_artist,
            FieldName::Version => &mut self.version,
            FieldName::Discnumber => &mut self.disc_number,
            FieldName::Track => &mut self.track,
            FieldName::Comment => &mut self.comment,
            FieldName::Special => &mut self.special,
            FieldName::XxHash => &mut self.xx_hash,
        }
    }

    /// Copy every non-empty field of `overrides` over this set
    ///
    /// Used to layer operator-supplied values on top of values pre-filled
    /// from an existing record.
    pub fn overlay(mut self, overrides: &FieldSet) -> Self {
        for field in FieldName::ALL {
            let value = overrides.get(field);
            if !value.is_empty() {
                *self.get_mut(field) = value.to_string();
            }
        }
        if overrides.source.is_some() {
            self.source = overrides.source.clone();
        }
        self
    }

    /// Set each given field, including to an empty value
    ///
    /// Unlike `overlay`, an empty value here clears the field.
    pub fn apply<'a>(mut self, values: impl IntoIterator<Item = (FieldName, &'a str)>) -> Self {
        for (field, value) in values {
            *self.get_mut(field) = value.to_string();
        }
        self
    }

    /// Name used in failure messages
    pub fn source_label(&self) -> &str {
        self.source.as_deref().unwrap_or("input")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_in_canonical_order() {
        let keys: Vec<&str> = FieldName::ALL.iter().map(|f| f.key()).collect();
        assert_eq!(
            keys,
            vec![
                "Date", "Title", "Artist", "CoverArtist", "Version", "Discnumber", "Track",
                "Comment", "Special", "xxHash"
            ]
        );
    }

    #[test]
    fn test_overlay_only_replaces_non_empty() {
        let base = FieldSet {
            title: "Old Title".into(),
            artist: "Artist".into(),
            ..Default::default()
        };
        let overrides = FieldSet {
            title: "New Title".into(),
            ..Default::default()
        };

        let merged = base.overlay(&overrides);
        assert_eq!(merged.title, "New Title");
        assert_eq!(merged.artist, "Artist");
    }

    #[test]
    fn test_apply_clears_with_empty_value() {
        let base = FieldSet {
            comment: "old note".into(),
            special: "1".into(),
            title: "Title".into(),
            ..Default::default()
        };

        let merged = base.apply([(FieldName::Comment, ""), (FieldName::Special, "2")]);
        assert_eq!(merged.comment, "");
        assert_eq!(merged.special, "2");
        assert_eq!(merged.title, "Title");
    }

    #[test]
    fn test_source_label_default() {
        assert_eq!(FieldSet::default().source_label(), "input");
        assert_eq!(FieldSet::default().with_source("a.mp3").source_label(), "a.mp3");
    }
}
