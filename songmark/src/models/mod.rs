//! Data models for provenance records
//!
//! - `FieldSet`: raw operator input, prior to validation
//! - `ProvenanceRecord`: validated, immutable, canonical record
//! - `ContentFingerprint`: hash of an audio payload

pub mod field_set;
pub mod fingerprint;
pub mod provenance_record;

pub use field_set::{FieldName, FieldSet};
pub use fingerprint::{ContentFingerprint, InvalidFingerprint};
pub use provenance_record::{ProvenanceRecord, RecordParseError, COMMENT_PLACEHOLDER};
