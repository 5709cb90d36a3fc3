//! Payload Builder
//!
//! Turns a validated `FieldSet` into a `ProvenanceRecord`.
//!
//! Callers run the validator first; the builder repeats only the presence
//! check so a record is never produced with an empty required field.

use super::payload_validator::{check_presence, ValidationError};
use crate::models::{FieldSet, ProvenanceRecord, COMMENT_PLACEHOLDER};

/// Build the canonical record
///
/// An empty (or blank) comment is stored as the placeholder.
pub fn build(fields: &FieldSet) -> Result<ProvenanceRecord, ValidationError> {
    check_presence(fields)?;

    let comment = if fields.comment.trim().is_empty() {
        COMMENT_PLACEHOLDER.to_string()
    } else {
        fields.comment.clone()
    };

    Ok(ProvenanceRecord::from_checked(fields, comment))
}
