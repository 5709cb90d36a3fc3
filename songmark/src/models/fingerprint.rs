//! Content fingerprint value type

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of hex digits in a fingerprint (64-bit digest)
pub const FINGERPRINT_HEX_LEN: usize = 16;

/// Rejected fingerprint text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid content fingerprint '{0}': expected 16 hex digits")]
pub struct InvalidFingerprint(pub String);

/// Hash of an audio file's encoded payload, as lowercase fixed-width hex
///
/// Two files whose payload bytes are identical share a fingerprint,
/// whatever their tags contain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentFingerprint(String);

impl ContentFingerprint {
    /// Wrap a raw 64-bit digest
    pub fn from_digest(digest: u64) -> Self {
        Self(format!("{:016x}", digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ContentFingerprint {
    type Err = InvalidFingerprint;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.len() == FINGERPRINT_HEX_LEN && trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(Self(trimmed.to_ascii_lowercase()))
        } else {
            Err(InvalidFingerprint(s.to_string()))
        }
    }
}

impl TryFrom<String> for ContentFingerprint {
    type Error = InvalidFingerprint;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ContentFingerprint> for String {
    fn from(value: ContentFingerprint) -> Self {
        value.0
    }
}
