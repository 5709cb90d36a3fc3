//! Content fingerprinting of the audio payload
//!
//! Hashes only the encoded audio frames of an MP3 file: the leading ID3v2
//! tag block and a trailing ID3v1 `TAG` block are cut off first, so
//! rewriting tags never changes the fingerprint.
//!
//! Layout handled:
//!
//! ```text
//! [ID3v2 header + frames] [audio frames ...] [TAG + 125 bytes]
//!  optional               hashed             optional
//! ```
//!
//! A v2.4 footer is not part of the leading block: its 10 bytes are hashed
//! with the audio, as records written by earlier tooling expect.
//!
//! Digest: xxHash64, seed 0, as 16 lowercase hex digits.

use crate::models::ContentFingerprint;
use std::ops::Range;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use xxhash_rust::xxh64::xxh64;

/// ID3v2 header size in bytes
const ID3V2_HEADER_LEN: usize = 10;

/// Fixed ID3v1 trailer size in bytes
pub const ID3V1_TRAILER_LEN: usize = 128;

/// Fingerprinting errors
///
/// Any of these means "no fingerprint available"; a provenance record must
/// not be built without one.
#[derive(Debug, Error)]
pub enum FingerprintError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed ID3v2 header: {0}")]
    MalformedHeader(String),

    #[error("Tag blocks overlap: ID3v2 block ends at byte {leading_end}, audio must end at byte {payload_end}")]
    Overlap { leading_end: usize, payload_end: usize },
}

/// Fingerprint the audio payload of a file
///
/// Reads the whole file once.
pub fn fingerprint_file(path: &Path) -> Result<ContentFingerprint, FingerprintError> {
    let data = std::fs::read(path).map_err(|source| FingerprintError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let fingerprint = fingerprint_bytes(&data)?;

    debug!(
        file = %path.display(),
        bytes = data.len(),
        fingerprint = %fingerprint,
        "Computed content fingerprint"
    );

    Ok(fingerprint)
}

/// Fingerprint the audio payload of an in-memory file image
pub fn fingerprint_bytes(data: &[u8]) -> Result<ContentFingerprint, FingerprintError> {
    let span = audio_payload_span(data)?;
    Ok(ContentFingerprint::from_digest(xxh64(&data[span], 0)))
}

/// Byte range of the encoded audio, between the tag blocks
pub fn audio_payload_span(data: &[u8]) -> Result<Range<usize>, FingerprintError> {
    let leading_end = id3v2_block_len(data)?;
    let trailer = if has_id3v1_trailer(data) {
        ID3V1_TRAILER_LEN
    } else {
        0
    };
    let payload_end = data.len() - trailer;

    if leading_end > payload_end {
        return Err(FingerprintError::Overlap {
            leading_end,
            payload_end,
        });
    }

    Ok(leading_end..payload_end)
}

/// Total size of a leading ID3v2 block, or 0 when the file has none
///
/// Size = 10-byte header + syncsafe tag size.
pub fn id3v2_block_len(data: &[u8]) -> Result<usize, FingerprintError> {
    if !data.starts_with(b"ID3") {
        return Ok(0);
    }

    if data.len() < ID3V2_HEADER_LEN {
        return Err(FingerprintError::MalformedHeader(format!(
            "truncated header ({} bytes)",
            data.len()
        )));
    }

    let major = data[3];
    let revision = data[4];

    if !(2..=4).contains(&major) || revision == 0xFF {
        return Err(FingerprintError::MalformedHeader(format!(
            "unsupported version 2.{}.{}",
            major, revision
        )));
    }

    let tag_size = decode_syncsafe(&data[6..10]).ok_or_else(|| {
        FingerprintError::MalformedHeader("size bytes are not syncsafe".to_string())
    })?;

    let block_len = ID3V2_HEADER_LEN + tag_size;
    if block_len > data.len() {
        return Err(FingerprintError::MalformedHeader(format!(
            "tag size {} exceeds file size {}",
            block_len,
            data.len()
        )));
    }

    Ok(block_len)
}

/// Whether the last 128 bytes form an ID3v1 `TAG` block
pub fn has_id3v1_trailer(data: &[u8]) -> bool {
    data.len() >= ID3V1_TRAILER_LEN && data[data.len() - ID3V1_TRAILER_LEN..].starts_with(b"TAG")
}

/// Decode a 4-byte syncsafe integer (7 significant bits per byte)
fn decode_syncsafe(bytes: &[u8]) -> Option<usize> {
    bytes.iter().try_fold(0usize, |acc, &b| {
        if b & 0x80 != 0 {
            None
        } else {
            Some((acc << 7) | b as usize)
        }
    })
}
