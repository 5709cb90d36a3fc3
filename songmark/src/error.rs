//! Error types for songmark

use crate::services::{FingerprintError, ScanError, ValidationError, WriteError};
use thiserror::Error;

/// Errors surfaced by the adder session and CLI
#[derive(Debug, Error)]
pub enum AdderError {
    /// Audio payload could not be fingerprinted
    #[error(transparent)]
    Fingerprint(#[from] FingerprintError),

    /// Operator input rejected; fix the field and retry
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Output container could not be written
    #[error(transparent)]
    Write(#[from] WriteError),

    /// Library directory could not be scanned
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Operation called out of order (no file loaded, no preview yet)
    #[error("{0}")]
    State(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// songmark-common error
    #[error("Common error: {0}")]
    Common(#[from] songmark_common::Error),
}

/// Result type for session operations
pub type AdderResult<T> = Result<T, AdderError>;
