//! Service modules for the provenance pipeline
//!
//! fingerprint -> validate -> build -> remux -> tag -> engrave

pub mod fingerprinter;
pub mod library_verifier;
pub mod payload_builder;
pub mod payload_validator;
pub mod remuxer;
pub mod tag_writer;

pub use fingerprinter::{fingerprint_bytes, fingerprint_file, FingerprintError};
pub use library_verifier::{
    collect_mp3_files, verify_file, verify_library, ScanError, VerifyOutcome, VerifyReport,
};
pub use payload_validator::{
    Era, PayloadValidator, TwinCredit, ValidationError, ValidationPolicy, REQUIRED_FIELDS,
};
pub use remuxer::Remuxer;
pub use tag_writer::{
    AudioProperties, CoverArt, DescriptiveTags, WriteError, DEFAULT_ALBUM_ARTIST,
};
