//! Interactive workflow over the provenance services

pub mod session;

pub use session::{output_file_name, AdderSession, TagPreview};
