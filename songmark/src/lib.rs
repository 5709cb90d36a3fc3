//! songmark library interface
//!
//! Content fingerprinting, validation and embedding of provenance records
//! for MP3 files. Exposes public APIs for the `song-adder` binary and for
//! integration testing.

pub mod build_info;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod workflow;

pub use crate::error::{AdderError, AdderResult};
