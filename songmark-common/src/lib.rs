//! # Songmark Common Library
//!
//! Shared code for the songmark tools:
//! - Error types
//! - TOML configuration loading and config file resolution
//! - Logging setup (tracing subscriber, log file rotation)
//! - Date/time helpers

pub mod config;
pub mod error;
pub mod logging;
pub mod time;

pub use error::{Error, Result};
