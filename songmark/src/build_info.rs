//! Build identification stamped in by `build.rs`

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_HASH: &str = env!("GIT_HASH");
pub const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP");
pub const BUILD_PROFILE: &str = env!("BUILD_PROFILE");

/// `--version` text, e.g. `0.1.0 (1a2b3c4d, release, 2026-10-18T09:00:00Z)`
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", ",
    env!("BUILD_PROFILE"),
    ", ",
    env!("BUILD_TIMESTAMP"),
    ")"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_stamps_present() {
        assert!(!GIT_HASH.is_empty());
        assert!(!BUILD_PROFILE.is_empty());
        assert!(chrono::NaiveDateTime::parse_from_str(BUILD_TIMESTAMP, "%Y-%m-%dT%H:%M:%SZ").is_ok());
    }

    #[test]
    fn test_long_version_leads_with_package_version() {
        assert!(LONG_VERSION.starts_with(VERSION));
        assert!(LONG_VERSION.contains(GIT_HASH));
    }
}
