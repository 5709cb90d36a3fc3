//! Library verifier
//!
//! Walks a directory of MP3 files and checks each embedded provenance
//! record against a freshly computed content fingerprint.

use super::fingerprinter::fingerprint_file;
use super::tag_writer::read_record;
use crate::models::ContentFingerprint;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Library scan errors
#[derive(Debug, Error)]
pub enum ScanError {
    /// Specified path does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Result of checking one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Recorded hash matches the audio payload
    Verified,
    /// Audio payload differs from the one the record was built for
    ///
    /// A record's fingerprint identifies the source audio before remuxing.
    /// ffmpeg rewrites the Xing/Info frame, so an engraved output can report
    /// a mismatch even though its audio stream was copied unchanged.
    Mismatch { recorded: String, actual: String },
    /// File carries no provenance record
    MissingRecord,
    /// File or its record could not be read
    Unreadable(String),
}

impl fmt::Display for VerifyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyOutcome::Verified => write!(f, "OK"),
            VerifyOutcome::Mismatch { recorded, actual } => {
                write!(f, "MISMATCH (recorded {}, actual {})", recorded, actual)
            }
            VerifyOutcome::MissingRecord => write!(f, "NO RECORD"),
            VerifyOutcome::Unreadable(reason) => write!(f, "UNREADABLE ({})", reason),
        }
    }
}

/// Outcome for every file under a root
#[derive(Debug, Clone, Default)]
pub struct VerifyReport {
    pub entries: Vec<(PathBuf, VerifyOutcome)>,
}

impl VerifyReport {
    fn count(&self, pred: impl Fn(&VerifyOutcome) -> bool) -> usize {
        self.entries.iter().filter(|(_, outcome)| pred(outcome)).count()
    }

    pub fn verified(&self) -> usize {
        self.count(|o| matches!(o, VerifyOutcome::Verified))
    }

    pub fn mismatched(&self) -> usize {
        self.count(|o| matches!(o, VerifyOutcome::Mismatch { .. }))
    }

    pub fn missing(&self) -> usize {
        self.count(|o| matches!(o, VerifyOutcome::MissingRecord))
    }

    pub fn unreadable(&self) -> usize {
        self.count(|o| matches!(o, VerifyOutcome::Unreadable(_)))
    }

    /// True when every file carries a matching record
    pub fn all_verified(&self) -> bool {
        self.verified() == self.entries.len()
    }
}

/// Every `.mp3` file below `root`, sorted by path
///
/// Extension match is case-insensitive. Symlinks are not followed.
pub fn collect_mp3_files(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !root.exists() {
        return Err(ScanError::PathNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && is_mp3(entry.path()) {
                    files.push(entry.into_path());
                }
            }
            Err(e) => {
                warn!("Error accessing entry: {}", e);
            }
        }
    }

    files.sort();
    debug!(root = %root.display(), count = files.len(), "Collected MP3 files");
    Ok(files)
}

fn is_mp3(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("mp3"))
        .unwrap_or(false)
}

/// Check one file's record against its audio payload
///
/// The comparison is byte-exact over the payload span, see
/// [`VerifyOutcome::Mismatch`] for remuxed outputs.
pub fn verify_file(path: &Path) -> VerifyOutcome {
    let record = match read_record(path) {
        Ok(Some(record)) => record,
        Ok(None) => return VerifyOutcome::MissingRecord,
        Err(e) => return VerifyOutcome::Unreadable(e.to_string()),
    };

    let actual = match fingerprint_file(path) {
        Ok(fp) => fp,
        Err(e) => return VerifyOutcome::Unreadable(e.to_string()),
    };

    match record.xx_hash().parse::<ContentFingerprint>() {
        Ok(recorded) if recorded == actual => VerifyOutcome::Verified,
        _ => VerifyOutcome::Mismatch {
            recorded: record.xx_hash().to_string(),
            actual: actual.to_string(),
        },
    }
}

/// Verify every MP3 below `root`
pub fn verify_library(root: &Path) -> Result<VerifyReport, ScanError> {
    let files = collect_mp3_files(root)?;

    let entries: Vec<(PathBuf, VerifyOutcome)> = files
        .into_iter()
        .map(|path| {
            let outcome = verify_file(&path);
            debug!(file = %path.display(), outcome = %outcome, "Verified file");
            (path, outcome)
        })
        .collect();

    let report = VerifyReport { entries };
    info!(
        root = %root.display(),
        files = report.entries.len(),
        verified = report.verified(),
        mismatched = report.mismatched(),
        missing = report.missing(),
        unreadable = report.unreadable(),
        "Library verification complete"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_collect_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("b.mp3"), b"x").unwrap();
        std::fs::write(dir.path().join("a.MP3"), b"x").unwrap();
        std::fs::write(dir.path().join("sub/c.mp3"), b"x").unwrap();
        std::fs::write(dir.path().join("cover.jpg"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("fake.mp3")).unwrap();

        let files = collect_mp3_files(dir.path()).unwrap();
        let names: Vec<PathBuf> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a.MP3"),
                PathBuf::from("b.mp3"),
                PathBuf::from("sub/c.mp3")
            ]
        );
    }

    #[test]
    fn test_collect_rejects_missing_and_file_roots() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            collect_mp3_files(&dir.path().join("missing")),
            Err(ScanError::PathNotFound(_))
        ));

        let file = dir.path().join("a.mp3");
        std::fs::write(&file, b"x").unwrap();
        assert!(matches!(
            collect_mp3_files(&file),
            Err(ScanError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_untagged_file_has_missing_record() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.mp3");
        std::fs::write(&file, [0xFFu8, 0xFB, 0x90, 0x64]).unwrap();
        assert_eq!(verify_file(&file), VerifyOutcome::MissingRecord);
    }

    #[test]
    fn test_report_counts() {
        let report = VerifyReport {
            entries: vec![
                (PathBuf::from("a"), VerifyOutcome::Verified),
                (PathBuf::from("b"), VerifyOutcome::MissingRecord),
                (
                    PathBuf::from("c"),
                    VerifyOutcome::Mismatch {
                        recorded: "0".repeat(16),
                        actual: "1".repeat(16),
                    },
                ),
            ],
        };
        assert_eq!(report.verified(), 1);
        assert_eq!(report.missing(), 1);
        assert_eq!(report.mismatched(), 1);
        assert_eq!(report.unreadable(), 0);
        assert!(!report.all_verified());
    }
}
