//! Library verifier over a directory of tagged files

mod helpers;

use helpers::{append_id3v1, sample_fields, write_mp3};
use id3::TagLike;
use songmark::models::FieldSet;
use songmark::services::{
    fingerprint_file, payload_builder, tag_writer, verify_library, VerifyOutcome,
};
use std::path::Path;
use tempfile::TempDir;

fn engrave(path: &Path) {
    let fingerprint = fingerprint_file(path).unwrap();
    let fields: FieldSet = sample_fields().with_fingerprint(&fingerprint);
    let record = payload_builder::build(&fields).unwrap();
    tag_writer::engrave_record(path, &record).unwrap();
}

#[test]
fn test_verify_library_classifies_every_file() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("nested")).unwrap();

    let good = dir.path().join("a-good.mp3");
    write_mp3(&good, 10, 1);
    engrave(&good);
    // Later tag edits keep the record valid
    append_id3v1(&good, "edited");

    let tampered = dir.path().join("b-tampered.mp3");
    write_mp3(&tampered, 10, 2);
    engrave(&tampered);
    let mut bytes = std::fs::read(&tampered).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    std::fs::write(&tampered, bytes).unwrap();

    let bare = dir.path().join("nested/c-bare.mp3");
    write_mp3(&bare, 10, 3);

    std::fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

    let report = verify_library(dir.path()).unwrap();
    let outcomes: Vec<&VerifyOutcome> = report.entries.iter().map(|(_, o)| o).collect();

    assert_eq!(report.entries.len(), 3);
    assert_eq!(outcomes[0], &VerifyOutcome::Verified);
    assert!(matches!(outcomes[1], VerifyOutcome::Mismatch { .. }));
    assert_eq!(outcomes[2], &VerifyOutcome::MissingRecord);
    assert!(!report.all_verified());
}

#[test]
fn test_corrupt_record_is_unreadable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.mp3");
    write_mp3(&path, 5, 4);

    let mut tag = id3::Tag::new();
    tag.add_frame(id3::frame::Comment {
        lang: "ved".into(),
        description: String::new(),
        text: "{not json".into(),
    });
    tag.write_to_path(&path, id3::Version::Id3v24).unwrap();

    let report = verify_library(dir.path()).unwrap();
    assert!(matches!(report.entries[0].1, VerifyOutcome::Unreadable(_)));
    assert_eq!(report.unreadable(), 1);
}
