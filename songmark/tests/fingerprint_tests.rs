//! Content fingerprint behaviour on real files

mod helpers;

use helpers::{append_id3v1, write_mp3};
use id3::{Tag, TagLike, Version};
use songmark::services::{fingerprint_file, FingerprintError};
use tempfile::TempDir;
use xxhash_rust::xxh64::xxh64;

#[test]
fn test_fingerprint_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("song.mp3");
    write_mp3(&path, 20, 1);

    let first = fingerprint_file(&path).unwrap();
    let second = fingerprint_file(&path).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_untagged_fingerprint_covers_whole_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("song.mp3");
    let audio = write_mp3(&path, 10, 2);

    let fp = fingerprint_file(&path).unwrap();
    assert_eq!(fp.as_str(), format!("{:016x}", xxh64(&audio, 0)));
}

#[test]
fn test_fingerprint_ignores_id3v2_rewrites() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("song.mp3");
    write_mp3(&path, 20, 3);
    let untagged = fingerprint_file(&path).unwrap();

    let mut tag = Tag::new();
    tag.set_title("First title");
    tag.write_to_path(&path, Version::Id3v24).unwrap();
    let tagged = fingerprint_file(&path).unwrap();

    let mut tag = Tag::read_from_path(&path).unwrap();
    tag.set_title("A much longer replacement title than before");
    tag.set_artist("Someone");
    tag.write_to_path(&path, Version::Id3v23).unwrap();
    let retagged = fingerprint_file(&path).unwrap();

    assert_eq!(untagged, tagged);
    assert_eq!(tagged, retagged);
}

#[test]
fn test_fingerprint_ignores_id3v1_trailer() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("song.mp3");
    write_mp3(&path, 20, 4);
    let before = fingerprint_file(&path).unwrap();

    append_id3v1(&path, "Trailer title");
    assert_eq!(fingerprint_file(&path).unwrap(), before);

    let mut tag = Tag::new();
    tag.set_artist("Both blocks");
    tag.write_to_path(&path, Version::Id3v24).unwrap();
    assert_eq!(fingerprint_file(&path).unwrap(), before);
}

#[test]
fn test_different_audio_different_fingerprint() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.mp3");
    let b = dir.path().join("b.mp3");
    write_mp3(&a, 20, 5);
    write_mp3(&b, 20, 6);

    assert_ne!(fingerprint_file(&a).unwrap(), fingerprint_file(&b).unwrap());
}

#[test]
fn test_truncated_tag_is_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.mp3");
    // Declares a 1000-byte tag in a 14-byte file
    std::fs::write(&path, b"ID3\x03\x00\x00\x00\x00\x07\x68abcd").unwrap();

    assert!(matches!(
        fingerprint_file(&path),
        Err(FingerprintError::MalformedHeader(_))
    ));
}
