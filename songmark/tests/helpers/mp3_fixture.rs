//! Synthetic MP3 fixtures
//!
//! Files are a run of constant-bitrate MPEG-1 Layer III frames with a
//! deterministic payload. Tags are added with the id3 crate or appended by
//! hand (ID3v1).

use std::io::Write;
use std::path::{Path, PathBuf};

/// MPEG-1 Layer III, 128 kbps, 44.1 kHz, no padding, no CRC
const FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x64];

/// 144 * 128000 / 44100
const FRAME_LEN: usize = 417;

/// Encoded audio bytes: `count` frames, payload varied by `seed`
pub fn audio_frames(count: usize, seed: u8) -> Vec<u8> {
    let mut data = Vec::with_capacity(count * FRAME_LEN);
    for i in 0..count {
        data.extend_from_slice(&FRAME_HEADER);
        data.extend((0..FRAME_LEN - FRAME_HEADER.len()).map(|j| {
            (j as u8).wrapping_mul(31).wrapping_add(i as u8).wrapping_add(seed)
        }));
    }
    data
}

/// Write an untagged MP3 and return its audio bytes
pub fn write_mp3(path: &Path, frames: usize, seed: u8) -> Vec<u8> {
    let audio = audio_frames(frames, seed);
    std::fs::write(path, &audio).unwrap();
    audio
}

/// Append a 128-byte ID3v1 trailer
pub fn append_id3v1(path: &Path, title: &str) {
    let mut trailer = b"TAG".to_vec();
    let mut title_bytes = title.as_bytes().to_vec();
    title_bytes.resize(30, 0);
    trailer.extend_from_slice(&title_bytes);
    trailer.resize(127, 0);
    trailer.push(255); // genre: none

    let mut file = std::fs::OpenOptions::new().append(true).open(path).unwrap();
    file.write_all(&trailer).unwrap();
}

/// Write a stand-in ffmpeg that copies its input to its output
///
/// Argument positions follow the remux command line: input is `$3`,
/// output is `${10}`.
#[cfg(unix)]
pub fn fake_ffmpeg(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-ffmpeg.sh");
    std::fs::write(&path, "#!/bin/sh\ncp \"$3\" \"${10}\"\n").unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Write a stand-in ffmpeg that fails with a message on stderr
#[cfg(unix)]
pub fn failing_ffmpeg(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("failing-ffmpeg.sh");
    std::fs::write(&path, "#!/bin/sh\necho 'Invalid data found' >&2\nexit 1\n").unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Write a stand-in ffmpeg that copies its input and rewrites part of the
/// audio, the way a real remux regenerates the Xing/Info frame
#[cfg(unix)]
pub fn rewriting_ffmpeg(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("rewriting-ffmpeg.sh");
    std::fs::write(&path, "#!/bin/sh\ncp \"$3\" \"${10}\"\nprintf 'Info' >> \"${10}\"\n").unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}
