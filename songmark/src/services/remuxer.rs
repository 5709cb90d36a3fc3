//! ffmpeg stream-copy remux
//!
//! Copies the audio stream unchanged into a new container so the output
//! carries a fresh Xing/Info index, keeping the source metadata.
//!
//! Command: `ffmpeg -y -i <in> -map_metadata 0 -c:a copy -write_xing 1 <out>`

use super::tag_writer::WriteError;
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use tracing::{debug, error};

/// Default ffmpeg binary, resolved through PATH
pub const DEFAULT_FFMPEG: &str = "ffmpeg";

/// Hide the console window ffmpeg would otherwise open
#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// ffmpeg runner
#[derive(Debug, Clone)]
pub struct Remuxer {
    ffmpeg: OsString,
}

impl Remuxer {
    /// Create remuxer using `ffmpeg` from PATH
    pub fn new() -> Self {
        Self::with_binary(DEFAULT_FFMPEG)
    }

    /// Create remuxer using an explicit binary
    pub fn with_binary(ffmpeg: impl Into<OsString>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
        }
    }

    /// Arguments passed to ffmpeg for one remux
    pub fn args(input: &Path, output: &Path) -> Vec<OsString> {
        vec![
            "-y".into(),
            "-i".into(),
            input.as_os_str().to_owned(),
            "-map_metadata".into(),
            "0".into(),
            "-c:a".into(),
            "copy".into(),
            "-write_xing".into(),
            "1".into(),
            output.as_os_str().to_owned(),
        ]
    }

    /// Remux `input` into `output`, overwriting `output`
    pub fn remux(&self, input: &Path, output: &Path) -> Result<(), WriteError> {
        let program = self.ffmpeg.to_string_lossy().to_string();

        debug!(
            program = %program,
            input = %input.display(),
            output = %output.display(),
            "Running ffmpeg remux"
        );

        let mut command = Command::new(&self.ffmpeg);
        command.args(Self::args(input, output));

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            command.creation_flags(CREATE_NO_WINDOW);
        }

        let result = command.output().map_err(|source| {
            error!(program = %program, error = %source, "Failed to launch ffmpeg");
            WriteError::RemuxSpawn {
                program: program.clone(),
                source,
            }
        })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
            error!(
                input = %input.display(),
                status = %result.status,
                stderr = %stderr,
                "ffmpeg remux failed"
            );
            return Err(WriteError::RemuxFailed {
                status: result.status.to_string(),
                stderr,
            });
        }

        Ok(())
    }
}

impl Default for Remuxer {
    fn default() -> Self {
        Self::new()
    }
}
