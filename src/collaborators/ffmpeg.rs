//! `ffprobe` / `ffmpeg` adapters.

use super::process::run_tool;
use super::{FrameExtractor, FrameRequest, MetadataProber};
use crate::cancel::CancelToken;
use crate::config::IoConfig;
use crate::error::Result;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Dumps format and stream tags as JSON via `ffprobe`.
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    binary: PathBuf,
    max_output: usize,
}

impl Default for FfprobeProber {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

impl FfprobeProber {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            max_output: IoConfig::default().max_collaborator_output,
        }
    }

    /// `ffprobe` from `PATH`, capped at `io.max_collaborator_output`.
    pub fn from_config(io: &IoConfig) -> Self {
        Self::default().with_max_output(io.max_collaborator_output)
    }

    pub fn with_max_output(mut self, bytes: usize) -> Self {
        self.max_output = bytes;
        self
    }

    fn command(&self, path: &Path) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(["-v", "quiet", "-print_format", "json"])
            .args(["-show_format", "-show_streams", "-show_error"])
            .args(["-show_entries", "format_tags=*:stream_tags=*"])
            .arg(path);
        cmd
    }
}

impl MetadataProber for FfprobeProber {
    fn read_metadata(&self, path: &Path, cancel: &CancelToken) -> Result<String> {
        debug!(path = %path.display(), "probing metadata");
        let out = run_tool("ffprobe", self.command(path), self.max_output, cancel)?;
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }
}

/// Decodes one frame to raw `rgb24` via `ffmpeg`.
#[derive(Debug, Clone)]
pub struct FfmpegFrameExtractor {
    binary: PathBuf,
    max_output: usize,
}

impl Default for FfmpegFrameExtractor {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl FfmpegFrameExtractor {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            max_output: IoConfig::default().max_collaborator_output,
        }
    }

    /// `ffmpeg` from `PATH`, capped at `io.max_collaborator_output`.
    pub fn from_config(io: &IoConfig) -> Self {
        Self::default().with_max_output(io.max_collaborator_output)
    }

    pub fn with_max_output(mut self, bytes: usize) -> Self {
        self.max_output = bytes;
        self
    }

    fn command(&self, path: &Path, request: &FrameRequest) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(["-v", "error", "-y"])
            .arg("-ss")
            .arg(format_seek(request.seek_seconds))
            .arg("-i")
            .arg(path)
            .args(["-vframes", "1"])
            .arg("-vf")
            .arg(format!("scale={}:{}", request.width, request.height))
            .args(["-f", "rawvideo", "-pix_fmt", "rgb24", "-"]);
        cmd
    }
}

impl FrameExtractor for FfmpegFrameExtractor {
    fn extract_frame(
        &self,
        path: &Path,
        request: &FrameRequest,
        cancel: &CancelToken,
    ) -> Result<Vec<u8>> {
        debug!(path = %path.display(), ?request, "extracting frame");
        let out = run_tool(
            "ffmpeg",
            self.command(path, request),
            self.max_output,
            cancel,
        )?;
        Ok(out.stdout)
    }
}

/// Whole seconds print without a fractional part.
fn format_seek(seconds: f64) -> String {
    if seconds.fract() == 0.0 {
        format!("{}", seconds as u64)
    } else {
        format!("{seconds:.3}")
    }
}
