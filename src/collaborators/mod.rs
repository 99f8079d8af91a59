//! External collaborators consumed through narrow interfaces.
//!
//! The scanner never parses containers fully itself. Tag extraction and
//! frame decoding are delegated to a [`MetadataProber`] and an optional
//! [`FrameExtractor`]. Any error from either only disables its own pipeline
//! step.

#[cfg(feature = "ffmpeg")]
pub mod ffmpeg;
pub mod process;

use crate::cancel::CancelToken;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Dumps a file's container and stream tags as searchable text.
pub trait MetadataProber: Send + Sync {
    fn read_metadata(&self, path: &Path, cancel: &CancelToken) -> Result<String>;
}

/// Decodes a single frame as interleaved 8-bit RGB.
pub trait FrameExtractor: Send + Sync {
    /// Returns `width * height * 3` bytes, or fewer if decoding stopped early.
    fn extract_frame(
        &self,
        path: &Path,
        request: &FrameRequest,
        cancel: &CancelToken,
    ) -> Result<Vec<u8>>;
}

/// Where to seek and what size to scale the decoded frame to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameRequest {
    pub seek_seconds: f64,
    pub width: u32,
    pub height: u32,
}

impl FrameRequest {
    pub fn expected_bytes(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }
}

/// A prober for deployments without tag extraction; always yields no text.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMetadata;

impl MetadataProber for NoMetadata {
    fn read_metadata(&self, _path: &Path, cancel: &CancelToken) -> Result<String> {
        cancel.check()?;
        Ok(String::new())
    }
}

impl<T: MetadataProber + ?Sized> MetadataProber for Box<T> {
    fn read_metadata(&self, path: &Path, cancel: &CancelToken) -> Result<String> {
        (**self).read_metadata(path, cancel)
    }
}

impl<T: FrameExtractor + ?Sized> FrameExtractor for Box<T> {
    fn extract_frame(
        &self,
        path: &Path,
        request: &FrameRequest,
        cancel: &CancelToken,
    ) -> Result<Vec<u8>> {
        (**self).extract_frame(path, request, cancel)
    }
}
