//! Format sniffer for video containers.
//!
//! Classification is by fixed-offset magic comparison over the leading bytes
//! of the file. It only decides which findings the orchestrator attaches to
//! the start of the file; it never gates the rest of the content pipeline.

use crate::catalog::magic::{self, has_at};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Fewer leading bytes than this are never classified.
pub const MIN_SNIFF_LEN: usize = 12;

/// Video container families the sniffer recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerFormat {
    Mp4,
    Mkv,
    Avi,
    Flv,
    Asf,
    Rm,
    MpegPs,
    Ogg,
    MpegTs,
    Unrecognized,
}

impl ContainerFormat {
    pub fn is_recognized(self) -> bool {
        self != ContainerFormat::Unrecognized
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContainerFormat::Mp4 => "mp4",
            ContainerFormat::Mkv => "mkv",
            ContainerFormat::Avi => "avi",
            ContainerFormat::Flv => "flv",
            ContainerFormat::Asf => "asf",
            ContainerFormat::Rm => "rm",
            ContainerFormat::MpegPs => "mpeg-ps",
            ContainerFormat::Ogg => "ogg",
            ContainerFormat::MpegTs => "mpeg-ts",
            ContainerFormat::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify the leading bytes of a file.
///
/// Returns the first family whose magic matches, in a fixed order. Inputs
/// shorter than [`MIN_SNIFF_LEN`] are `Unrecognized`.
pub fn sniff(data: &[u8]) -> ContainerFormat {
    if data.len() < MIN_SNIFF_LEN {
        debug!("sniff: only {} bytes, not classifying", data.len());
        return ContainerFormat::Unrecognized;
    }

    let format = if has_at(data, 4, magic::MP4_FTYP) {
        ContainerFormat::Mp4
    } else if has_at(data, 0, magic::EBML) {
        ContainerFormat::Mkv
    } else if has_at(data, 0, magic::RIFF) && has_at(data, 8, magic::AVI_FORM) {
        ContainerFormat::Avi
    } else if has_at(data, 0, magic::FLV) {
        ContainerFormat::Flv
    } else if has_at(data, 0, magic::ASF_HEADER_GUID) {
        ContainerFormat::Asf
    } else if has_at(data, 0, magic::REALMEDIA) {
        ContainerFormat::Rm
    } else if has_at(data, 0, magic::MPEG_START_CODE) {
        ContainerFormat::MpegPs
    } else if has_at(data, 0, magic::OGG) {
        ContainerFormat::Ogg
    } else if has_ts_sync(data) {
        ContainerFormat::MpegTs
    } else {
        ContainerFormat::Unrecognized
    };
    debug!("sniff: classified as {}", format);
    format
}

/// Three sync bytes at consecutive 188-byte packet boundaries from offset 0.
pub fn has_ts_sync(data: &[u8]) -> bool {
    (0..3).all(|k| data.get(k * magic::TS_PACKET_LEN) == Some(&magic::TS_SYNC))
}

/// True when the file begins with a PE, ELF or Mach-O header.
pub fn starts_with_executable(data: &[u8]) -> bool {
    has_at(data, 0, magic::PE_MZ)
        || has_at(data, 0, magic::ELF)
        || has_at(data, 0, magic::MACHO_FAT)
        || magic::MACHO_THIN.iter().any(|m| has_at(data, 0, *m))
}

/// True when the file begins with any SWF header (plain, zlib or LZMA).
pub fn starts_with_swf(data: &[u8]) -> bool {
    [magic::SWF_UNCOMPRESSED, magic::SWF_ZLIB, magic::SWF_LZMA]
        .iter()
        .any(|m| has_at(data, 0, *m))
}
