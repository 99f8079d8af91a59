//! Container overflow detectors.
//!
//! Each detector walks one family's self-describing length fields and flags
//! sizes that are impossible, absurd, or larger than the file. Malformed or
//! truncated structure ends the walk with "not suspicious"; no detector can
//! fail or index out of bounds.
//!
//! Detectors are independent. A window may carry several container magics
//! (polyglots) and every detector whose magic is present runs.

pub mod asf;
pub mod avi;
pub mod flv;
pub mod mkv;
pub mod mp4;
pub mod mpegts;
pub mod ogg;
pub mod rm;

use crate::catalog::magic;
use crate::config::OverflowLimits;
use crate::sniff::{has_ts_sync, ContainerFormat};
use tracing::debug;

/// Signature predicate plus structural check for one container family.
#[derive(Debug, Clone, Copy)]
pub struct OverflowDetector {
    pub format: ContainerFormat,
    pub message: &'static str,
    /// Cheap gate: is this family's magic anywhere in the window.
    pub present: fn(&[u8]) -> bool,
    /// Structural walk over the window, given the true file size (0 if unknown).
    pub check: fn(&[u8], u64, &OverflowLimits) -> bool,
}

impl OverflowDetector {
    pub fn run(&self, data: &[u8], file_size: u64, limits: &OverflowLimits) -> bool {
        (self.present)(data) && (self.check)(data, file_size, limits)
    }
}

pub const DETECTORS: &[OverflowDetector] = &[
    OverflowDetector {
        format: ContainerFormat::Mp4,
        message: "MP4 container: suspicious atom size (potential integer overflow in ctts/stts/stsc/co64/stco)",
        present: |d| magic::contains(d, magic::MP4_FTYP),
        check: mp4::has_overflow,
    },
    OverflowDetector {
        format: ContainerFormat::Flv,
        message: "FLV container: suspicious tag size (potential overflow exploit)",
        present: |d| magic::contains(d, magic::FLV),
        check: flv::has_overflow,
    },
    OverflowDetector {
        format: ContainerFormat::Mkv,
        message: "MKV/WebM EBML: suspicious element size (potential overflow exploit)",
        present: |d| magic::contains(d, magic::EBML),
        check: mkv::has_overflow,
    },
    OverflowDetector {
        format: ContainerFormat::Avi,
        message: "AVI/RIFF container: suspicious chunk size (potential overflow exploit)",
        present: |d| magic::contains(d, magic::RIFF),
        check: avi::has_overflow,
    },
    OverflowDetector {
        format: ContainerFormat::Ogg,
        message: "Ogg container: invalid page or oversized segment (potential overflow)",
        present: |d| magic::contains(d, magic::OGG),
        check: ogg::has_overflow,
    },
    OverflowDetector {
        format: ContainerFormat::MpegTs,
        message: "MPEG-TS: suspicious section length in PSI (potential overflow)",
        present: has_ts_sync,
        check: mpegts::has_overflow,
    },
    OverflowDetector {
        format: ContainerFormat::Asf,
        message: "ASF/WMV container: suspicious object size (potential overflow exploit)",
        present: |d| magic::contains(d, magic::ASF_HEADER_GUID),
        check: asf::has_overflow,
    },
    OverflowDetector {
        format: ContainerFormat::Rm,
        message: "RealMedia container: suspicious chunk size (potential overflow exploit)",
        present: |d| magic::contains(d, magic::REALMEDIA),
        check: rm::has_overflow,
    },
];

/// Run every detector whose magic appears in `data`, returning the
/// detectors that flagged the window, in table order.
pub fn detect_overflows(
    data: &[u8],
    file_size: u64,
    limits: &OverflowLimits,
) -> Vec<&'static OverflowDetector> {
    DETECTORS
        .iter()
        .filter(|d| d.run(data, file_size, limits))
        .inspect(|d| debug!(format = %d.format, "container overflow detected"))
        .collect()
}
