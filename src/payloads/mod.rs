//! Embedded-payload detectors.
//!
//! Bounded byte-sequence searches, not parses, for content that has no
//! business inside a video file. All detectors run over every window
//! regardless of the sniffed container format.

pub mod attachments;
pub mod executables;
pub mod objects;

use crate::config::PayloadLimits;
use crate::scanner::WindowOrigin;
use serde::Serialize;
use tracing::debug;

/// Kinds of embedded payload the detectors recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Payload {
    Pe,
    Elf,
    MachO,
    CompressedSwf,
    JavaSerialized,
    Pickle,
    OpenType,
    /// Only meaningful at the start of a Matroska file.
    MkvExecutableAttachment,
}

impl Payload {
    /// Finding text for a hit in a window of the given origin.
    pub fn message(self, origin: WindowOrigin) -> &'static str {
        match (self, origin) {
            (Payload::Pe, WindowOrigin::Head) => "Embedded Windows executable detected (PE)",
            (Payload::Pe, WindowOrigin::Tail) => "Appended Windows executable (PE) at end of file",
            (Payload::Elf, WindowOrigin::Head) => "Embedded ELF executable detected",
            (Payload::Elf, WindowOrigin::Tail) => "Appended ELF executable at end of file",
            (Payload::MachO, WindowOrigin::Head) => "Embedded Mach-O executable (macOS) detected",
            (Payload::MachO, WindowOrigin::Tail) => "Appended Mach-O executable at end of file",
            (Payload::CompressedSwf, WindowOrigin::Head) => {
                "Embedded compressed SWF/Flash detected (potential exploit vector)"
            }
            (Payload::CompressedSwf, WindowOrigin::Tail) => {
                "Appended compressed SWF/Flash at end of file (potential exploit vector)"
            }
            (Payload::JavaSerialized, WindowOrigin::Head) => {
                "Embedded Java serialized object detected (deserialization RCE vector)"
            }
            (Payload::JavaSerialized, WindowOrigin::Tail) => {
                "Appended Java serialized object at end of file (deserialization RCE vector)"
            }
            (Payload::Pickle, WindowOrigin::Head) => {
                "Embedded Python pickle detected (deserialization RCE vector)"
            }
            (Payload::Pickle, WindowOrigin::Tail) => {
                "Appended Python pickle at end of file (deserialization RCE vector)"
            }
            (Payload::OpenType, WindowOrigin::Head) => {
                "Embedded OpenType font detected (font parsing exploit vector)"
            }
            (Payload::OpenType, WindowOrigin::Tail) => {
                "Appended OpenType font at end of file (font parsing exploit vector)"
            }
            (Payload::MkvExecutableAttachment, _) => {
                "MKV: attached file with executable extension (.exe/.dll/etc)"
            }
        }
    }
}

/// Run every payload detector over `data`, in a fixed order.
///
/// The attachment check is skipped for tail windows: attachment tables live
/// in the Matroska header area and need the EBML magic at offset 0.
pub fn detect_payloads(data: &[u8], origin: WindowOrigin, limits: &PayloadLimits) -> Vec<Payload> {
    let checks: [(Payload, bool); 8] = [
        (Payload::Pe, executables::has_pe(data, limits)),
        (Payload::Elf, executables::has_elf(data)),
        (Payload::MachO, executables::has_macho(data)),
        (Payload::CompressedSwf, objects::has_swf(data, limits)),
        (Payload::JavaSerialized, objects::has_java_serialized(data)),
        (Payload::Pickle, objects::has_pickle(data, limits)),
        (Payload::OpenType, objects::has_opentype(data, limits)),
        (
            Payload::MkvExecutableAttachment,
            origin == WindowOrigin::Head && attachments::has_executable_attachment(data),
        ),
    ];

    checks
        .into_iter()
        .filter(|&(_, hit)| hit)
        .map(|(payload, _)| {
            debug!(?payload, ?origin, "embedded payload detected");
            payload
        })
        .collect()
}
