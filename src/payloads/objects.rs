//! Serialized objects, Flash and font payloads.
//!
//! Each short magic is paired with a structural sanity check; compressed
//! video produces these byte sequences by chance often enough that a bare
//! match is noise.

use crate::catalog::magic::{self, read_u16_be, read_u32_le};
use crate::config::PayloadLimits;
use memchr::memmem;

/// Compressed SWF (`CWS`/`ZWS`) followed by a plausible version and length.
pub fn has_swf(data: &[u8], limits: &PayloadLimits) -> bool {
    [magic::SWF_ZLIB, magic::SWF_LZMA].iter().any(|sig| {
        memmem::find_iter(data, *sig).any(|pos| {
            if pos + magic::SWF_HEADER_LEN > data.len() {
                return false;
            }
            let version = data[pos + 3];
            let Some(length) = read_u32_le(data, pos + 4) else {
                return false;
            };
            (limits.swf_min_version..=limits.swf_max_version).contains(&version)
                && (limits.swf_min_length..=limits.swf_max_length).contains(&length)
        })
    })
}

pub fn has_java_serialized(data: &[u8]) -> bool {
    magic::contains(data, magic::JAVA_SERIALIZED)
}

/// Pickle PROTO header, a GLOBAL opcode, and the newline ending its module name.
pub fn has_pickle(data: &[u8], limits: &PayloadLimits) -> bool {
    magic::PICKLE_PROTOCOLS.iter().any(|proto| {
        memmem::find_iter(data, *proto).any(|pos| {
            if data.get(pos + 2) != Some(&magic::PICKLE_GLOBAL) {
                return false;
            }
            let start = pos + 3;
            let end = (start + limits.pickle_newline_window).min(data.len());
            start < end && memchr::memchr(b'\n', &data[start..end]).is_some()
        })
    })
}

/// sfnt header tag with a table count in range.
pub fn has_opentype(data: &[u8], limits: &PayloadLimits) -> bool {
    magic::OPENTYPE_TAGS.iter().any(|tag| {
        memmem::find_iter(data, *tag).any(|pos| {
            if pos + magic::OPENTYPE_HEADER_LEN > data.len() {
                return false;
            }
            read_u16_be(data, pos + 4).is_some_and(|tables| {
                (limits.opentype_min_tables..=limits.opentype_max_tables).contains(&tables)
            })
        })
    })
}
