//! Matroska/WebM EBML element walk.
//!
//! Elements are walked from offset 0: ID vint, size vint, then either the
//! children (master elements) or a skip over the body (everything else).
//! Only size fields the walk actually reaches are checked, so block payload
//! bytes are never mistaken for sizes. Unknown-size elements are descended
//! into, as live streams use them for Segment and Cluster.

use crate::catalog::magic::{has_at, EBML};
use crate::config::OverflowLimits;

/// Longest element ID vint Matroska allows.
const MAX_ID_LEN: usize = 4;
const MAX_SIZE_LEN: usize = 8;

/// Elements whose body is a sequence of child elements.
const MASTER_IDS: &[u64] = &[
    0x1A45_DFA3, // EBML
    0x1853_8067, // Segment
    0x114D_9B74, // SeekHead
    0x4DBB,      // Seek
    0x1549_A966, // Info
    0x1654_AE6B, // Tracks
    0xAE,        // TrackEntry
    0xE0,        // Video
    0xE1,        // Audio
    0x6D80,      // ContentEncodings
    0x1F43_B675, // Cluster
    0xA0,        // BlockGroup
    0x1C53_BB6B, // Cues
    0x1941_A469, // Attachments
    0x61A7,      // AttachedFile
    0x1043_A770, // Chapters
    0x1254_C367, // Tags
    0x7373,      // Tag
];

/// A decoded vint: its value and encoded length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Vint {
    value: u64,
    len: usize,
}

impl Vint {
    /// All value bits set: the reserved "unknown length" marker.
    fn is_unknown_size(self) -> bool {
        self.value == (1u64 << (7 * self.len)) - 1
    }
}

/// Read a vint at `pos`. `raw` keeps the length marker bits, as element IDs do.
fn read_vint(data: &[u8], pos: usize, max_len: usize, raw: bool) -> Option<Vint> {
    let lead = *data.get(pos)?;
    if lead == 0 {
        return None;
    }
    let len = lead.leading_zeros() as usize + 1;
    if len > max_len {
        return None;
    }
    let bytes = data.get(pos..pos.checked_add(len)?)?;
    let first = if raw {
        u64::from(lead)
    } else {
        u64::from(lead) & ((1u64 << (8 - len)) - 1)
    };
    let value = bytes[1..]
        .iter()
        .fold(first, |acc, &b| (acc << 8) | u64::from(b));
    Some(Vint { value, len })
}

pub fn has_overflow(data: &[u8], file_size: u64, limits: &OverflowLimits) -> bool {
    if !has_at(data, 0, EBML) {
        return false;
    }

    let mut pos = 0usize;
    loop {
        let Some(id) = read_vint(data, pos, MAX_ID_LEN, true) else {
            break;
        };
        let Some(size) = read_vint(data, pos + id.len, MAX_SIZE_LEN, false) else {
            break;
        };
        let body = pos + id.len + size.len;

        if size.is_unknown_size() {
            pos = body;
            continue;
        }
        if size.value > limits.mkv_max_element || (file_size > 0 && size.value > file_size) {
            return true;
        }
        if MASTER_IDS.contains(&id.value) {
            pos = body;
            continue;
        }
        // Leaf: skip the body; a body running past the window ends the walk.
        match usize::try_from(size.value)
            .ok()
            .and_then(|len| body.checked_add(len))
        {
            Some(next) if next <= data.len() => pos = next,
            _ => break,
        }
    }
    false
}
