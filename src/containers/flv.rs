//! FLV tag walk.

use crate::catalog::magic::{has_at, read_u24_be, FLV};
use crate::config::OverflowLimits;

/// Signature (3) + version (1) + flags (1) + header size (4).
const FILE_HEADER_LEN: usize = 9;
/// Previous tag size (4) + type (1) + data size (3) + timestamp (4) + stream id (3).
const TAG_HEADER_LEN: usize = 15;
/// Bytes a tag must have in the window before its size is read.
const MIN_TAG_BYTES: usize = 11;

pub fn has_overflow(data: &[u8], _file_size: u64, limits: &OverflowLimits) -> bool {
    if data.len() < FILE_HEADER_LEN + TAG_HEADER_LEN || !has_at(data, 0, FLV) {
        return false;
    }

    let mut pos = FILE_HEADER_LEN;
    while pos + MIN_TAG_BYTES <= data.len() {
        let Some(size) = read_u24_be(data, pos + 5) else {
            break;
        };
        if u64::from(size) > limits.flv_max_tag {
            return true;
        }
        let next = pos + TAG_HEADER_LEN + size as usize;
        if next <= pos {
            // No forward progress: the walk is being steered in place.
            return true;
        }
        if next > data.len() {
            break;
        }
        pos = next;
    }
    false
}
