//! ASF/WMV top-level object walk.

use crate::catalog::magic::{has_at, read_u64_le, ASF_HEADER_GUID};
use crate::config::OverflowLimits;

/// GUID (16) + little-endian object size (8).
const OBJECT_HEADER_LEN: u64 = 24;
const SIZE_OFFSET: usize = 16;

pub fn has_overflow(data: &[u8], file_size: u64, limits: &OverflowLimits) -> bool {
    if !has_at(data, 0, ASF_HEADER_GUID) {
        return false;
    }

    let mut pos = 0usize;
    while let Some(size) = read_u64_le(data, pos + SIZE_OFFSET) {
        if size == u64::MAX
            || size > limits.asf_max_object
            || (file_size > 0 && size > file_size)
            || size < OBJECT_HEADER_LEN
        {
            return true;
        }
        match usize::try_from(size).ok().and_then(|len| pos.checked_add(len)) {
            Some(next) if next > pos && next <= data.len() => pos = next,
            _ => break,
        }
    }
    false
}
