//! RealMedia chunk walk.
//!
//! Chunk sizes count the chunk's own 8-byte ID and size prefix, so a size
//! below that floor can never be valid.

use crate::catalog::magic::{has_at, read_u32_be, REALMEDIA};
use crate::config::OverflowLimits;

const CHUNK_HEADER_LEN: u32 = 8;
const MAX_SIGNED_SIZE: u32 = 0x7FFF_FFFF;

pub fn has_overflow(data: &[u8], file_size: u64, limits: &OverflowLimits) -> bool {
    if !has_at(data, 0, REALMEDIA) {
        return false;
    }

    let mut pos = 0usize;
    while pos <= limits.rm_walk_cap {
        let Some(size) = read_u32_be(data, pos + 4) else {
            break;
        };
        if size == u32::MAX
            || size > MAX_SIGNED_SIZE
            || size < CHUNK_HEADER_LEN
            || (file_size > 0 && u64::from(size) > file_size)
        {
            return true;
        }
        let next = pos + size as usize;
        if next > data.len() {
            break;
        }
        pos = next;
    }
    false
}
