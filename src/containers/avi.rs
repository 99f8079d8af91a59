//! AVI/RIFF chunk walk.

use crate::catalog::magic::{has_at, read_u32_le, AVI_FORM, RIFF};
use crate::config::OverflowLimits;

/// `RIFF` + file size + form type.
const RIFF_HEADER_LEN: usize = 12;
/// Chunk ID + little-endian size.
const CHUNK_HEADER_LEN: usize = 8;
const MAX_SIGNED_SIZE: u32 = 0x7FFF_FFFF;

pub fn has_overflow(data: &[u8], file_size: u64, _limits: &OverflowLimits) -> bool {
    if !has_at(data, 0, RIFF) || !has_at(data, 8, AVI_FORM) {
        return false;
    }

    let mut pos = RIFF_HEADER_LEN;
    while let Some(size) = read_u32_le(data, pos + 4) {
        if size == u32::MAX
            || size > MAX_SIGNED_SIZE
            || (file_size > 0 && u64::from(size) > file_size)
        {
            return true;
        }
        // Chunks are word aligned.
        let padded = size as usize + (size as usize & 1);
        let next = pos + CHUNK_HEADER_LEN + padded;
        if next > data.len() {
            break;
        }
        pos = next;
    }
    false
}
