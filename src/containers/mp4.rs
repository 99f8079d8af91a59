//! MP4/MOV sample-table atoms.
//!
//! No box tree is walked. Every occurrence of a sample-table tag is checked
//! against the 32-bit size stored in the four bytes before it, which also
//! catches atoms reached mid-stream.

use crate::catalog::magic::{read_u32_be, MP4_OVERFLOW_ATOMS};
use crate::config::OverflowLimits;
use memchr::memmem;

/// Box size value announcing a 64-bit `largesize` field.
const EXTENDED_SIZE: u32 = 1;

pub fn has_overflow(data: &[u8], _file_size: u64, limits: &OverflowLimits) -> bool {
    MP4_OVERFLOW_ATOMS.iter().any(|tag| {
        memmem::find_iter(data, *tag)
            .filter(|&pos| pos >= 4)
            .filter_map(|pos| read_u32_be(data, pos - 4))
            .any(|size| is_suspicious(size, limits.mp4_max_atom))
    })
}

fn is_suspicious(size: u32, max_atom: u64) -> bool {
    size == u32::MAX || (u64::from(size) > max_atom && size != EXTENDED_SIZE)
}
