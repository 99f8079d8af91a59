//! Ogg page walk.
//!
//! A page is a 27-byte header, a segment table of `segment_count` bytes, and
//! the sum of the segment table's values in payload. With the protocol
//! maximum as the limit a well-formed table can never exceed it, so the check
//! only bites when the limit is configured lower.

use crate::catalog::magic::{has_at, OGG};
use crate::config::OverflowLimits;

const PAGE_HEADER_LEN: usize = 27;
const SEGMENT_COUNT_OFFSET: usize = 26;

pub fn has_overflow(data: &[u8], _file_size: u64, limits: &OverflowLimits) -> bool {
    let mut pos = 0usize;
    while pos + PAGE_HEADER_LEN <= data.len() && has_at(data, pos, OGG) {
        let segments = data[pos + SEGMENT_COUNT_OFFSET] as usize;
        let table_start = pos + PAGE_HEADER_LEN;
        let Some(table) = data.get(table_start..table_start + segments) else {
            break;
        };
        let payload: usize = table.iter().map(|&b| b as usize).sum();
        let page_size = PAGE_HEADER_LEN + segments + payload;
        if page_size > limits.ogg_max_page {
            return true;
        }
        pos += page_size;
    }
    false
}
