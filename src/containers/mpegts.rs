//! MPEG transport stream PSI section lengths.
//!
//! Only packets that start a payload unit carry a pointer field, so only
//! those are inspected. PES packets also set that flag, but their start code
//! decodes to a section length of at most 0x1FF and never trips the check.

use crate::catalog::magic::{read_u16_be, TS_PACKET_LEN, TS_SYNC};
use crate::config::OverflowLimits;
use crate::sniff::has_ts_sync;

const PAYLOAD_UNIT_START: u8 = 0x40;
const ADAPTATION_FIELD: u8 = 0x20;
const TS_HEADER_LEN: usize = 4;
const SECTION_LENGTH_MASK: u16 = 0x0FFF;

/// Length field of the PSI section that starts in `packet`, if any.
fn section_length(packet: &[u8]) -> Option<u16> {
    if packet[1] & PAYLOAD_UNIT_START == 0 {
        return None;
    }
    let mut payload = TS_HEADER_LEN;
    if packet[3] & ADAPTATION_FIELD != 0 {
        payload += 1 + *packet.get(TS_HEADER_LEN)? as usize;
    }
    let pointer = *packet.get(payload)? as usize;
    // table_id, then the 12-bit length.
    let section = payload + 1 + pointer;
    read_u16_be(packet, section + 1).map(|v| v & SECTION_LENGTH_MASK)
}

pub fn has_overflow(data: &[u8], _file_size: u64, limits: &OverflowLimits) -> bool {
    if !has_ts_sync(data) {
        return false;
    }

    data.chunks_exact(TS_PACKET_LEN)
        .filter(|packet| packet[0] == TS_SYNC)
        .filter_map(section_length)
        .any(|len| len as usize > limits.ts_max_section)
}
