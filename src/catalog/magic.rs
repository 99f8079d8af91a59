//! Binary signatures and magic numbers.
//!
//! Consolidates the container, executable, font and serialization magics
//! used by the sniffer, the overflow detectors and the payload detectors.

/// MP4/MOV/M4V brand box, found at offset 4.
pub const MP4_FTYP: &[u8; 4] = b"ftyp";
/// EBML header shared by Matroska and WebM.
pub const EBML: &[u8; 4] = &[0x1A, 0x45, 0xDF, 0xA3];
pub const RIFF: &[u8; 4] = b"RIFF";
/// RIFF form type for AVI, found at offset 8.
pub const AVI_FORM: &[u8; 4] = b"AVI ";
pub const FLV: &[u8; 3] = b"FLV";
/// First half of the ASF header object GUID.
pub const ASF_HEADER_GUID: &[u8; 8] = &[0x30, 0x26, 0xB2, 0x75, 0x8E, 0x66, 0xCF, 0x11];
pub const REALMEDIA: &[u8; 4] = b".RMF";
/// MPEG program stream start code prefix.
pub const MPEG_START_CODE: &[u8; 3] = &[0x00, 0x00, 0x01];
pub const OGG: &[u8; 4] = b"OggS";
pub const TS_SYNC: u8 = 0x47;
pub const TS_PACKET_LEN: usize = 188;

/// MP4 sample-table atoms with a history of integer-overflow bugs.
pub const MP4_OVERFLOW_ATOMS: [&[u8; 4]; 5] = [b"ctts", b"stts", b"stsc", b"co64", b"stco"];

pub const PE_MZ: &[u8; 2] = b"MZ";
pub const PE_SIGNATURE: &[u8; 4] = b"PE\0\0";
/// Offset of `e_lfanew` inside the DOS header.
pub const PE_LFANEW_OFFSET: usize = 0x3C;
pub const ELF: &[u8; 4] = &[0x7F, b'E', b'L', b'F'];

/// Thin Mach-O magics, both byte orders, 32 and 64 bit.
pub const MACHO_THIN: [&[u8; 4]; 4] = [
    &[0xFE, 0xED, 0xFA, 0xCE],
    &[0xFE, 0xED, 0xFA, 0xCF],
    &[0xCE, 0xFA, 0xED, 0xFE],
    &[0xCF, 0xFA, 0xED, 0xFE],
];
/// Universal (fat) Mach-O. Shares its value with Java class files, so it is
/// only trusted at the start of a file.
pub const MACHO_FAT: &[u8; 4] = &[0xCA, 0xFE, 0xBA, 0xBE];

pub const SWF_UNCOMPRESSED: &[u8; 3] = b"FWS";
pub const SWF_ZLIB: &[u8; 3] = b"CWS";
pub const SWF_LZMA: &[u8; 3] = b"ZWS";
/// Magic (3) + version (1) + little-endian file length (4).
pub const SWF_HEADER_LEN: usize = 8;

/// `ObjectOutputStream` stream magic and version.
pub const JAVA_SERIALIZED: &[u8; 4] = &[0xAC, 0xED, 0x00, 0x05];

/// PROTO opcode followed by protocol 2, 3 or 4.
pub const PICKLE_PROTOCOLS: [&[u8; 2]; 3] = [&[0x80, 0x02], &[0x80, 0x03], &[0x80, 0x04]];
pub const PICKLE_GLOBAL: u8 = 0x63;

pub const OPENTYPE_TAGS: [&[u8; 4]; 3] = [b"OTTO", b"true", b"typ1"];
/// sfnt version (4) + numTables (2) + searchRange, entrySelector, rangeShift (6).
pub const OPENTYPE_HEADER_LEN: usize = 12;

/// Executable extensions searched for in Matroska attachment names.
pub const ATTACHMENT_EXECUTABLE_EXTENSIONS: [&str; 8] = [
    ".exe", ".dll", ".bat", ".cmd", ".ps1", ".vbs", ".jar", ".swf",
];

#[inline]
pub(crate) fn read_u16_be(data: &[u8], at: usize) -> Option<u16> {
    let b = data.get(at..at.checked_add(2)?)?;
    Some(u16::from_be_bytes([b[0], b[1]]))
}

#[inline]
pub(crate) fn read_u24_be(data: &[u8], at: usize) -> Option<u32> {
    let b = data.get(at..at.checked_add(3)?)?;
    Some(u32::from_be_bytes([0, b[0], b[1], b[2]]))
}

#[inline]
pub(crate) fn read_u32_be(data: &[u8], at: usize) -> Option<u32> {
    let b = data.get(at..at.checked_add(4)?)?;
    Some(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
}

#[inline]
pub(crate) fn read_u32_le(data: &[u8], at: usize) -> Option<u32> {
    let b = data.get(at..at.checked_add(4)?)?;
    Some(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

#[inline]
pub(crate) fn read_u64_le(data: &[u8], at: usize) -> Option<u64> {
    let b = data.get(at..at.checked_add(8)?)?;
    let mut raw = [0u8; 8];
    raw.copy_from_slice(b);
    Some(u64::from_le_bytes(raw))
}

/// True when `data` holds `magic` at `offset`.
#[inline]
pub(crate) fn has_at(data: &[u8], offset: usize, magic: &[u8]) -> bool {
    offset
        .checked_add(magic.len())
        .and_then(|end| data.get(offset..end))
        .is_some_and(|window| window == magic)
}

/// True when `magic` occurs anywhere in `data`.
#[inline]
pub(crate) fn contains(data: &[u8], magic: &[u8]) -> bool {
    memchr::memmem::find(data, magic).is_some()
}
