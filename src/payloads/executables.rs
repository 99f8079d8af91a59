//! Native executable signatures: PE, ELF, Mach-O.

use crate::catalog::magic::{self, has_at, read_u32_le};
use crate::config::PayloadLimits;
use memchr::memmem;

/// An `MZ` whose DOS header points, within range, at a `PE\0\0` signature.
pub fn has_pe(data: &[u8], limits: &PayloadLimits) -> bool {
    memmem::find_iter(data, magic::PE_MZ).any(|mz| {
        let Some(lfanew) = read_u32_le(data, mz + magic::PE_LFANEW_OFFSET) else {
            return false;
        };
        if lfanew == 0 || lfanew > limits.pe_max_lfanew {
            return false;
        }
        has_at(data, mz + lfanew as usize, magic::PE_SIGNATURE)
    })
}

pub fn has_elf(data: &[u8]) -> bool {
    magic::contains(data, magic::ELF)
}

/// Thin Mach-O headers in either byte order. The fat magic is left to the
/// start-of-file check since Java class files share it.
pub fn has_macho(data: &[u8]) -> bool {
    magic::MACHO_THIN.iter().any(|m| magic::contains(data, *m))
}

#[cfg(test)]
pub(crate) fn minimal_pe(lfanew: u32) -> Vec<u8> {
    let mut pe = vec![0u8; 0x100];
    pe[0..2].copy_from_slice(b"MZ");
    pe[0x3C..0x40].copy_from_slice(&lfanew.to_le_bytes());
    let at = lfanew as usize;
    if at + 4 <= pe.len() {
        pe[at..at + 4].copy_from_slice(b"PE\0\0");
    }
    pe
}
