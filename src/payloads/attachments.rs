//! Executable file names inside Matroska attachments.
//!
//! This does not parse the Attachments element. An executable extension
//! counts when the bytes around it look like part of a file name: printable
//! ASCII, NUL, or the edge of the window.

use crate::catalog::magic::{has_at, ATTACHMENT_EXECUTABLE_EXTENSIONS, EBML};
use aho_corasick::{AhoCorasick, AhoCorasickBuilder};
use once_cell::sync::Lazy;

static EXTENSIONS: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasickBuilder::new()
        .ascii_case_insensitive(true)
        .build(ATTACHMENT_EXECUTABLE_EXTENSIONS)
        .expect("build attachment extension automaton")
});

#[inline]
fn is_name_context(b: u8) -> bool {
    b == 0 || (0x20..=0x7E).contains(&b)
}

/// Only windows that start with the EBML magic are searched.
pub fn has_executable_attachment(data: &[u8]) -> bool {
    if !has_at(data, 0, EBML) {
        return false;
    }
    EXTENSIONS.find_iter(data).any(|m| {
        let before_ok = m.start() == 0 || is_name_context(data[m.start() - 1]);
        let after_ok = data.get(m.end()).map_or(true, |&b| is_name_context(b));
        before_ok && after_ok
    })
}
