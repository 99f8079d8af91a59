//! Printable-ASCII run extraction from binary windows.

/// Printable ASCII, space through tilde.
#[inline]
fn is_printable(b: u8) -> bool {
    (0x20..=0x7E).contains(&b)
}

/// Iterate over printable runs of at least `min_len` bytes.
pub fn printable_runs(data: &[u8], min_len: usize) -> impl Iterator<Item = &str> + '_ {
    data.split(|&b| !is_printable(b))
        .filter(move |run| !run.is_empty() && run.len() >= min_len)
        // Printable ASCII is always valid UTF-8.
        .filter_map(|run| std::str::from_utf8(run).ok())
}

/// Join every qualifying run with single spaces, ready for pattern matching.
pub fn extract_text(data: &[u8], min_len: usize) -> String {
    let mut text = String::new();
    for run in printable_runs(data, min_len) {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(run);
    }
    text
}
