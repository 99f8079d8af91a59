//! Shared test utilities for creating temporary files.

use std::io::Write;
use tempfile::NamedTempFile;

/// Creates a temporary file with the given content.
///
/// The file is removed when the returned `NamedTempFile` is dropped.
///
/// # Panics
///
/// Panics if the temporary file cannot be created or written.
pub fn create_temp_file(content: &[u8]) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

/// Creates a temporary file of `size` bytes: `prefix`, then `fill` bytes,
/// then `suffix` at the very end.
pub fn create_temp_file_with_layout(
    prefix: &[u8],
    size: usize,
    fill: u8,
    suffix: &[u8],
) -> NamedTempFile {
    assert!(prefix.len() + suffix.len() <= size);
    let mut content = Vec::with_capacity(size);
    content.extend_from_slice(prefix);
    content.resize(size - suffix.len(), fill);
    content.extend_from_slice(suffix);
    create_temp_file(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_create_temp_file() {
        let temp_file = create_temp_file(b"hello world");
        assert_eq!(fs::read(temp_file.path()).unwrap(), b"hello world");
    }

    #[test]
    fn test_layout() {
        let temp_file = create_temp_file_with_layout(b"AB", 10, 0xEE, b"YZ");
        let data = fs::read(temp_file.path()).unwrap();
        assert_eq!(data.len(), 10);
        assert_eq!(&data[..2], b"AB");
        assert_eq!(&data[8..], b"YZ");
        assert!(data[2..8].iter().all(|&b| b == 0xEE));
    }
}
