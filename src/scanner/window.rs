//! Bounded, chunked reads of the head and tail windows.
//!
//! Memory use per scan is bounded by the two window caps regardless of file
//! size. Cancellation is checked before every chunk.

use crate::cancel::CancelToken;
use crate::error::Result;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use tracing::{debug, trace};

/// Which end of the file a window was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowOrigin {
    Head,
    Tail,
}

/// The bytes under examination plus what is known about the file.
#[derive(Debug, Clone)]
pub struct ScanContext {
    pub bytes: Vec<u8>,
    /// True size of the file; 0 when unknown.
    pub file_size: u64,
    pub origin: WindowOrigin,
}

impl ScanContext {
    pub fn new(bytes: Vec<u8>, file_size: u64, origin: WindowOrigin) -> Self {
        Self {
            bytes,
            file_size,
            origin,
        }
    }
}

/// A reader that yields at most `limit` bytes from its inner reader.
pub struct BoundedReader<R> {
    inner: R,
    bytes_read: u64,
    limit: u64,
}

impl<R: Read> BoundedReader<R> {
    pub fn new(reader: R, limit: u64) -> Self {
        Self {
            inner: reader,
            bytes_read: 0,
            limit,
        }
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }
}

impl<R: Read> Read for BoundedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.bytes_read >= self.limit {
            return Ok(0);
        }
        let remaining = self.limit - self.bytes_read;
        let max_to_read = std::cmp::min(buf.len() as u64, remaining) as usize;
        let n = self.inner.read(&mut buf[..max_to_read])?;
        self.bytes_read += n as u64;
        Ok(n)
    }
}

/// Read up to `cap` bytes from `reader` in `chunk`-sized pieces.
pub fn read_chunked<R: Read>(
    reader: R,
    cap: usize,
    chunk: usize,
    cancel: &CancelToken,
) -> Result<Vec<u8>> {
    let mut bounded = BoundedReader::new(reader, cap as u64);
    let mut out = Vec::with_capacity(cap.min(chunk.saturating_mul(4)));
    let mut buf = vec![0u8; chunk.max(1)];
    loop {
        cancel.check()?;
        let n = match bounded.read(&mut buf) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        if n == 0 {
            break;
        }
        out.extend_from_slice(&buf[..n]);
        trace!(total = out.len(), "read chunk of {} bytes", n);
    }
    debug!("read window of {} bytes", bounded.bytes_read());
    Ok(out)
}

/// Read the head window from the start of `file`.
pub fn read_head(
    file: &mut File,
    file_size: u64,
    cap: usize,
    chunk: usize,
    cancel: &CancelToken,
) -> Result<ScanContext> {
    file.seek(SeekFrom::Start(0))?;
    let bytes = read_chunked(&mut *file, cap, chunk, cancel)?;
    Ok(ScanContext::new(bytes, file_size, WindowOrigin::Head))
}

/// Read the last `cap` bytes of `file`.
pub fn read_tail(
    file: &mut File,
    file_size: u64,
    cap: usize,
    chunk: usize,
    cancel: &CancelToken,
) -> Result<ScanContext> {
    cancel.check()?;
    let offset = file_size.saturating_sub(cap as u64);
    file.seek(SeekFrom::Start(offset))?;
    let bytes = read_chunked(&mut *file, cap, chunk, cancel)?;
    Ok(ScanContext::new(bytes, file_size, WindowOrigin::Tail))
}
