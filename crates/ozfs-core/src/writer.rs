//! The chunked write loop
//!
//! A request is written as a sequence of `chunk_size` writes from one reused
//! buffer, with a shorter final write when the total is not a multiple of the
//! chunk size. The first write that does not take exactly the requested
//! length ends the loop; nothing is retried.

use crate::{ChunkBuffer, Error, Result, WriteRequest};
use std::io::Write;
use tracing::trace;

/// Outcome of a completed write loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// Number of write calls issued
    pub chunks: u64,
    /// Total bytes written
    pub bytes: u64,
}

/// Remaining work of a write loop
///
/// Yields the length of each write in order until nothing is left.
#[derive(Debug, Clone)]
pub struct WriteProgress {
    remaining: u64,
    chunk_size: usize,
}

impl WriteProgress {
    /// Start tracking a request from its first byte
    pub fn new(request: &WriteRequest) -> Self {
        Self {
            remaining: request.total_size(),
            chunk_size: request.chunk_size().get(),
        }
    }

    /// Bytes not yet written
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// True once every byte has been written
    pub fn is_done(&self) -> bool {
        self.remaining == 0
    }
}

impl Iterator for WriteProgress {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        // Fits in usize: bounded by chunk_size.
        let current = self.remaining.min(self.chunk_size as u64) as usize;
        self.remaining -= current as u64;
        Some(current)
    }
}

/// Write `request.total_size()` bytes from `buffer` to `handle`
///
/// See [`write_all_with_progress`].
pub fn write_all<W>(handle: &mut W, request: &WriteRequest, buffer: &ChunkBuffer) -> Result<WriteSummary>
where
    W: Write + ?Sized,
{
    write_all_with_progress(handle, request, buffer, |_| {})
}

/// Write `request.total_size()` bytes from `buffer` to `handle`, calling
/// `on_chunk` with the cumulative byte count after every successful write
///
/// Each iteration issues exactly one `write` of
/// `min(chunk_size, remaining)` bytes from the start of `buffer`. The handle
/// is borrowed: it is neither flushed nor closed here.
///
/// # Errors
/// - [`Error::BufferTooSmall`] if `buffer` cannot hold a chunk (no write is issued)
/// - [`Error::ShortWrite`] if a write returns a length other than requested
/// - [`Error::Write`] if the handle reports an I/O error
pub fn write_all_with_progress<W, F>(
    handle: &mut W,
    request: &WriteRequest,
    buffer: &ChunkBuffer,
    mut on_chunk: F,
) -> Result<WriteSummary>
where
    W: Write + ?Sized,
    F: FnMut(u64),
{
    let chunk_size = request.chunk_size().get();
    if buffer.len() < chunk_size {
        return Err(Error::BufferTooSmall {
            buffer: buffer.len(),
            chunk: chunk_size,
        });
    }

    let mut progress = request.chunk_sizes();
    let mut summary = WriteSummary::default();

    while let Some(current) = progress.next() {
        let written = handle.write(&buffer[..current]).map_err(Error::Write)?;
        if written != current {
            return Err(Error::ShortWrite {
                expected: current,
                actual: written,
            });
        }

        summary.chunks += 1;
        summary.bytes += current as u64;
        trace!(
            chunk = summary.chunks,
            len = current,
            remaining = progress.remaining(),
            "chunk written"
        );
        on_chunk(summary.bytes);
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    /// Accepts everything, remembering each write length
    #[derive(Default)]
    struct Lengths(Vec<usize>);

    impl Write for Lengths {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.push(buf.len());
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn run(total: u64, chunk: usize) -> (Vec<usize>, WriteSummary) {
        let request = WriteRequest::new(total, chunk).unwrap();
        let buffer = ChunkBuffer::for_request(&request).unwrap();
        let mut sink = Lengths::default();
        let summary = write_all(&mut sink, &request, &buffer).unwrap();
        (sink.0, summary)
    }

    #[test]
    fn test_progress_yields_chunk_plan() {
        let request = WriteRequest::new(100, 30).unwrap();
        assert_eq!(request.chunk_sizes().collect::<Vec<_>>(), vec![30, 30, 30, 10]);

        let mut progress = WriteProgress::new(&request);
        assert!(!progress.is_done());
        progress.next();
        assert_eq!(progress.remaining(), 70);
    }

    #[test]
    fn test_zero_total_issues_no_writes() {
        let (writes, summary) = run(0, 30);
        assert!(writes.is_empty());
        assert_eq!(summary, WriteSummary::default());
    }

    #[test]
    fn test_trailing_short_chunk() {
        let (writes, summary) = run(100, 30);
        assert_eq!(writes, vec![30, 30, 30, 10]);
        assert_eq!(summary.chunks, 4);
        assert_eq!(summary.bytes, 100);
    }

    #[test]
    fn test_exact_multiple() {
        assert_eq!(run(30, 30).0, vec![30]);
        assert_eq!(run(90, 30).0, vec![30, 30, 30]);
    }

    #[test]
    fn test_chunk_larger_than_total() {
        assert_eq!(run(7, 4096).0, vec![7]);
    }

    #[test]
    fn test_progress_callback_reports_cumulative_bytes() {
        let request = WriteRequest::new(25, 10).unwrap();
        let buffer = ChunkBuffer::for_request(&request).unwrap();
        let mut seen = Vec::new();
        write_all_with_progress(&mut Lengths::default(), &request, &buffer, |n| seen.push(n)).unwrap();
        assert_eq!(seen, vec![10, 20, 25]);
    }

    #[test]
    fn test_buffer_too_small() {
        let request = WriteRequest::new(100, 64).unwrap();
        let buffer = ChunkBuffer::build(std::num::NonZeroUsize::new(32).unwrap()).unwrap();
        let mut sink = Lengths::default();
        let err = write_all(&mut sink, &request, &buffer).unwrap_err();
        assert!(matches!(err, Error::BufferTooSmall { buffer: 32, chunk: 64 }));
        assert!(sink.0.is_empty());
    }

    #[test]
    fn test_writes_into_std_sink() {
        let request = WriteRequest::new(52, 26).unwrap();
        let buffer = ChunkBuffer::for_request(&request).unwrap();
        let mut out: Vec<u8> = Vec::new();
        write_all(&mut out, &request, &buffer).unwrap();
        assert_eq!(out, b"abcdefghijklmnopqrstuvwxyzabcdefghijklmnopqrstuvwxyz");
    }
}
