//! Size validation for a write request

use crate::error::SizeField;
use crate::limits::{MAX_CHUNK_SIZE, MAX_FILE_SIZE, MIN_CHUNK_SIZE};
use crate::writer::WriteProgress;
use crate::{Error, Result};
use std::num::{IntErrorKind, NonZeroUsize};

/// A validated request to write `total_size` bytes in chunks of `chunk_size`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WriteRequest {
    total_size: u64,
    chunk_size: NonZeroUsize,
}

impl WriteRequest {
    /// Create a request from already-parsed sizes, applying the same range
    /// checks as [`validate`]
    pub fn new(total_size: u64, chunk_size: usize) -> Result<Self> {
        let chunk = chunk_size as u64;
        let chunk_size = narrow_chunk_size(chunk, &chunk.to_string())?;
        Ok(Self {
            total_size,
            chunk_size,
        })
    }

    /// Total number of bytes to write
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Size of every write except possibly the last
    pub fn chunk_size(&self) -> NonZeroUsize {
        self.chunk_size
    }

    /// Number of write operations the request needs
    pub fn chunk_count(&self) -> u64 {
        self.total_size.div_ceil(self.chunk_size.get() as u64)
    }

    /// Sizes of the writes the request needs, in order
    pub fn chunk_sizes(&self) -> WriteProgress {
        WriteProgress::new(self)
    }
}

/// Parse and range-check the total file size and the chunk size
///
/// Both inputs are decimal unsigned integers; surrounding whitespace is
/// ignored. Nothing is allocated and no I/O happens here.
///
/// # Errors
/// - [`Error::InvalidSize`] if an input is not an unsigned integer
/// - [`Error::OutOfRange`] if the total size overflows a file offset, or the
///   chunk size is zero or larger than a single write can address
pub fn validate(total_size_input: &str, chunk_size_input: &str) -> Result<WriteRequest> {
    let total_size = parse_unsigned(SizeField::TotalSize, total_size_input, 0, MAX_FILE_SIZE)?;
    let chunk = parse_unsigned(
        SizeField::ChunkSize,
        chunk_size_input,
        MIN_CHUNK_SIZE,
        MAX_CHUNK_SIZE,
    )?;
    let chunk_size = narrow_chunk_size(chunk, chunk_size_input.trim())?;

    Ok(WriteRequest {
        total_size,
        chunk_size,
    })
}

fn parse_unsigned(field: SizeField, input: &str, min: u64, max: u64) -> Result<u64> {
    let trimmed = input.trim();
    trimmed.parse::<u64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => Error::OutOfRange {
            field,
            input: trimmed.to_string(),
            min,
            max,
        },
        _ => Error::InvalidSize {
            field,
            input: trimmed.to_string(),
        },
    })
}

fn narrow_chunk_size(chunk: u64, input: &str) -> Result<NonZeroUsize> {
    let out_of_range = || Error::OutOfRange {
        field: SizeField::ChunkSize,
        input: input.to_string(),
        min: MIN_CHUNK_SIZE,
        max: MAX_CHUNK_SIZE,
    };

    if !(MIN_CHUNK_SIZE..=MAX_CHUNK_SIZE).contains(&chunk) {
        return Err(out_of_range());
    }
    usize::try_from(chunk)
        .ok()
        .and_then(NonZeroUsize::new)
        .ok_or_else(out_of_range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_validate_accepts_plain_sizes() {
        let request = validate("100", "30").unwrap();
        assert_eq!(request.total_size(), 100);
        assert_eq!(request.chunk_size().get(), 30);
        assert_eq!(request.chunk_count(), 4);
    }

    #[test]
    fn test_validate_trims_whitespace() {
        let request = validate(" 64 ", "\t16\n").unwrap();
        assert_eq!(request, WriteRequest::new(64, 16).unwrap());
    }

    #[test]
    fn test_zero_total_size_is_valid() {
        let request = validate("0", "4096").unwrap();
        assert_eq!(request.total_size(), 0);
        assert_eq!(request.chunk_count(), 0);
    }

    #[test]
    fn test_total_size_overflow_is_out_of_range() {
        let err = validate("18446744073709551616", "10").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);

        // u64::MAX itself is addressable
        assert!(validate("18446744073709551615", "10").is_ok());
    }

    #[test]
    fn test_chunk_size_limits() {
        assert!(validate("10", "2147483647").is_ok());

        let err = validate("10", "2147483648").unwrap_err();
        match err {
            Error::OutOfRange {
                field, min, max, ..
            } => {
                assert_eq!(field, SizeField::ChunkSize);
                assert_eq!(min, 1);
                assert_eq!(max, MAX_CHUNK_SIZE);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert_eq!(
            validate("10", "99999999999999999999").unwrap_err().kind(),
            ErrorKind::OutOfRange
        );
        assert_eq!(validate("10", "0").unwrap_err().kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn test_non_numeric_input() {
        for (total, chunk) in [("abc", "10"), ("10", ""), ("-5", "10"), ("10", "1e3")] {
            assert_eq!(
                validate(total, chunk).unwrap_err().kind(),
                ErrorKind::InvalidSize,
                "{total:?} / {chunk:?}"
            );
        }
    }

    #[test]
    fn test_errors_report_trimmed_input() {
        match validate(" 12ab ", "10").unwrap_err() {
            Error::InvalidSize { input, .. } => assert_eq!(input, "12ab"),
            other => panic!("unexpected error: {other:?}"),
        }
        match validate("10", " 2147483648 ").unwrap_err() {
            Error::OutOfRange { input, .. } => assert_eq!(input, "2147483648"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validate_is_idempotent() {
        assert_eq!(validate("1000", "7").unwrap(), validate("1000", "7").unwrap());

        let first = validate("10", "4294967296").unwrap_err();
        let second = validate("10", "4294967296").unwrap_err();
        assert_eq!(first.kind(), second.kind());
        assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn test_new_applies_the_same_checks() {
        assert_eq!(WriteRequest::new(10, 0).unwrap_err().kind(), ErrorKind::OutOfRange);
        assert!(WriteRequest::new(10, MAX_CHUNK_SIZE as usize).is_ok());
    }
}
