//! Size limits enforced before any I/O
//!
//! The limits follow the integer widths of the native client API: file
//! offsets are unsigned 64-bit values and a single write call addresses at
//! most a signed 32-bit length.

/// Largest total file size that can be requested.
pub const MAX_FILE_SIZE: u64 = u64::MAX;

/// Largest chunk a single write operation may address (2^31 - 1 bytes).
pub const MAX_CHUNK_SIZE: u64 = i32::MAX as u64;

/// Smallest usable chunk size.
pub const MIN_CHUNK_SIZE: u64 = 1;

/// Smallest multipart part an S3 gateway accepts, the last part excepted.
pub const MIN_PART_SIZE: u64 = 5 * 1024 * 1024;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_limit_fits_usize() {
        assert!(usize::try_from(MAX_CHUNK_SIZE).is_ok());
        assert_eq!(MAX_CHUNK_SIZE, 2_147_483_647);
    }
}
