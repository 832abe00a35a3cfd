//! The reusable chunk buffer and its repeating `a..z` fill pattern

use crate::{Error, Result, WriteRequest};
use std::fmt;
use std::num::NonZeroUsize;
use std::ops::Deref;

/// Length of the repeating alphabet pattern
pub const PATTERN_PERIOD: usize = 26;

/// Byte stored at `index` of a pattern buffer
#[inline]
pub fn pattern_byte(index: usize) -> u8 {
    b'a' + (index % PATTERN_PERIOD) as u8
}

/// A fixed-length buffer filled once with the alphabet pattern and reused
/// for every write
#[derive(Clone, PartialEq, Eq)]
pub struct ChunkBuffer {
    data: Box<[u8]>,
}

impl ChunkBuffer {
    /// Allocate a buffer of exactly `chunk_size` bytes and fill it with the
    /// pattern
    ///
    /// # Errors
    /// Returns [`Error::AllocationFailure`] if the memory cannot be reserved.
    pub fn build(chunk_size: NonZeroUsize) -> Result<Self> {
        let size = chunk_size.get();
        let mut data = Vec::new();
        data.try_reserve_exact(size)
            .map_err(|_| Error::AllocationFailure { size })?;
        data.extend((0..size).map(pattern_byte));

        Ok(Self {
            data: data.into_boxed_slice(),
        })
    }

    /// Build a buffer sized for one chunk of `request`
    pub fn for_request(request: &WriteRequest) -> Result<Self> {
        Self::build(request.chunk_size())
    }

    /// The buffer contents
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Buffer length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false; a chunk buffer holds at least one byte
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Deref for ChunkBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl AsRef<[u8]> for ChunkBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Debug for ChunkBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkBuffer")
            .field("len", &self.data.len())
            .finish()
    }
}
