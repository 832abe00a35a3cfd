//! Error types for ozfs-core

use std::fmt;
use std::io;
use thiserror::Error;

/// Boxed error handed through unchanged from a storage client
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Process status for a usage error
pub const EXIT_USAGE: i32 = -1;
/// Process status when the remote file cannot be opened or the buffer allocated
pub const EXIT_OPEN: i32 = -2;
/// Process status for size validation and write failures
pub const EXIT_WRITE: i32 = -3;
/// Process status when the cluster cannot be reached
pub const EXIT_CONNECT: i32 = -4;

/// Which user-supplied size a validation error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeField {
    /// Total size of the file to write
    TotalSize,
    /// Size of one write operation
    ChunkSize,
}

impl fmt::Display for SizeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeField::TotalSize => write!(f, "file size"),
            SizeField::ChunkSize => write!(f, "chunk size"),
        }
    }
}

/// Core error types for the ozfs writer
#[derive(Error, Debug)]
pub enum Error {
    /// Input is not an unsigned integer
    #[error("invalid {field} {input:?} - not an unsigned integer")]
    InvalidSize { field: SizeField, input: String },

    /// Input is outside the range the client API can address
    #[error("invalid {field} {input} - must be between {min} and {max}")]
    OutOfRange {
        field: SizeField,
        input: String,
        min: u64,
        max: u64,
    },

    /// The pattern buffer could not be allocated
    #[error("could not allocate buffer of size {size}")]
    AllocationFailure { size: usize },

    /// The buffer handed to the writer cannot hold one chunk
    #[error("buffer of {buffer} bytes is smaller than the {chunk} byte chunk size")]
    BufferTooSmall { buffer: usize, chunk: usize },

    /// A write accepted a different number of bytes than requested
    #[error("short write: expected {expected} bytes, wrote {actual}")]
    ShortWrite { expected: usize, actual: usize },

    /// The write handle reported an error
    #[error("write failed: {0}")]
    Write(#[source] io::Error),

    /// The storage client could not connect
    #[error("failed to connect to {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: BoxError,
    },

    /// The storage client could not open the file for writing
    #[error("failed to open {path} for writing: {source}")]
    Open {
        path: String,
        #[source]
        source: BoxError,
    },

    /// The storage client could not close the file
    #[error("failed to close {path}: {source}")]
    Close {
        path: String,
        #[source]
        source: BoxError,
    },

    /// Configuration-related error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Classification of an [`Error`], without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidSize,
    OutOfRange,
    AllocationFailure,
    BufferTooSmall,
    ShortWrite,
    Write,
    Connect,
    Open,
    Close,
    Config,
}

impl ErrorKind {
    /// Process status a command-line wrapper exits with for this kind
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::Config => EXIT_USAGE,
            ErrorKind::Connect => EXIT_CONNECT,
            ErrorKind::Open | ErrorKind::AllocationFailure => EXIT_OPEN,
            ErrorKind::InvalidSize
            | ErrorKind::OutOfRange
            | ErrorKind::BufferTooSmall
            | ErrorKind::ShortWrite
            | ErrorKind::Write
            | ErrorKind::Close => EXIT_WRITE,
        }
    }
}

impl Error {
    /// Returns the kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidSize { .. } => ErrorKind::InvalidSize,
            Error::OutOfRange { .. } => ErrorKind::OutOfRange,
            Error::AllocationFailure { .. } => ErrorKind::AllocationFailure,
            Error::BufferTooSmall { .. } => ErrorKind::BufferTooSmall,
            Error::ShortWrite { .. } => ErrorKind::ShortWrite,
            Error::Write(_) => ErrorKind::Write,
            Error::Connect { .. } => ErrorKind::Connect,
            Error::Open { .. } => ErrorKind::Open,
            Error::Close { .. } => ErrorKind::Close,
            Error::Config(_) => ErrorKind::Config,
        }
    }

    /// Returns true if the error was raised before any I/O took place
    pub fn is_validation(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidSize | ErrorKind::OutOfRange | ErrorKind::Config
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
