//! The storage client seam
//!
//! The chunked writer only needs `std::io::Write`. Everything around it
//! (reaching the cluster, opening the file, committing it) is provided by a
//! [`StorageClient`] implementation.

use crate::Result;
use std::fmt;
use std::io::Write;

/// Where to connect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Host name of the storage gateway
    pub host: String,
    /// Port of the storage gateway
    pub port: u16,
    /// Bucket that will hold the file
    pub bucket: String,
    /// Volume containing the bucket
    pub volume: String,
}

impl ConnectOptions {
    /// `host:port`, as used in log and error messages
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for ConnectOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.endpoint(), self.volume, self.bucket)
    }
}

/// Hints passed when opening a file for writing; zero means "client default"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenOptions {
    /// Size of the client-side write buffer in bytes
    pub buffer_size: usize,
    /// Replication factor
    pub replication: u16,
    /// Block size in bytes
    pub block_size: u64,
}

/// A client able to open write-only streams on a remote store
pub trait StorageClient {
    /// An established connection
    type Connection;
    /// An open write-only file
    type File: Write;

    /// Connect to the cluster
    ///
    /// Failures are reported as [`crate::Error::Connect`].
    fn connect(&self, options: &ConnectOptions) -> Result<Self::Connection>;

    /// Open `path` for writing, replacing any existing file
    ///
    /// Failures are reported as [`crate::Error::Open`].
    fn open_for_write(
        &self,
        connection: &mut Self::Connection,
        path: &str,
        options: &OpenOptions,
    ) -> Result<Self::File>;

    /// Commit and close a file
    ///
    /// Failures are reported as [`crate::Error::Close`].
    fn close(&self, connection: &mut Self::Connection, file: Self::File) -> Result<()>;

    /// Discard a file that will not be completed
    fn abort(&self, _connection: &mut Self::Connection, file: Self::File) {
        drop(file);
    }

    /// Release a connection
    fn disconnect(&self, connection: Self::Connection);
}
