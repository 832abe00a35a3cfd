//! # ozfs-cloud
//!
//! Object-store binding for ozfs. This crate implements the
//! [`ozfs_core::StorageClient`] seam on top of `object_store`, so the
//! synchronous chunked writer can stream into an Ozone bucket through the S3
//! gateway, or into an in-memory store for local runs.
//!
//! ## Architecture
//!
//! The main abstractions are:
//! - `ObjectStoreClient`: connects to a backend and opens files for writing
//! - `CloudStore`: one connection, i.e. a store bound to a bucket
//! - `CloudWriter`: implements `std::io::Write` for one object, buffering
//!   data into parts and switching to multipart upload for large objects
//!
//! These adapters use an internal Tokio runtime to bridge the async
//! `object_store` API with synchronous std::io traits.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

mod buffer;
mod client;
mod error;
mod runtime;
mod store;
mod writer;

pub use client::ObjectStoreClient;
pub use error::{CloudError, Result};
pub use store::CloudStore;
pub use writer::CloudWriter;

// Re-export commonly used types from object_store
pub use object_store::{path::Path as ObjectPath, ObjectStore};

use ozfs_core::config::UploadConfig;

/// Smallest part size S3-compatible gateways accept for all but the last part
pub const MIN_PART_SIZE: usize = ozfs_core::limits::MIN_PART_SIZE as usize;

/// Configuration for cloud storage operations
#[derive(Debug, Clone)]
pub struct CloudConfig {
    /// Size of the write buffer in bytes (default: 8MB)
    pub write_buffer_size: usize,
    /// Whether to use multipart upload for large files (default: true)
    pub use_multipart_upload: bool,
    /// Threshold for multipart upload in bytes (default: 64MB)
    pub multipart_threshold: u64,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self::from(&UploadConfig::default())
    }
}

impl From<&UploadConfig> for CloudConfig {
    fn from(upload: &UploadConfig) -> Self {
        Self {
            write_buffer_size: usize::try_from(upload.write_buffer_size).unwrap_or(usize::MAX),
            use_multipart_upload: upload.use_multipart_upload,
            multipart_threshold: upload.multipart_threshold,
        }
    }
}

impl CloudConfig {
    /// Apply the buffer size hint given when a file is opened
    ///
    /// Hints below [`MIN_PART_SIZE`] would produce parts a gateway rejects and
    /// are ignored, as is a zero hint.
    pub fn with_buffer_hint(mut self, buffer_size: usize) -> Self {
        if buffer_size >= MIN_PART_SIZE {
            self.write_buffer_size = buffer_size;
        }
        self
    }
}
