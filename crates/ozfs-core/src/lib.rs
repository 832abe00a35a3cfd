//! ozfs - write a file of a given size to an Ozone bucket in fixed-size chunks
//!
//! This library provides the core of the writer: validating the requested
//! sizes, building the reusable pattern buffer, and driving the fail-fast
//! chunked write loop against any `std::io::Write` handle.

pub mod client;
pub mod config;
pub mod error;
pub mod limits;
pub mod pattern;
pub mod request;
pub mod session;
pub mod writer;

pub use error::{Error, ErrorKind, Result};

// Re-export commonly used types
pub use client::{ConnectOptions, OpenOptions, StorageClient};
pub use pattern::ChunkBuffer;
pub use request::{validate, WriteRequest};
pub use writer::{write_all, write_all_with_progress, WriteProgress, WriteSummary};
