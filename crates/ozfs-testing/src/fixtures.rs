//! Common test fixtures for ozfs testing

use crate::TestDir;
use anyhow::Result;
use ozfs_core::ConnectOptions;
use std::path::PathBuf;

/// Connection options pointing at a local gateway
pub fn local_target() -> ConnectOptions {
    ConnectOptions {
        host: "localhost".to_string(),
        port: 9878,
        bucket: "bucket1".to_string(),
        volume: "s3v".to_string(),
    }
}

/// Configuration selecting the in-memory backend with small upload parts
pub const MEMORY_CONFIG: &str = r#"
[client]
backend = "memory"

[upload]
write_buffer_size = "64KiB"
multipart_threshold = "256KiB"
"#;

/// Writes [`MEMORY_CONFIG`] into `test_dir` and returns its path
pub fn write_memory_config(test_dir: &TestDir) -> Result<PathBuf> {
    test_dir.create_file("config.toml", MEMORY_CONFIG.as_bytes())
}
