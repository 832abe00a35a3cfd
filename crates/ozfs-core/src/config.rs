//! Configuration module

use crate::client::OpenOptions;
use crate::limits::MIN_PART_SIZE;
use crate::{Error, Result};
use dirs::config_dir;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Client connection settings
    #[serde(default)]
    pub client: ClientConfig,
    /// Upload buffering settings
    #[serde(default)]
    pub upload: UploadConfig,
}

/// Storage backend a client talks to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// S3-compatible gateway at `host:port`
    #[default]
    S3,
    /// Process-local in-memory store
    Memory,
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "s3" => Ok(Backend::S3),
            "memory" | "mem" => Ok(Backend::Memory),
            other => Err(Error::Config(format!(
                "Unknown backend: {}. Use s3 or memory",
                other
            ))),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::S3 => write!(f, "s3"),
            Backend::Memory => write!(f, "memory"),
        }
    }
}

/// Client connection configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend to use
    pub backend: Backend,
    /// Write buffer size hint passed on open (0 = client default)
    #[serde(deserialize_with = "deserialize_size")]
    pub buffer_size: u64,
    /// Replication factor hint (0 = cluster default)
    pub replication: u16,
    /// Block size hint (0 = cluster default)
    #[serde(deserialize_with = "deserialize_size")]
    pub block_size: u64,
}

impl ClientConfig {
    /// Open hints derived from this configuration
    pub fn open_options(&self) -> OpenOptions {
        OpenOptions {
            buffer_size: usize::try_from(self.buffer_size).unwrap_or(usize::MAX),
            replication: self.replication,
            block_size: self.block_size,
        }
    }
}

/// Upload buffering configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Bytes accumulated before a part is uploaded
    #[serde(deserialize_with = "deserialize_size")]
    pub write_buffer_size: u64,
    /// Switch to multipart upload for large files
    pub use_multipart_upload: bool,
    /// Bytes after which a multipart upload is started
    #[serde(deserialize_with = "deserialize_size")]
    pub multipart_threshold: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            write_buffer_size: 8 * 1024 * 1024,    // 8MiB
            use_multipart_upload: true,
            multipart_threshold: 64 * 1024 * 1024, // 64MiB
        }
    }
}

impl UploadConfig {
    /// Check the settings against what `backend` accepts
    ///
    /// S3 gateways reject multipart parts smaller than [`MIN_PART_SIZE`], so
    /// smaller write buffers are only allowed with the memory backend or with
    /// multipart upload turned off.
    pub fn validate(&self, backend: Backend) -> Result<()> {
        self.check_sizes()?;

        if backend == Backend::S3
            && self.use_multipart_upload
            && self.write_buffer_size < MIN_PART_SIZE
        {
            return Err(Error::Config(format!(
                "write_buffer_size of {} bytes is below the {} byte minimum part size of the s3 backend",
                self.write_buffer_size, MIN_PART_SIZE
            )));
        }
        Ok(())
    }

    fn check_sizes(&self) -> Result<()> {
        if self.write_buffer_size == 0 {
            return Err(Error::Config(
                "write_buffer_size must be greater than 0".to_string(),
            ));
        }
        if self.use_multipart_upload && self.multipart_threshold < self.write_buffer_size {
            return Err(Error::Config(format!(
                "multipart_threshold ({}) must not be smaller than write_buffer_size ({})",
                self.multipart_threshold, self.write_buffer_size
            )));
        }
        Ok(())
    }
}

/// A size given either as a number of bytes or as a string like "8MiB"
#[derive(Deserialize)]
#[serde(untagged)]
enum SizeValue {
    Bytes(u64),
    Text(String),
}

fn deserialize_size<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match SizeValue::deserialize(deserializer)? {
        SizeValue::Bytes(bytes) => Ok(bytes),
        SizeValue::Text(text) => parse_size(&text)
            .map_err(|e| D::Error::custom(format!("Failed to parse size: {}", e))),
    }
}

/// Parse size string like "100MiB" to bytes
pub fn parse_size(size_str: &str) -> Result<u64> {
    let size_str = size_str.trim();

    if let Ok(bytes) = size_str.parse::<u64>() {
        return Ok(bytes);
    }

    let split_pos = size_str
        .chars()
        .position(|c| !c.is_ascii_digit() && c != '.')
        .unwrap_or(size_str.len());

    if split_pos == 0 {
        return Err(Error::Config(format!("Invalid size format: {}", size_str)));
    }

    let (number_part, unit_part) = size_str.split_at(split_pos);
    let number: f64 = number_part
        .parse()
        .map_err(|_| Error::Config(format!("Invalid number in size: {}", number_part)))?;

    let multiplier: u64 = match unit_part.trim().to_lowercase().as_str() {
        "" | "b" => 1,
        "k" | "kb" => 1_000,
        "m" | "mb" => 1_000_000,
        "g" | "gb" => 1_000_000_000,
        "ki" | "kib" => 1_024,
        "mi" | "mib" => 1_048_576,
        "gi" | "gib" => 1_073_741_824,
        _ => {
            return Err(Error::Config(format!(
                "Unknown size unit: {}",
                unit_part
            )))
        }
    };

    Ok((number * multiplier as f64) as u64)
}

impl Config {
    /// Default configuration file location, if the platform has one
    pub fn default_path() -> Option<PathBuf> {
        config_dir().map(|dir| dir.join("ozfs").join("config.toml"))
    }

    /// Load configuration
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// read when present and built-in defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML text
    ///
    /// Upload sizes that no backend can use are rejected here; the
    /// backend-specific part limit is checked by [`Config::validate`] once the
    /// backend is final.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.upload.check_sizes()?;
        Ok(config)
    }

    /// Check the upload settings against the selected backend
    pub fn validate(&self) -> Result<()> {
        self.upload.validate(self.client.backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.client.backend, Backend::S3);
        assert_eq!(config.upload.write_buffer_size, 8 * 1_048_576);
        assert!(config.upload.use_multipart_upload);
        assert_eq!(config.client.open_options(), OpenOptions::default());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized = Config::from_toml(&toml_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("100").unwrap(), 100);
        assert_eq!(parse_size("100B").unwrap(), 100);
        assert_eq!(parse_size("1KB").unwrap(), 1_000);
        assert_eq!(parse_size("1KiB").unwrap(), 1_024);
        assert_eq!(parse_size("8MiB").unwrap(), 8 * 1_048_576);
        assert_eq!(parse_size("1.5GB").unwrap(), 1_500_000_000);
        assert!(parse_size("invalid").is_err());
        assert!(parse_size("12parsecs").is_err());
    }

    #[test]
    fn test_sizes_accept_strings_and_numbers() {
        let config = Config::from_toml(
            r#"
            [client]
            backend = "memory"
            buffer_size = "16MiB"
            replication = 3

            [upload]
            write_buffer_size = 1048576
            multipart_threshold = "2MiB"
            "#,
        )
        .unwrap();

        assert_eq!(config.client.backend, Backend::Memory);
        assert_eq!(config.client.buffer_size, 16 * 1_048_576);
        assert_eq!(config.client.replication, 3);
        assert_eq!(config.upload.write_buffer_size, 1_048_576);
        assert_eq!(config.upload.multipart_threshold, 2 * 1_048_576);
        assert!(config.upload.use_multipart_upload);
    }

    #[test]
    fn test_zero_upload_sizes_are_rejected() {
        let err = Config::from_toml("[upload]\nwrite_buffer_size = 0\nmultipart_threshold = 0")
            .unwrap_err();
        assert!(err.to_string().contains("write_buffer_size must be greater than 0"));

        let err = Config::from_toml(
            "[upload]\nwrite_buffer_size = \"8MiB\"\nmultipart_threshold = 0",
        )
        .unwrap_err();
        assert!(err.to_string().contains("multipart_threshold"));
    }

    #[test]
    fn test_threshold_ignored_without_multipart() {
        let config = Config::from_toml(
            "[upload]\nuse_multipart_upload = false\nmultipart_threshold = 0",
        )
        .unwrap();
        assert_eq!(config.upload.multipart_threshold, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_small_parts_only_for_memory_backend() {
        let mut config = Config::from_toml(
            "[upload]\nwrite_buffer_size = \"64KiB\"\nmultipart_threshold = \"256KiB\"",
        )
        .unwrap();

        let err = config.validate().unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Config);
        assert!(err.to_string().contains("minimum part size"));

        config.client.backend = Backend::Memory;
        assert!(config.validate().is_ok());

        config.client.backend = Backend::S3;
        config.upload.use_multipart_upload = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_upload_is_valid_for_s3() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("S3".parse::<Backend>().unwrap(), Backend::S3);
        assert_eq!("memory".parse::<Backend>().unwrap(), Backend::Memory);
        assert!("hdfs".parse::<Backend>().is_err());
    }
}
