//! Integration tests for configuration loading

use ozfs_core::config::{Backend, Config};
use ozfs_core::ErrorKind;
use ozfs_testing::fixtures::write_memory_config;
use ozfs_testing::TestDir;

#[test]
fn test_load_explicit_file() {
    let test_dir = TestDir::new().unwrap();
    let path = write_memory_config(&test_dir).unwrap();

    let config = Config::load(Some(path.as_path())).unwrap();
    assert_eq!(config.client.backend, Backend::Memory);
    assert_eq!(config.upload.write_buffer_size, 64 * 1024);
    assert_eq!(config.upload.multipart_threshold, 256 * 1024);
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let test_dir = TestDir::new().unwrap();
    let err = Config::load(Some(test_dir.path().join("nope.toml").as_path())).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
fn test_malformed_file_is_an_error() {
    let test_dir = TestDir::new().unwrap();
    let path = test_dir
        .create_file("bad.toml", b"[upload]\nwrite_buffer_size = \"lots\"\n")
        .unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    assert!(err.to_string().contains("Failed to parse config"));
}

#[test]
fn test_partial_file_keeps_defaults() {
    let test_dir = TestDir::new().unwrap();
    let path = test_dir
        .create_file("partial.toml", b"[client]\nreplication = 1\n")
        .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.client.replication, 1);
    assert_eq!(config.client.backend, Backend::S3);
    assert_eq!(config.upload, Config::default().upload);
}
