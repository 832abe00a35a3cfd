use thiserror::Error;

/// Errors raised inside the object-store binding
#[derive(Error, Debug)]
pub enum CloudError {
    /// The object store rejected an operation
    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    /// Local I/O failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Object key or connection parameter is not usable
    #[error("Invalid cloud path: {0}")]
    InvalidPath(String),

    /// The Tokio runtime could not be created
    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Result type for the object-store binding
pub type Result<T> = std::result::Result<T, CloudError>;

impl From<object_store::path::Error> for CloudError {
    fn from(err: object_store::path::Error) -> Self {
        CloudError::InvalidPath(err.to_string())
    }
}

impl From<CloudError> for std::io::Error {
    fn from(err: CloudError) -> Self {
        match err {
            CloudError::Io(io_err) => io_err,
            other => std::io::Error::new(std::io::ErrorKind::Other, other),
        }
    }
}
