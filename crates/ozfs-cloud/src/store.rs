use crate::{runtime::get_runtime, CloudError, Result};
use bytes::Bytes;
use object_store::path::Path;
use object_store::ObjectStore;
use ozfs_core::ConnectOptions;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Volume whose buckets the Ozone S3 gateway serves directly
pub(crate) const S3_VOLUME: &str = "s3v";

/// One connection: an object store bound to a bucket, plus the Tokio runtime
/// used to drive it
#[derive(Debug, Clone)]
pub struct CloudStore {
    store: Arc<dyn ObjectStore>,
    runtime: Arc<Runtime>,
    options: ConnectOptions,
    /// Key prefix applied to every file path
    prefix: Option<String>,
}

impl CloudStore {
    /// Create a CloudStore from an existing store (useful for testing)
    pub fn from_store(store: Arc<dyn ObjectStore>, options: ConnectOptions) -> Result<Self> {
        Self::with_prefix(store, options, None)
    }

    pub(crate) fn with_prefix(
        store: Arc<dyn ObjectStore>,
        options: ConnectOptions,
        prefix: Option<String>,
    ) -> Result<Self> {
        Ok(CloudStore {
            store,
            runtime: get_runtime()?,
            options,
            prefix,
        })
    }

    /// Get the object store instance
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// Options this connection was made with
    pub fn options(&self) -> &ConnectOptions {
        &self.options
    }

    /// Map a file name to the object key it is stored under
    ///
    /// Leading slashes are ignored; empty names and names with empty or
    /// relative segments are rejected.
    pub fn object_path(&self, path: &str) -> Result<Path> {
        let key = path.trim_start_matches('/');
        if key.trim().is_empty() {
            return Err(CloudError::InvalidPath(format!("Empty object key: {:?}", path)));
        }

        let full = match &self.prefix {
            Some(prefix) => format!("{}/{}", prefix, key),
            None => key.to_string(),
        };
        Ok(Path::parse(full)?)
    }

    /// Size of a stored file
    pub fn size(&self, path: &str) -> Result<u64> {
        let location = self.object_path(path)?;
        let meta = self.runtime.block_on(self.store.head(&location))?;
        Ok(meta.size as u64)
    }

    /// Contents of a stored file
    pub fn read(&self, path: &str) -> Result<Bytes> {
        let location = self.object_path(path)?;
        let data = self
            .runtime
            .block_on(async { self.store.get(&location).await?.bytes().await })?;
        Ok(data)
    }
}

/// Check connection parameters before building a store
pub(crate) fn validate_options(options: &ConnectOptions) -> Result<()> {
    if options.host.trim().is_empty() {
        return Err(CloudError::InvalidPath("Missing host name".to_string()));
    }
    if options.port == 0 {
        return Err(CloudError::InvalidPath("Port must be non-zero".to_string()));
    }
    if options.bucket.trim().is_empty() {
        return Err(CloudError::InvalidPath("Missing bucket name".to_string()));
    }
    if options.volume.trim().is_empty() {
        return Err(CloudError::InvalidPath("Missing volume name".to_string()));
    }
    Ok(())
}

/// Build an S3 client for the gateway at `host:port`
///
/// Credentials and region come from the usual `AWS_*` environment variables.
pub(crate) fn create_s3_store(options: &ConnectOptions) -> Result<Arc<dyn ObjectStore>> {
    let store = object_store::aws::AmazonS3Builder::from_env()
        .with_endpoint(format!("http://{}", options.endpoint()))
        .with_bucket_name(&options.bucket)
        .with_allow_http(true)
        .with_virtual_hosted_style_request(false)
        .build()
        .map_err(CloudError::ObjectStore)?;
    Ok(Arc::new(store))
}
