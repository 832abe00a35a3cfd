//! `StorageClient` implementation over `object_store`

use crate::store::{create_s3_store, validate_options, S3_VOLUME};
use crate::{CloudConfig, CloudError, CloudStore, CloudWriter};
use object_store::memory::InMemory;
use object_store::ObjectStore;
use ozfs_core::config::Backend;
use ozfs_core::{ConnectOptions, Error, OpenOptions, Result, StorageClient};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Storage client writing through an S3-compatible gateway or into memory
///
/// All memory-backed connections made by one client (and its clones) share a
/// single store, with files keyed under `<volume>/<bucket>/`.
#[derive(Debug, Clone)]
pub struct ObjectStoreClient {
    backend: Backend,
    config: CloudConfig,
    memory: Arc<InMemory>,
}

impl ObjectStoreClient {
    /// Create a client for `backend`
    pub fn new(backend: Backend, config: CloudConfig) -> Self {
        Self {
            backend,
            config,
            memory: Arc::new(InMemory::new()),
        }
    }

    /// An in-memory client with default upload settings
    pub fn memory() -> Self {
        Self::new(Backend::Memory, CloudConfig::default())
    }

    fn open_store(&self, options: &ConnectOptions) -> crate::Result<CloudStore> {
        validate_options(options)?;

        match self.backend {
            Backend::S3 => {
                if options.volume != S3_VOLUME {
                    info!(
                        "Volume {} is not the gateway volume {}; bucket {} must be linked into it",
                        options.volume, S3_VOLUME, options.bucket
                    );
                }
                CloudStore::from_store(create_s3_store(options)?, options.clone())
            }
            Backend::Memory => {
                let store: Arc<dyn ObjectStore> = self.memory.clone();
                let prefix = format!("{}/{}", options.volume, options.bucket);
                CloudStore::with_prefix(store, options.clone(), Some(prefix))
            }
        }
    }
}

impl StorageClient for ObjectStoreClient {
    type Connection = CloudStore;
    type File = CloudWriter;

    fn connect(&self, options: &ConnectOptions) -> Result<CloudStore> {
        debug!("Connecting to {} via {}", options, self.backend);
        self.open_store(options).map_err(|e| Error::Connect {
            endpoint: options.endpoint(),
            source: Box::new(e),
        })
    }

    fn open_for_write(
        &self,
        connection: &mut CloudStore,
        path: &str,
        options: &OpenOptions,
    ) -> Result<CloudWriter> {
        if options.replication != 0 || options.block_size != 0 {
            debug!(
                "Replication {} and block size {} are decided by the bucket, ignoring",
                options.replication, options.block_size
            );
        }

        let open_error = |e: CloudError| Error::Open {
            path: path.to_string(),
            source: Box::new(e),
        };
        let location = connection.object_path(path).map_err(open_error)?;
        let config = self.config.clone().with_buffer_hint(options.buffer_size);

        CloudWriter::new(connection.store().clone(), location, config).map_err(open_error)
    }

    fn close(&self, _connection: &mut CloudStore, file: CloudWriter) -> Result<()> {
        let path = file.path().to_string();
        debug!("Closing {} after {} bytes", path, file.bytes_written());
        file.finalize().map_err(|e| Error::Close {
            path,
            source: Box::new(e),
        })
    }

    fn abort(&self, _connection: &mut CloudStore, file: CloudWriter) {
        let path = file.path().to_string();
        if let Err(e) = file.abort() {
            warn!("Failed to abort upload of {}: {}", path, e);
        }
    }

    fn disconnect(&self, connection: CloudStore) {
        debug!("Disconnecting from {}", connection.options().endpoint());
    }
}
