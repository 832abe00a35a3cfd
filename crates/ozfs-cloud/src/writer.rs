//! CloudWriter - provides synchronous Write trait for objects in a bucket

use crate::{buffer::WriteBuffer, error::Result, runtime::get_runtime, CloudConfig};
use bytes::Bytes;
use object_store::{path::Path as ObjectPath, MultipartUpload, ObjectStore, PutPayload};
use std::io::Write;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::{debug, trace, warn};

/// A writer that provides synchronous write access to an object
///
/// Data is collected in parts of `write_buffer_size` bytes. Small objects are
/// stored with a single PUT when the writer is finalized; once the staged
/// data crosses `multipart_threshold` a multipart upload is started and every
/// further part is uploaded as soon as it fills up.
///
/// Nothing becomes visible in the store until [`CloudWriter::finalize`]
/// succeeds. A writer dropped without being finalized discards its data and
/// aborts any multipart upload in progress.
///
/// All remote calls block on a shared runtime, so a `CloudWriter` must not be
/// used from within an async context.
#[derive(Debug)]
pub struct CloudWriter {
    /// The object store
    store: Arc<dyn ObjectStore>,
    /// Path to the object
    path: ObjectPath,
    /// Part currently being filled
    buffer: WriteBuffer,
    /// Full parts held back while the object is still below the multipart threshold
    staged: Vec<Bytes>,
    /// Bytes in `staged`
    staged_len: u64,
    /// Configuration
    config: CloudConfig,
    /// Total bytes accepted
    bytes_written: u64,
    /// Parts uploaded so far
    parts_uploaded: usize,
    /// Multipart upload handle (if using multipart)
    multipart: Option<Box<dyn MultipartUpload>>,
    runtime: Arc<Runtime>,
    finished: bool,
}

impl CloudWriter {
    /// Create a new CloudWriter
    ///
    /// # Arguments
    /// * `store` - The object store to write to
    /// * `path` - Path to the object
    /// * `config` - Configuration for the writer
    pub fn new(store: Arc<dyn ObjectStore>, path: ObjectPath, config: CloudConfig) -> Result<Self> {
        Ok(Self {
            store,
            path,
            buffer: WriteBuffer::new(config.write_buffer_size),
            staged: Vec::new(),
            staged_len: 0,
            config,
            bytes_written: 0,
            parts_uploaded: 0,
            multipart: None,
            runtime: get_runtime()?,
            finished: false,
        })
    }

    /// Get the total number of bytes written
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Path of the object being written
    pub fn path(&self) -> &ObjectPath {
        &self.path
    }

    /// True once a multipart upload has been started
    pub fn is_multipart(&self) -> bool {
        self.multipart.is_some()
    }

    /// Number of multipart parts uploaded so far
    pub fn parts_uploaded(&self) -> usize {
        self.parts_uploaded
    }

    /// Move the full buffer out, either staging it or uploading it as a part
    fn flush_buffer(&mut self) -> Result<()> {
        let data = self.buffer.take();
        if data.is_empty() {
            return Ok(());
        }

        if self.multipart.is_some() {
            return self.put_part(data);
        }

        self.staged_len += data.len() as u64;
        self.staged.push(data);

        if self.config.use_multipart_upload && self.staged_len >= self.config.multipart_threshold {
            debug!("Starting multipart upload for {}", self.path);
            let upload = self.runtime.block_on(self.store.put_multipart(&self.path))?;
            self.multipart = Some(upload);

            for part in std::mem::take(&mut self.staged) {
                self.put_part(part)?;
            }
            self.staged_len = 0;
        }

        Ok(())
    }

    fn put_part(&mut self, data: Bytes) -> Result<()> {
        if let Some(multipart) = self.multipart.as_mut() {
            debug!("Uploading multipart chunk of {} bytes", data.len());
            self.runtime.block_on(multipart.put_part(data.into()))?;
            self.parts_uploaded += 1;
        }
        Ok(())
    }

    fn finalize_internal(&mut self) -> Result<()> {
        let tail = self.buffer.take();

        if let Some(mut multipart) = self.multipart.take() {
            debug!("Completing multipart upload for {}", self.path);

            let completed = self.runtime.block_on(async {
                if !tail.is_empty() {
                    multipart.put_part(tail.into()).await?;
                }
                multipart.complete().await
            });

            if let Err(e) = completed {
                if let Err(abort_err) = self.runtime.block_on(multipart.abort()) {
                    warn!("Failed to abort multipart upload for {}: {}", self.path, abort_err);
                }
                return Err(e.into());
            }
        } else {
            let payload: PutPayload = std::mem::take(&mut self.staged)
                .into_iter()
                .chain(std::iter::once(tail))
                .filter(|part| !part.is_empty())
                .collect();

            debug!("Uploading {} bytes to {}", payload.content_length(), self.path);
            self.runtime.block_on(self.store.put(&self.path, payload))?;
        }

        Ok(())
    }

    /// Finalize the write operation
    ///
    /// Uploads whatever is still buffered and commits the object. An empty
    /// writer creates an empty object.
    pub fn finalize(mut self) -> Result<()> {
        let result = self.finalize_internal();
        self.finished = true;
        result
    }

    /// Discard the object without committing it
    pub fn abort(mut self) -> Result<()> {
        self.finished = true;
        self.abort_internal()
    }

    fn abort_internal(&mut self) -> Result<()> {
        self.staged.clear();
        self.buffer.take();
        if let Some(mut multipart) = self.multipart.take() {
            debug!("Aborting multipart upload for {}", self.path);
            self.runtime.block_on(multipart.abort())?;
        }
        Ok(())
    }
}

impl Write for CloudWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        let mut written = 0;
        let mut remaining = buf;

        while !remaining.is_empty() {
            let n = self.buffer.write(remaining);
            written += n;
            self.bytes_written += n as u64;
            remaining = &remaining[n..];

            // If buffer is full, stage or upload it
            if self.buffer.remaining() == 0 {
                trace!("Buffer full, flushing {} bytes", self.buffer.len());
                self.flush_buffer()?;
            }
        }

        Ok(written)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        // Parts are only uploaded when full or on finalize
        Ok(())
    }
}

impl Drop for CloudWriter {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if self.bytes_written > 0 || self.multipart.is_some() {
            warn!(
                "CloudWriter for {} dropped without finalize, discarding {} bytes",
                self.path, self.bytes_written
            );
        }
        if let Err(e) = self.abort_internal() {
            warn!("Failed to abort upload of {} on drop: {}", self.path, e);
        }
    }
}
