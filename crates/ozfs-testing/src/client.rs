//! An in-memory storage client

use crate::handle::ScriptedHandle;
use ozfs_core::{ConnectOptions, Error, OpenOptions, Result, StorageClient};
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Lifecycle step a [`MemoryClient`] can be told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientFailure {
    Connect,
    Open,
    Close,
}

/// Storage client keeping committed files in memory and recording every
/// lifecycle call
#[derive(Debug, Default, Clone)]
pub struct MemoryClient {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    events: Arc<Mutex<Vec<String>>>,
    failure: Option<ClientFailure>,
    handle: ScriptedHandle,
}

/// Connection handed out by [`MemoryClient`]
#[derive(Debug)]
pub struct MemoryConnection {
    options: ConnectOptions,
}

impl MemoryConnection {
    /// Options the connection was made with
    pub fn options(&self) -> &ConnectOptions {
        &self.options
    }
}

/// File handed out by [`MemoryClient`]
#[derive(Debug)]
pub struct MemoryFile {
    path: String,
    handle: ScriptedHandle,
}

impl Write for MemoryFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.handle.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.handle.flush()
    }
}

impl MemoryClient {
    /// A client on which every call succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Make one lifecycle step fail
    pub fn failing(mut self, failure: ClientFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    /// Template for the write handle of every opened file
    pub fn with_handle(mut self, handle: ScriptedHandle) -> Self {
        self.handle = handle;
        self
    }

    /// Contents of a committed file
    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(path).cloned()
    }

    /// Lifecycle calls so far, e.g. `["connect", "open /a", "close /a", "disconnect"]`
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }

    fn fails(&self, step: ClientFailure) -> bool {
        self.failure == Some(step)
    }
}

impl StorageClient for MemoryClient {
    type Connection = MemoryConnection;
    type File = MemoryFile;

    fn connect(&self, options: &ConnectOptions) -> Result<MemoryConnection> {
        self.record("connect".to_string());
        if self.fails(ClientFailure::Connect) {
            return Err(Error::Connect {
                endpoint: options.endpoint(),
                source: "connection refused".into(),
            });
        }
        Ok(MemoryConnection {
            options: options.clone(),
        })
    }

    fn open_for_write(
        &self,
        _connection: &mut MemoryConnection,
        path: &str,
        _options: &OpenOptions,
    ) -> Result<MemoryFile> {
        self.record(format!("open {}", path));
        if self.fails(ClientFailure::Open) {
            return Err(Error::Open {
                path: path.to_string(),
                source: "permission denied".into(),
            });
        }
        Ok(MemoryFile {
            path: path.to_string(),
            handle: self.handle.clone(),
        })
    }

    fn close(&self, _connection: &mut MemoryConnection, file: MemoryFile) -> Result<()> {
        self.record(format!("close {}", file.path));
        if self.fails(ClientFailure::Close) {
            return Err(Error::Close {
                path: file.path,
                source: "commit rejected".into(),
            });
        }
        self.files
            .lock()
            .unwrap()
            .insert(file.path, file.handle.into_data());
        Ok(())
    }

    fn abort(&self, _connection: &mut MemoryConnection, file: MemoryFile) {
        self.record(format!("abort {}", file.path));
    }

    fn disconnect(&self, _connection: MemoryConnection) {
        self.record("disconnect".to_string());
    }
}
