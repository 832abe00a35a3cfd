//! Connect, open, write and close in one call

use crate::client::{ConnectOptions, OpenOptions, StorageClient};
use crate::{writer, ChunkBuffer, Result, WriteRequest, WriteSummary};
use tracing::debug;

/// Write a file of `request.total_size()` bytes at `path` through `client`
///
/// Runs connect, open, buffer allocation, the write loop, close and
/// disconnect in that order. On failure after the file was opened the file is
/// aborted rather than committed, and the connection is always released
/// before returning.
pub fn write_file<C, F>(
    client: &C,
    connect: &ConnectOptions,
    path: &str,
    open: &OpenOptions,
    request: &WriteRequest,
    on_chunk: F,
) -> Result<WriteSummary>
where
    C: StorageClient,
    F: FnMut(u64),
{
    let mut connection = client.connect(connect)?;
    debug!("Connected to {}", connect);

    let result = write_with_connection(client, &mut connection, path, open, request, on_chunk);

    client.disconnect(connection);
    debug!("Disconnected from {}", connect.endpoint());
    result
}

fn write_with_connection<C, F>(
    client: &C,
    connection: &mut C::Connection,
    path: &str,
    open: &OpenOptions,
    request: &WriteRequest,
    on_chunk: F,
) -> Result<WriteSummary>
where
    C: StorageClient,
    F: FnMut(u64),
{
    let mut file = client.open_for_write(connection, path, open)?;
    debug!("Opened {} for writing", path);

    let outcome = ChunkBuffer::for_request(request)
        .and_then(|buffer| writer::write_all_with_progress(&mut file, request, &buffer, on_chunk));

    match outcome {
        Ok(summary) => {
            client.close(connection, file)?;
            Ok(summary)
        }
        Err(err) => {
            client.abort(connection, file);
            Err(err)
        }
    }
}
