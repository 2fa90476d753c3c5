//! Read and write endpoints behind characteristics.
//!
//! Endpoints return typed errors; [`crate::boundary`] turns them into the
//! empty payload the client sees.

use std::future::Future;
use std::pin::Pin;

use hivegatt_file_ops::{MostRecentFileResolver, file_info, latest_reading, read_all};
use hivegatt_transfer::{ResetControl, SessionHandle, TransferError};

use crate::ServerError;

/// A boxed future returned by endpoint methods.
pub type EndpointFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<u8>, ServerError>> + Send + 'a>>;

/// Backs a readable characteristic.
pub trait ReadEndpoint: Send + Sync + 'static {
    fn read(&self) -> EndpointFuture<'_>;
}

/// Backs a writable characteristic. The returned bytes are the
/// acknowledgement, which is always empty for this service.
pub trait WriteEndpoint: Send + Sync + 'static {
    fn write<'a>(&'a self, value: &'a [u8]) -> EndpointFuture<'a>;
}

// ---------------------------------------------------------------------------
// Transfers
// ---------------------------------------------------------------------------

/// Reads the next chunk or line of a shared transfer session.
pub struct TransferRead {
    session: SessionHandle,
}

impl TransferRead {
    pub fn new(session: SessionHandle) -> Self {
        Self { session }
    }
}

impl ReadEndpoint for TransferRead {
    fn read(&self) -> EndpointFuture<'_> {
        Box::pin(async move {
            let mut session = self.session.lock().await;
            Ok(session.read_next().await?)
        })
    }
}

impl WriteEndpoint for ResetControl {
    fn write<'a>(&'a self, value: &'a [u8]) -> EndpointFuture<'a> {
        Box::pin(async move { Ok(self.reset(value).await) })
    }
}

// ---------------------------------------------------------------------------
// Single-shot payloads
// ---------------------------------------------------------------------------

/// `<path>, File Size: <n> bytes, SHA-256: <hex>` for the most recent recording.
pub struct FileInfoRead {
    resolver: MostRecentFileResolver,
}

impl FileInfoRead {
    pub fn new(resolver: MostRecentFileResolver) -> Self {
        Self { resolver }
    }
}

impl ReadEndpoint for FileInfoRead {
    fn read(&self) -> EndpointFuture<'_> {
        Box::pin(async move {
            let path = self.resolver.resolve().map_err(TransferError::from)?;
            let info = file_info(&path)?;
            Ok(info.to_string().into_bytes())
        })
    }
}

/// Most recent meaningful line of a sensor log, with when it was taken.
pub struct LatestReadingRead {
    resolver: MostRecentFileResolver,
}

impl LatestReadingRead {
    pub fn new(resolver: MostRecentFileResolver) -> Self {
        Self { resolver }
    }
}

impl ReadEndpoint for LatestReadingRead {
    fn read(&self) -> EndpointFuture<'_> {
        Box::pin(async move {
            let (dir, path) = self.resolver.resolve_dated().map_err(TransferError::from)?;
            Ok(latest_reading(&path, &dir.name)?.into_bytes())
        })
    }
}

/// Whole sensor log in one read. Clients only see the first MTU of it.
pub struct ReadAllRead {
    resolver: MostRecentFileResolver,
}

impl ReadAllRead {
    pub fn new(resolver: MostRecentFileResolver) -> Self {
        Self { resolver }
    }
}

impl ReadEndpoint for ReadAllRead {
    fn read(&self) -> EndpointFuture<'_> {
        Box::pin(async move {
            let path = self.resolver.resolve().map_err(TransferError::from)?;
            Ok(read_all(&path)?)
        })
    }
}
