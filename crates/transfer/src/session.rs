//! Long-lived transfer sessions, one per characteristic.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use hivegatt_file_ops::{MostRecentFileResolver, delete_artifact};
use hivegatt_media::MediaRenderer;
use hivegatt_protocol::{ContentKind, LineAdvance, TransferChunk};
use tokio::sync::Mutex;

use crate::{ChunkedByteTransfer, LineCursorTransfer, LineRead, TransferError, TransferSource};

/// A boxed future returned by [`Transfer::read_next`]. Resolves to the wire payload.
pub type TransferFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<u8>, TransferError>> + Send + 'a>>;

/// Shared handle to a session, held by its read and reset characteristics.
///
/// The mutex serializes reads and resets on one session. BLE reads on a
/// characteristic arrive one at a time, so it is never contended for long.
pub type SessionHandle = Arc<Mutex<dyn Transfer>>;

/// Wraps a session for sharing between characteristics.
pub fn into_handle<T: Transfer>(session: T) -> SessionHandle {
    Arc::new(Mutex::new(session))
}

/// A resumable transfer served one read at a time.
pub trait Transfer: Send + 'static {
    fn name(&self) -> &str;

    fn kind(&self) -> ContentKind;

    /// Position of the next read (bytes or lines).
    fn cursor(&self) -> u64;

    /// Produces the next payload.
    fn read_next(&mut self) -> TransferFuture<'_>;

    /// Rewinds to the start. With `purge_artifact`, also deletes any
    /// transient file produced for the transfer in progress.
    fn reset(&mut self, purge_artifact: bool);
}

// ---------------------------------------------------------------------------
// ByteTransferSession
// ---------------------------------------------------------------------------

/// Streams a [`TransferSource`] in MTU-sized chunks.
///
/// The source is prepared on the first read of a transfer (cursor 0) and
/// reused until the terminal chunk. Derived media is therefore rendered
/// once per transfer, and its artifact is deleted right after the
/// terminal chunk is produced.
pub struct ByteTransferSession {
    name: String,
    source: TransferSource,
    transfer: ChunkedByteTransfer,
    renderer: Arc<dyn MediaRenderer>,
    source_path: Option<PathBuf>,
    artifact: Option<PathBuf>,
}

impl ByteTransferSession {
    pub fn new(
        name: impl Into<String>,
        source: TransferSource,
        mtu: usize,
        renderer: Arc<dyn MediaRenderer>,
    ) -> Self {
        Self {
            name: name.into(),
            source,
            transfer: ChunkedByteTransfer::new(mtu),
            renderer,
            source_path: None,
            artifact: None,
        }
    }

    /// Reads the next chunk, preparing the source first if no transfer is
    /// in progress.
    ///
    /// On failure the prepared source and any artifact are dropped so the
    /// next read prepares again; the cursor is left unchanged.
    pub async fn read_next_chunk(&mut self) -> Result<TransferChunk, TransferError> {
        let path = if let Some(path) = self.source_path.clone() {
            path
        } else {
            let prepared = self.source.prepare(self.renderer.as_ref()).await?;
            tracing::debug!(
                session = %self.name,
                kind = %self.source.kind(),
                source = %prepared.path.display(),
                "transfer source prepared"
            );
            self.artifact = prepared.artifact;
            self.source_path = Some(prepared.path.clone());
            prepared.path
        };

        match self.transfer.read_next_chunk(&path) {
            Ok(chunk) => {
                if chunk.is_terminal {
                    self.finish(&path);
                }
                Ok(chunk)
            }
            Err(e) => {
                self.abandon();
                Err(e)
            }
        }
    }

    /// Source being streamed, if a transfer is in progress.
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Transient artifact of the transfer in progress.
    pub fn artifact(&self) -> Option<&Path> {
        self.artifact.as_deref()
    }

    pub fn source(&self) -> &TransferSource {
        &self.source
    }

    fn finish(&mut self, path: &Path) {
        if let Some(artifact) = self.artifact.take() {
            delete_artifact(&artifact);
        }
        if self.source.deletes_on_completion() {
            delete_artifact(path);
        }
        self.source_path = None;
    }

    fn abandon(&mut self) {
        if let Some(artifact) = self.artifact.take() {
            delete_artifact(&artifact);
        }
        self.source_path = None;
    }
}

impl Transfer for ByteTransferSession {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ContentKind {
        self.source.kind()
    }

    fn cursor(&self) -> u64 {
        self.transfer.cursor()
    }

    fn read_next(&mut self) -> TransferFuture<'_> {
        Box::pin(async move { self.read_next_chunk().await.map(TransferChunk::into_payload) })
    }

    fn reset(&mut self, purge_artifact: bool) {
        tracing::debug!(session = %self.name, cursor = self.transfer.cursor(), "transfer reset");
        self.transfer.reset();
        self.source_path = None;
        if let Some(artifact) = self.artifact.take() {
            if purge_artifact {
                delete_artifact(&artifact);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// LineTransferSession
// ---------------------------------------------------------------------------

/// Serves the most recent log one line per read, ending each pass with `EOF`.
///
/// The file is resolved again on every read, so a log that rolls over to a
/// new dated directory mid-transfer is picked up at the same line index.
pub struct LineTransferSession {
    name: String,
    resolver: MostRecentFileResolver,
    lines: LineCursorTransfer,
}

impl LineTransferSession {
    pub fn new(
        name: impl Into<String>,
        resolver: MostRecentFileResolver,
        advance: LineAdvance,
    ) -> Self {
        Self {
            name: name.into(),
            resolver,
            lines: LineCursorTransfer::new(advance),
        }
    }

    pub fn read_next_line(&mut self) -> Result<LineRead, TransferError> {
        let path = self.resolver.resolve()?;
        let read = self.lines.read_next_line(&path)?;
        if read == LineRead::Eof {
            tracing::debug!(session = %self.name, source = %path.display(), "line transfer complete");
        }
        Ok(read)
    }
}

impl Transfer for LineTransferSession {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ContentKind {
        ContentKind::LineLog
    }

    fn cursor(&self) -> u64 {
        self.lines.cursor() as u64
    }

    fn read_next(&mut self) -> TransferFuture<'_> {
        Box::pin(async move { self.read_next_line().map(LineRead::into_payload) })
    }

    fn reset(&mut self, _purge_artifact: bool) {
        tracing::debug!(session = %self.name, cursor = self.lines.cursor(), "line transfer reset");
        self.lines.reset();
    }
}
