//! Chunked file transfer with resumable cursors.
//!
//! A BLE read returns at most one MTU of data, so every file the app pulls
//! is streamed as a sequence of reads against a long-lived session that
//! remembers where the previous read stopped. Byte transfers end with the
//! first chunk shorter than the MTU; line transfers end with `EOF`. Either
//! way the session rewinds itself, and a paired reset characteristic can
//! rewind it at any time.

mod chunked;
mod lines;
mod reset;
mod session;
mod source;

use std::path::{Path, PathBuf};

use hivegatt_file_ops::ResolveError;
use hivegatt_media::MediaError;

pub use chunked::ChunkedByteTransfer;
pub use lines::{LineCursorTransfer, LineRead};
pub use reset::{ResetControl, ResetTrigger};
pub use session::{
    ByteTransferSession, LineTransferSession, SessionHandle, Transfer, TransferFuture,
    into_handle,
};
pub use source::{PreparedSource, TransferSource};

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("no dated directories under {}", .0.display())]
    NoDatedDirectories(PathBuf),

    #[error("no matching file in {}", .0.display())]
    NoMatchingFile(PathBuf),

    #[error("expected exactly one file in {}, found {count}", .dir.display())]
    AmbiguousFile { dir: PathBuf, count: usize },

    #[error("source unavailable: {}", .0.display())]
    SourceUnavailable(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("media error: {0}")]
    Media(#[from] MediaError),

    #[error("line {index} out of range ({total} lines)")]
    LineOutOfRange { index: usize, total: usize },
}

impl TransferError {
    /// Stable label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoDatedDirectories(_) => "no_dated_directories",
            Self::NoMatchingFile(_) => "no_matching_file",
            Self::AmbiguousFile { .. } => "ambiguous_file",
            Self::SourceUnavailable(_) => "source_unavailable",
            Self::Io(_) => "io_failure",
            Self::Media(_) => "media_failure",
            Self::LineOutOfRange { .. } => "line_out_of_range",
        }
    }

    /// Maps an open/read failure on `path`, turning `NotFound` into
    /// [`SourceUnavailable`](Self::SourceUnavailable).
    pub(crate) fn from_source_io(path: &Path, e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            Self::SourceUnavailable(path.to_path_buf())
        } else {
            Self::Io(e)
        }
    }
}

impl From<ResolveError> for TransferError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::NoDatedDirectories(root) => Self::NoDatedDirectories(root),
            ResolveError::NoMatchingFile(dir) => Self::NoMatchingFile(dir),
            ResolveError::AmbiguousFile { dir, count } => Self::AmbiguousFile { dir, count },
            ResolveError::Io(e) => Self::Io(e),
        }
    }
}
