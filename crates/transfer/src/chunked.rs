use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use hivegatt_protocol::{DEFAULT_MTU, TransferChunk};

use crate::TransferError;

// ---------------------------------------------------------------------------
// ChunkedByteTransfer
// ---------------------------------------------------------------------------

/// Streams a file one MTU at a time, remembering the offset between reads.
///
/// The file is reopened on every read so the source can change between
/// transfers. The cursor only moves after a successful read: a failed read
/// leaves it where it was.
#[derive(Debug, Clone)]
pub struct ChunkedByteTransfer {
    cursor: u64,
    mtu: usize,
}

impl Default for ChunkedByteTransfer {
    fn default() -> Self {
        Self::new(DEFAULT_MTU)
    }
}

impl ChunkedByteTransfer {
    /// Creates a transfer at offset 0.
    ///
    /// If `mtu` is 0, [`DEFAULT_MTU`] is used.
    pub fn new(mtu: usize) -> Self {
        let mtu = if mtu == 0 { DEFAULT_MTU } else { mtu };
        Self { cursor: 0, mtu }
    }

    /// Reads up to one MTU from `source` at the current offset.
    ///
    /// A chunk shorter than the MTU ends the transfer and rewinds the
    /// cursor to 0. A file whose size is an exact multiple of the MTU ends
    /// with an empty chunk.
    pub fn read_next_chunk(&mut self, source: &Path) -> Result<TransferChunk, TransferError> {
        let mut file =
            std::fs::File::open(source).map_err(|e| TransferError::from_source_io(source, e))?;
        file.seek(SeekFrom::Start(self.cursor))?;

        let mut buf = Vec::with_capacity(self.mtu);
        file.take(self.mtu as u64).read_to_end(&mut buf)?;

        let chunk = TransferChunk::from_read(self.cursor, buf, self.mtu);
        if chunk.is_terminal {
            tracing::debug!(
                source = %source.display(),
                total = chunk.offset + chunk.len() as u64,
                "transfer complete"
            );
            self.cursor = 0;
        } else {
            self.cursor += chunk.len() as u64;
        }
        Ok(chunk)
    }

    /// Rewinds to offset 0.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Offset of the next read.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    pub fn mtu(&self) -> usize {
        self.mtu
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
