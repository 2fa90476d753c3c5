use serde::{Deserialize, Serialize};

/// One slice of a chunked byte transfer.
///
/// The client never sees `is_terminal`: on the wire a transfer ends with
/// the first chunk shorter than the MTU (possibly empty). This type keeps
/// that rule in one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferChunk {
    /// Byte offset of `data` within the source.
    pub offset: u64,
    /// Raw bytes sent to the client.
    pub data: Vec<u8>,
    /// Whether this chunk ends the transfer.
    pub is_terminal: bool,
}

impl TransferChunk {
    /// Builds a chunk from a read of at most `mtu` bytes at `offset`.
    pub fn from_read(offset: u64, data: Vec<u8>, mtu: usize) -> Self {
        let is_terminal = data.len() < mtu;
        Self {
            offset,
            data,
            is_terminal,
        }
    }

    /// Number of payload bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` for the empty terminal chunk.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Consumes the chunk, returning the wire payload.
    pub fn into_payload(self) -> Vec<u8> {
        self.data
    }
}

/// What a transfer streams, which decides how its source bytes are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// A fixed file path.
    Static,
    /// One frame extracted from the most recent video recording.
    VideoFrame,
    /// A waveform image rendered from the most recent audio recording.
    AudioWaveform,
    /// The most recent sensor log, streamed as raw bytes.
    SensorLog,
    /// The most recent line-oriented log, served one line per read.
    LineLog,
}

impl ContentKind {
    /// Stable label used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::VideoFrame => "video-frame",
            Self::AudioWaveform => "audio-waveform",
            Self::SensorLog => "sensor-log",
            Self::LineLog => "line-log",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a line cursor moves relative to the line it returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineAdvance {
    /// Return the line at the cursor, then increment.
    #[default]
    ReturnThenAdvance,
    /// Increment, then return the line at the new cursor (line 0 is never served).
    AdvanceThenReturn,
}
