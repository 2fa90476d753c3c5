use std::path::Path;

use hivegatt_protocol::{EOF_SENTINEL, LineAdvance};

use crate::TransferError;

/// Result of one line read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineRead {
    /// The line at the cursor, trailing newline included.
    Line(String),
    /// The cursor ran past the last line and was rewound.
    Eof,
}

impl LineRead {
    /// Wire payload: the line's bytes, or `EOF`.
    pub fn into_payload(self) -> Vec<u8> {
        match self {
            Self::Line(line) => line.into_bytes(),
            Self::Eof => EOF_SENTINEL.to_vec(),
        }
    }
}

/// Serves a text file one line per read.
#[derive(Debug, Clone, Default)]
pub struct LineCursorTransfer {
    cursor: usize,
    advance: LineAdvance,
}

impl LineCursorTransfer {
    pub fn new(advance: LineAdvance) -> Self {
        Self { cursor: 0, advance }
    }

    /// Reads `source` and returns the line at the cursor.
    pub fn read_next_line(&mut self, source: &Path) -> Result<LineRead, TransferError> {
        let content = std::fs::read_to_string(source)
            .map_err(|e| TransferError::from_source_io(source, e))?;
        let lines: Vec<&str> = content.split_inclusive('\n').collect();
        self.next_from(&lines)
    }

    /// Returns the line at the cursor from an already-split file.
    ///
    /// Once the cursor reaches the line count the read yields
    /// [`LineRead::Eof`] and the cursor goes back to 0.
    pub fn next_from(&mut self, lines: &[&str]) -> Result<LineRead, TransferError> {
        let total = lines.len();
        if self.cursor >= total {
            self.cursor = 0;
            return Ok(LineRead::Eof);
        }

        match self.advance {
            LineAdvance::ReturnThenAdvance => {
                let line = lines[self.cursor];
                self.cursor += 1;
                Ok(LineRead::Line(line.to_string()))
            }
            LineAdvance::AdvanceThenReturn => {
                self.cursor += 1;
                lines
                    .get(self.cursor)
                    .map(|line| LineRead::Line((*line).to_string()))
                    .ok_or(TransferError::LineOutOfRange {
                        index: self.cursor,
                        total,
                    })
            }
        }
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn advance(&self) -> LineAdvance {
        self.advance
    }
}
