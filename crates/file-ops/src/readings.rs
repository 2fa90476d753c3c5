//! Latest-reading and whole-file payloads for sensor logs.
//!
//! Sensor logs are CSV files whose first column is the sample time as
//! `HH-MM-SS` (optionally quoted). Failed samples are written as `nan`.

use std::path::{Path, PathBuf};

use chrono::NaiveTime;

/// Errors produced while summarising a sensor log.
#[derive(Debug, thiserror::Error)]
pub enum ReadingError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sensor log is empty: {}", .0.display())]
    Empty(PathBuf),

    #[error("unrecognised sample time {0:?}")]
    SampleTime(String),
}

const NAN_MARKER: &str = "nan";

/// Picks the line to report from a sensor log.
///
/// The last line wins unless it contains `nan`; then the last line without
/// `nan` is used, and if every line is `nan` the first one is.
pub fn relevant_line<'a>(lines: &[&'a str]) -> Option<&'a str> {
    let last = *lines.last()?;
    if !last.contains(NAN_MARKER) {
        return Some(last);
    }
    lines
        .iter()
        .rev()
        .find(|line| !line.contains(NAN_MARKER))
        .or_else(|| lines.first())
        .copied()
}

/// Builds the latest-reading payload: `<line>|<update text>`.
///
/// `date_label` is the dated directory the log was found in.
pub fn latest_reading(path: &Path, date_label: &str) -> Result<String, ReadingError> {
    let content = std::fs::read_to_string(path)?;
    let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();

    let line = relevant_line(&lines).ok_or_else(|| ReadingError::Empty(path.to_path_buf()))?;
    let time = sample_time(line)?;

    let update = if line.contains(NAN_MARKER) {
        format!("Returning nan values since {time} on {date_label}")
    } else {
        format!("Updated on {date_label} at {time}")
    };

    Ok(format!("{}|{update}", line.trim()))
}

/// Returns the full contents of a sensor log.
pub fn read_all(path: &Path) -> Result<Vec<u8>, std::io::Error> {
    std::fs::read(path)
}

/// Parses the leading `HH-MM-SS` field and renders it as `hh-mm-ss AM/PM`.
fn sample_time(line: &str) -> Result<String, ReadingError> {
    let raw = line.split(',').next().unwrap_or_default().replace('"', "");
    let time = NaiveTime::parse_from_str(raw.trim(), "%H-%M-%S")
        .map_err(|_| ReadingError::SampleTime(raw.clone()))?;
    Ok(time.format("%I-%M-%S %p").to_string())
}
