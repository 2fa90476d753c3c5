//! File operations behind the hive characteristics.
//!
//! The data-collection process writes recordings and sensor logs under
//! `<root>/<YYYY-MM-DD>/<file>`. This crate finds the most recent of them,
//! removes transient artifacts once a transfer is done with them, and
//! builds the small text payloads (file info, latest reading) served
//! without chunking.

mod delete;
mod info;
mod readings;
mod resolve;

use std::path::PathBuf;

pub use delete::delete_artifact;
pub use info::{FileInfo, calculate_file_checksum, file_info};
pub use readings::{ReadingError, latest_reading, read_all, relevant_line};
pub use resolve::{
    DatedDir, FileSelection, MostRecentFileResolver, latest_dated_dir, recording_key, select_file,
};

/// Errors produced while locating the most recent file under a dated root.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("no dated directories under {}", .0.display())]
    NoDatedDirectories(PathBuf),

    #[error("no matching file in {}", .0.display())]
    NoMatchingFile(PathBuf),

    #[error("expected exactly one file in {}, found {count}", .dir.display())]
    AmbiguousFile { dir: PathBuf, count: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Expands a `~` prefix to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        home_dir().join(rest)
    } else if path == "~" {
        home_dir()
    } else {
        PathBuf::from(path)
    }
}

/// Returns the user's home directory.
fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_home_leaves_absolute_paths() {
        assert_eq!(expand_home("/opt/bee"), PathBuf::from("/opt/bee"));
    }

    #[test]
    fn expand_home_joins_rest() {
        let expanded = expand_home("~/appmais/bee_tmp");
        assert!(expanded.ends_with("appmais/bee_tmp"));
        assert!(!expanded.to_string_lossy().starts_with('~'));
    }
}
