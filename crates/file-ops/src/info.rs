//! Recording metadata served by the file info characteristics.

use std::io::Read;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Size and digest of a recording.
///
/// The client compares `sha256` with the bytes it reassembled from a
/// chunked transfer of the same file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub path: PathBuf,
    pub size: u64,
    /// Hex-encoded SHA-256 of the file contents.
    pub sha256: String,
}

impl std::fmt::Display for FileInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, File Size: {} bytes, SHA-256: {}",
            self.path.display(),
            self.size,
            self.sha256
        )
    }
}

/// Reads size and checksum of `path`.
pub fn file_info(path: &Path) -> Result<FileInfo, std::io::Error> {
    let size = std::fs::metadata(path)?.len();
    let sha256 = calculate_file_checksum(path)?;
    Ok(FileInfo {
        path: path.to_path_buf(),
        size,
        sha256,
    })
}

/// Computes SHA-256 of an entire file and returns the hex-encoded digest.
pub fn calculate_file_checksum(path: &Path) -> Result<String, std::io::Error> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}
