//! Transient artifact removal.

use std::path::Path;

/// Deletes a transient artifact (extracted frame, rendered waveform, picked-up photo).
///
/// Returns `true` if a file was removed. A missing file is not an error:
/// artifacts live at shared paths and may already be gone. Other failures
/// are logged and swallowed so cleanup never fails the read that triggered it.
pub fn delete_artifact(path: &Path) -> bool {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "deleted transient artifact");
            true
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "transient artifact already gone");
            false
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to delete transient artifact");
            false
        }
    }
}
