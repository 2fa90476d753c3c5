//! Derived media for hive transfers.
//!
//! Video recordings are too large to pull over BLE, so the agent serves a
//! single extracted frame; audio recordings are served as a rendered
//! waveform image. Both are produced by an external tool behind the
//! [`MediaRenderer`] trait so transfers can be tested without it.

mod ffmpeg;

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

pub use ffmpeg::FfmpegRenderer;

/// A boxed future returned by renderer methods. Resolves to the written image.
pub type RenderFuture<'a> = Pin<Box<dyn Future<Output = Result<PathBuf, MediaError>> + Send + 'a>>;

/// Frame index extracted from video recordings by default.
pub const DEFAULT_FRAME_INDEX: u32 = 100;

/// Produces image files from recordings.
pub trait MediaRenderer: Send + Sync + 'static {
    /// Writes frame `frame_index` of `video` to `output`.
    fn extract_frame<'a>(
        &'a self,
        video: &'a Path,
        frame_index: u32,
        output: &'a Path,
    ) -> RenderFuture<'a>;

    /// Writes a waveform plot of `audio` to `output`.
    fn render_waveform<'a>(&'a self, audio: &'a Path, output: &'a Path) -> RenderFuture<'a>;
}

/// Errors produced by media rendering.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("{tool} wrote no output to {}", .path.display())]
    MissingOutput { tool: String, path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
