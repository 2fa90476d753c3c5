//! Where a byte transfer's bytes come from.

use std::path::PathBuf;

use hivegatt_file_ops::{FileSelection, MostRecentFileResolver};
use hivegatt_media::MediaRenderer;
use hivegatt_protocol::ContentKind;

use crate::TransferError;

/// Source of a chunked byte transfer.
#[derive(Debug, Clone)]
pub enum TransferSource {
    /// A fixed path. A single-use source is deleted once fully sent.
    Static { path: PathBuf, single_use: bool },
    /// One frame of the most recent video recording, written to `artifact`.
    VideoFrame {
        resolver: MostRecentFileResolver,
        frame_index: u32,
        artifact: PathBuf,
    },
    /// A waveform of the most recent audio recording, written to `artifact`.
    AudioWaveform {
        resolver: MostRecentFileResolver,
        artifact: PathBuf,
    },
    /// The sole file in the most recent dated directory, streamed as-is.
    SensorLog { resolver: MostRecentFileResolver },
}

/// A source ready to be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedSource {
    /// File to stream.
    pub path: PathBuf,
    /// Transient file produced for this transfer, deleted when it ends.
    pub artifact: Option<PathBuf>,
}

impl TransferSource {
    pub fn static_file(path: impl Into<PathBuf>, single_use: bool) -> Self {
        Self::Static {
            path: path.into(),
            single_use,
        }
    }

    /// Latest `.h264` recording under `root`, one frame of it.
    pub fn video_frame(
        root: impl Into<PathBuf>,
        frame_index: u32,
        artifact: impl Into<PathBuf>,
    ) -> Self {
        Self::VideoFrame {
            resolver: MostRecentFileResolver::new(root, FileSelection::latest_recording("h264")),
            frame_index,
            artifact: artifact.into(),
        }
    }

    /// Latest `.wav` recording under `root`, as a waveform.
    pub fn audio_waveform(root: impl Into<PathBuf>, artifact: impl Into<PathBuf>) -> Self {
        Self::AudioWaveform {
            resolver: MostRecentFileResolver::new(root, FileSelection::latest_recording("wav")),
            artifact: artifact.into(),
        }
    }

    pub fn sensor_log(root: impl Into<PathBuf>) -> Self {
        Self::SensorLog {
            resolver: MostRecentFileResolver::new(root, FileSelection::Single),
        }
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Static { .. } => ContentKind::Static,
            Self::VideoFrame { .. } => ContentKind::VideoFrame,
            Self::AudioWaveform { .. } => ContentKind::AudioWaveform,
            Self::SensorLog { .. } => ContentKind::SensorLog,
        }
    }

    /// Whether the source file itself is removed after a complete transfer.
    pub fn deletes_on_completion(&self) -> bool {
        matches!(
            self,
            Self::Static {
                single_use: true,
                ..
            }
        )
    }

    /// Resolves and, for derived media, renders the file to stream.
    pub async fn prepare(
        &self,
        renderer: &dyn MediaRenderer,
    ) -> Result<PreparedSource, TransferError> {
        match self {
            Self::Static { path, .. } => {
                if !path.is_file() {
                    return Err(TransferError::SourceUnavailable(path.clone()));
                }
                Ok(PreparedSource {
                    path: path.clone(),
                    artifact: None,
                })
            }
            Self::VideoFrame {
                resolver,
                frame_index,
                artifact,
            } => {
                let video = resolver.resolve()?;
                let path = renderer
                    .extract_frame(&video, *frame_index, artifact)
                    .await?;
                Ok(PreparedSource {
                    artifact: Some(path.clone()),
                    path,
                })
            }
            Self::AudioWaveform { resolver, artifact } => {
                let audio = resolver.resolve()?;
                let path = renderer.render_waveform(&audio, artifact).await?;
                Ok(PreparedSource {
                    artifact: Some(path.clone()),
                    path,
                })
            }
            Self::SensorLog { resolver } => Ok(PreparedSource {
                path: resolver.resolve()?,
                artifact: None,
            }),
        }
    }
}
