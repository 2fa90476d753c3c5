//! `ffmpeg`-backed renderer.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::{MediaError, MediaRenderer, RenderFuture};

/// Waveform image size, matching the 14x5 inch plot the app was built around.
const WAVEFORM_SIZE: &str = "1400x500";

/// Renders frames and waveforms by shelling out to `ffmpeg`.
#[derive(Debug, Clone)]
pub struct FfmpegRenderer {
    program: PathBuf,
}

impl Default for FfmpegRenderer {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl FfmpegRenderer {
    /// Uses `program` as the ffmpeg binary (name on `$PATH` or absolute path).
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn frame_args(video: &Path, frame_index: u32, output: &Path) -> Vec<OsString> {
        vec![
            "-y".into(),
            "-loglevel".into(),
            "error".into(),
            "-i".into(),
            video.into(),
            "-vf".into(),
            format!("select=eq(n\\,{frame_index})").into(),
            "-frames:v".into(),
            "1".into(),
            "-update".into(),
            "1".into(),
            output.into(),
        ]
    }

    fn waveform_args(audio: &Path, output: &Path) -> Vec<OsString> {
        vec![
            "-y".into(),
            "-loglevel".into(),
            "error".into(),
            "-i".into(),
            audio.into(),
            "-filter_complex".into(),
            format!("showwavespic=s={WAVEFORM_SIZE}:colors=0x1f77b4").into(),
            "-frames:v".into(),
            "1".into(),
            output.into(),
        ]
    }

    async fn run(&self, args: Vec<OsString>, output: &Path) -> Result<PathBuf, MediaError> {
        let tool = self.program.display().to_string();

        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        // The output path is shared between renders; a leftover image must
        // not pass the existence check below.
        discard(output).await?;

        let result = tokio::process::Command::new(&self.program)
            .args(&args)
            .stdin(std::process::Stdio::null())
            .output()
            .await
            .map_err(|source| MediaError::Spawn {
                tool: tool.clone(),
                source,
            })?;

        if !result.status.success() {
            if let Err(e) = discard(output).await {
                tracing::warn!(output = %output.display(), "failed to remove partial output: {e}");
            }
            return Err(MediaError::ToolFailed {
                tool,
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        // ffmpeg exits 0 when the selected frame does not exist.
        if !tokio::fs::try_exists(output).await.unwrap_or(false) {
            return Err(MediaError::MissingOutput {
                tool,
                path: output.to_path_buf(),
            });
        }

        tracing::debug!(output = %output.display(), "media artifact written");
        Ok(output.to_path_buf())
    }
}

/// Removes `path` if present.
async fn discard(path: &Path) -> Result<(), MediaError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

impl MediaRenderer for FfmpegRenderer {
    fn extract_frame<'a>(
        &'a self,
        video: &'a Path,
        frame_index: u32,
        output: &'a Path,
    ) -> RenderFuture<'a> {
        Box::pin(async move {
            tracing::debug!(video = %video.display(), frame_index, "extracting video frame");
            self.run(Self::frame_args(video, frame_index, output), output)
                .await
        })
    }

    fn render_waveform<'a>(&'a self, audio: &'a Path, output: &'a Path) -> RenderFuture<'a> {
        Box::pin(async move {
            tracing::debug!(audio = %audio.display(), "rendering waveform");
            self.run(Self::waveform_args(audio, output), output).await
        })
    }
}
