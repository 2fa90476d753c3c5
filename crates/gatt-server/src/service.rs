//! The hive monitor's characteristic table.

use std::path::PathBuf;
use std::sync::Arc;

use hivegatt_file_ops::{FileSelection, MostRecentFileResolver};
use hivegatt_media::{DEFAULT_FRAME_INDEX, MediaRenderer};
use hivegatt_protocol::constants::*;
use hivegatt_protocol::{DEFAULT_MTU, LineAdvance};
use hivegatt_transfer::{
    ByteTransferSession, LineTransferSession, ResetControl, ResetTrigger, SessionHandle,
    TransferSource, into_handle,
};

use crate::endpoint::{FileInfoRead, LatestReadingRead, ReadAllRead, TransferRead};
use crate::registry::ServiceRegistry;

/// File name of the extracted video frame inside the artifact directory.
pub const FRAME_ARTIFACT: &str = "output_frame.jpg";
/// File name of the rendered waveform inside the artifact directory.
pub const WAVEFORM_ARTIFACT: &str = "waveform.jpg";

/// Paths and policies the characteristic table is built from.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Holds the `audio/`, `video/`, `cpu/` and `temp/` dated trees.
    pub data_root: PathBuf,
    pub picture_path: PathBuf,
    pub artifact_dir: PathBuf,
    pub mtu: usize,
    pub frame_index: u32,
    pub line_advance: LineAdvance,
    pub purge_artifact_on_reset: bool,
}

impl ServiceSettings {
    /// Default policies for the given data root and artifact directory.
    pub fn new(data_root: impl Into<PathBuf>, artifact_dir: impl Into<PathBuf>) -> Self {
        let artifact_dir = artifact_dir.into();
        Self {
            data_root: data_root.into(),
            picture_path: artifact_dir.join("picture.jpg"),
            artifact_dir,
            mtu: DEFAULT_MTU,
            frame_index: DEFAULT_FRAME_INDEX,
            line_advance: LineAdvance::default(),
            purge_artifact_on_reset: true,
        }
    }

    fn tree(&self, kind: &str) -> PathBuf {
        self.data_root.join(kind)
    }
}

/// Builds the registry for every characteristic of the hive service.
pub fn build_registry(
    settings: &ServiceSettings,
    renderer: Arc<dyn MediaRenderer>,
) -> ServiceRegistry {
    let mut registry = ServiceRegistry::new(SERVICE_UUID);
    let single = |kind: &str| MostRecentFileResolver::new(settings.tree(kind), FileSelection::Single);
    let bytes = |name: &str, source: TransferSource| -> SessionHandle {
        into_handle(ByteTransferSession::new(
            name,
            source,
            settings.mtu,
            Arc::clone(&renderer),
        ))
    };
    let lines = |name: &str, resolver: MostRecentFileResolver| -> SessionHandle {
        into_handle(LineTransferSession::new(name, resolver, settings.line_advance))
    };
    let reset = |session: &SessionHandle, trigger: ResetTrigger| {
        ResetControl::new(Arc::clone(session), trigger)
            .with_purge_artifact(settings.purge_artifact_on_reset)
    };

    // File info
    registry
        .add_read(
            AUDIO_FILE_INFO_UUID,
            "audio file info",
            FileInfoRead::new(MostRecentFileResolver::new(
                settings.tree("audio"),
                FileSelection::latest_recording("wav"),
            )),
        )
        .add_read(
            VIDEO_FILE_INFO_UUID,
            "video file info",
            FileInfoRead::new(MostRecentFileResolver::new(
                settings.tree("video"),
                FileSelection::latest_recording("h264"),
            )),
        );

    // Derived media and the photo
    let frame = bytes(
        "video frame",
        TransferSource::video_frame(
            settings.tree("video"),
            settings.frame_index,
            settings.artifact_dir.join(FRAME_ARTIFACT),
        ),
    );
    let waveform = bytes(
        "audio waveform",
        TransferSource::audio_waveform(
            settings.tree("audio"),
            settings.artifact_dir.join(WAVEFORM_ARTIFACT),
        ),
    );
    let picture = bytes(
        "picture",
        TransferSource::static_file(&settings.picture_path, true),
    );
    registry
        .add_read(VIDEO_FRAME_TRANSFER_UUID, "video frame", TransferRead::new(Arc::clone(&frame)))
        .add_write(
            VIDEO_FRAME_RESET_UUID,
            "video frame reset",
            reset(&frame, ResetTrigger::AnyWrite),
        )
        .add_read(
            AUDIO_WAVEFORM_TRANSFER_UUID,
            "audio waveform",
            TransferRead::new(Arc::clone(&waveform)),
        )
        .add_write(
            AUDIO_WAVEFORM_RESET_UUID,
            "audio waveform reset",
            reset(&waveform, ResetTrigger::AnyWrite),
        )
        .add_read(PICTURE_TRANSFER_UUID, "picture", TransferRead::new(Arc::clone(&picture)))
        .add_write(
            PICTURE_RESET_UUID,
            "picture reset",
            reset(&picture, ResetTrigger::AnyWrite),
        );

    // Video directory listing, one line per read
    let video_lines = lines(
        "video lines",
        MostRecentFileResolver::new(settings.tree("video"), FileSelection::last_by_name("csv")),
    );
    registry
        .add_read(VIDEO_LINES_UUID, "video lines", TransferRead::new(Arc::clone(&video_lines)))
        .add_write(
            VIDEO_LINES_RESET_UUID,
            "video lines reset",
            reset(&video_lines, ResetTrigger::AnyWrite),
        );

    // Sensor logs as raw bytes
    registry
        .add_read(
            CPU_LOG_TRANSFER_UUID,
            "cpu log",
            TransferRead::new(bytes("cpu log", TransferSource::sensor_log(settings.tree("cpu")))),
        )
        .add_read(
            TEMP_LOG_TRANSFER_UUID,
            "temp log",
            TransferRead::new(bytes(
                "temp log",
                TransferSource::sensor_log(settings.tree("temp")),
            )),
        );

    // Sensor summaries
    registry
        .add_read(
            CPU_LATEST_READING_UUID,
            "cpu latest reading",
            LatestReadingRead::new(single("cpu")),
        )
        .add_read(
            TEMP_LATEST_READING_UUID,
            "temp latest reading",
            LatestReadingRead::new(single("temp")),
        )
        .add_read(CPU_READ_ALL_UUID, "cpu read all", ReadAllRead::new(single("cpu")));

    // Sensor logs, one line per read
    let cpu_lines = lines("cpu lines", single("cpu"));
    let temp_lines = lines("temp lines", single("temp"));
    registry
        .add_read(CPU_LINES_UUID, "cpu lines", TransferRead::new(Arc::clone(&cpu_lines)))
        .add_write(
            CPU_LINES_RESET_UUID,
            "cpu lines reset",
            reset(&cpu_lines, ResetTrigger::reset_command()),
        )
        .add_read(TEMP_LINES_UUID, "temp lines", TransferRead::new(Arc::clone(&temp_lines)))
        .add_write(
            TEMP_LINES_RESET_UUID,
            "temp lines reset",
            reset(&temp_lines, ResetTrigger::reset_command()),
        );

    tracing::debug!(characteristics = registry.entries().len(), "service registry built");
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Access;
    use hivegatt_media::FfmpegRenderer;

    #[test]
    fn registers_every_characteristic() {
        let settings = ServiceSettings::new("/data", "/artifacts");
        let registry = build_registry(&settings, Arc::new(FfmpegRenderer::default()));

        assert_eq!(registry.service_uuid(), SERVICE_UUID);
        assert_eq!(registry.entries().len(), 19);

        let writes: Vec<_> = registry
            .entries()
            .iter()
            .filter(|e| matches!(e.access, Access::Write(_)))
            .map(|e| e.uuid)
            .collect();
        assert_eq!(
            writes,
            vec![
                VIDEO_FRAME_RESET_UUID,
                AUDIO_WAVEFORM_RESET_UUID,
                PICTURE_RESET_UUID,
                VIDEO_LINES_RESET_UUID,
                CPU_LINES_RESET_UUID,
                TEMP_LINES_RESET_UUID,
            ]
        );
    }

    #[test]
    fn picture_defaults_into_artifact_dir() {
        let settings = ServiceSettings::new("/data", "/home/bee/GATT_server");
        assert_eq!(
            settings.picture_path,
            PathBuf::from("/home/bee/GATT_server/picture.jpg")
        );
        assert_eq!(settings.tree("temp"), PathBuf::from("/data/temp"));
    }

    #[tokio::test]
    async fn empty_data_root_reads_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = ServiceSettings::new(tmp.path(), tmp.path());
        let registry = build_registry(&settings, Arc::new(FfmpegRenderer::default()));

        for entry in registry.entries() {
            if matches!(entry.access, Access::Read(_)) {
                assert!(registry.read(entry.uuid).await.is_empty(), "{}", entry.name);
            }
        }
    }
}
