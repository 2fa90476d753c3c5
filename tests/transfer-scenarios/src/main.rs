fn main() {
    println!("Run `cargo test -p transfer-scenarios` to execute the transfer scenarios.");
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use hivegatt_gatt_server::{
        FRAME_ARTIFACT, ServiceRegistry, ServiceSettings, WAVEFORM_ARTIFACT, build_registry,
    };
    use hivegatt_media::{MediaRenderer, RenderFuture};
    use hivegatt_protocol::constants::*;
    use hivegatt_protocol::{EOF_SENTINEL, LineAdvance};
    use uuid::Uuid;

    /// Writes a fixed image instead of running ffmpeg.
    struct StubRenderer {
        image: Vec<u8>,
        renders: AtomicUsize,
    }

    impl StubRenderer {
        fn new(len: usize) -> Arc<Self> {
            Arc::new(Self {
                image: (0..len).map(|i| (i % 251) as u8).collect(),
                renders: AtomicUsize::new(0),
            })
        }

        fn write<'a>(&'a self, output: &'a Path) -> RenderFuture<'a> {
            Box::pin(async move {
                self.renders.fetch_add(1, Ordering::SeqCst);
                std::fs::write(output, &self.image)?;
                Ok(output.to_path_buf())
            })
        }
    }

    impl MediaRenderer for StubRenderer {
        fn extract_frame<'a>(
            &'a self,
            _video: &'a Path,
            _frame_index: u32,
            output: &'a Path,
        ) -> RenderFuture<'a> {
            self.write(output)
        }

        fn render_waveform<'a>(&'a self, _audio: &'a Path, output: &'a Path) -> RenderFuture<'a> {
            self.write(output)
        }
    }

    /// A data root laid out like the collection job leaves it.
    struct Hive {
        _tmp: tempfile::TempDir,
        root: PathBuf,
        artifacts: PathBuf,
    }

    impl Hive {
        fn new() -> Self {
            let tmp = tempfile::tempdir().unwrap();
            let root = tmp.path().join("bee_tmp");
            let artifacts = tmp.path().join("GATT_server");
            std::fs::create_dir_all(&artifacts).unwrap();
            Self {
                _tmp: tmp,
                root,
                artifacts,
            }
        }

        fn put(&self, rel: &str, content: &[u8]) -> PathBuf {
            let path = self.root.join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, content).unwrap();
            path
        }

        fn settings(&self) -> ServiceSettings {
            ServiceSettings::new(&self.root, &self.artifacts)
        }

        fn registry(&self, renderer: Arc<StubRenderer>) -> ServiceRegistry {
            build_registry(&self.settings(), renderer)
        }
    }

    async fn drain(registry: &ServiceRegistry, uuid: Uuid) -> Vec<Vec<u8>> {
        let mut chunks = Vec::new();
        loop {
            let chunk = registry.read(uuid).await;
            let done = chunk.len() < 512;
            chunks.push(chunk);
            if done {
                return chunks;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Chunked byte transfers
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn picture_streams_in_mtu_chunks_then_disappears() {
        let hive = Hive::new();
        let picture = hive.artifacts.join("picture.jpg");
        let data: Vec<u8> = (0..1300u32).map(|i| (i % 256) as u8).collect();
        std::fs::write(&picture, &data).unwrap();
        let registry = hive.registry(StubRenderer::new(0));

        let chunks = drain(&registry, PICTURE_TRANSFER_UUID).await;
        let sizes: Vec<usize> = chunks.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![512, 512, 276]);
        assert_eq!(chunks.concat(), data);
        assert!(!picture.exists());

        // Nothing left to send: the error collapses to an empty payload.
        assert!(registry.read(PICTURE_TRANSFER_UUID).await.is_empty());
    }

    #[tokio::test]
    async fn exact_multiple_ends_with_empty_read_then_restarts() {
        let hive = Hive::new();
        let log: Vec<u8> = b"0123456789abcdef".repeat(64);
        assert_eq!(log.len(), 1024);
        hive.put("cpu/2024-03-05/cpu.csv", &log);
        let registry = hive.registry(StubRenderer::new(0));

        let chunks = drain(&registry, CPU_LOG_TRANSFER_UUID).await;
        let sizes: Vec<usize> = chunks.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![512, 512, 0]);

        assert_eq!(registry.read(CPU_LOG_TRANSFER_UUID).await, &log[..512]);
    }

    #[tokio::test]
    async fn video_frame_is_rendered_once_and_deleted_after_last_chunk() {
        let hive = Hive::new();
        hive.put("video/2024-03-05/hive@2024-03-05@09-00-00.h264", b"old");
        hive.put("video/2024-03-05/hive@2024-03-05@15-00-00.h264", b"new");
        let renderer = StubRenderer::new(1100);
        let registry = hive.registry(Arc::clone(&renderer));
        let frame = hive.artifacts.join(FRAME_ARTIFACT);

        assert_eq!(registry.read(VIDEO_FRAME_TRANSFER_UUID).await.len(), 512);
        assert!(frame.exists());
        assert_eq!(registry.read(VIDEO_FRAME_TRANSFER_UUID).await.len(), 512);
        assert!(frame.exists());
        assert_eq!(registry.read(VIDEO_FRAME_TRANSFER_UUID).await.len(), 76);
        assert!(!frame.exists());
        assert_eq!(renderer.renders.load(Ordering::SeqCst), 1);

        // A new transfer renders a fresh frame.
        registry.read(VIDEO_FRAME_TRANSFER_UUID).await;
        assert_eq!(renderer.renders.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn reset_mid_transfer_restarts_and_purges_waveform() {
        let hive = Hive::new();
        hive.put("audio/2024-03-05/hive@2024-03-05@10-00-00.wav", b"RIFF");
        let renderer = StubRenderer::new(1300);
        let registry = hive.registry(Arc::clone(&renderer));
        let waveform = hive.artifacts.join(WAVEFORM_ARTIFACT);

        let first = registry.read(AUDIO_WAVEFORM_TRANSFER_UUID).await;
        registry.read(AUDIO_WAVEFORM_TRANSFER_UUID).await;
        assert!(waveform.exists());

        assert!(registry.write(AUDIO_WAVEFORM_RESET_UUID, b"").await.is_empty());
        assert!(!waveform.exists());

        assert_eq!(registry.read(AUDIO_WAVEFORM_TRANSFER_UUID).await, first);
        assert_eq!(renderer.renders.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn reset_on_idle_transfer_is_harmless() {
        let hive = Hive::new();
        let picture = hive.artifacts.join("picture.jpg");
        std::fs::write(&picture, b"tiny").unwrap();
        let registry = hive.registry(StubRenderer::new(0));

        registry.write(PICTURE_RESET_UUID, b"anything").await;
        assert_eq!(registry.read(PICTURE_TRANSFER_UUID).await, b"tiny");
    }

    // -----------------------------------------------------------------------
    // Line transfers
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn cpu_lines_then_eof_then_restart() {
        let hive = Hive::new();
        hive.put(
            "cpu/2024-03-05/cpu.csv",
            b"09-00-00,40.1\n09-05-00,40.6\n09-10-00,41.0\n",
        );
        let registry = hive.registry(StubRenderer::new(0));

        assert_eq!(registry.read(CPU_LINES_UUID).await, b"09-00-00,40.1\n");
        assert_eq!(registry.read(CPU_LINES_UUID).await, b"09-05-00,40.6\n");
        assert_eq!(registry.read(CPU_LINES_UUID).await, b"09-10-00,41.0\n");
        assert_eq!(registry.read(CPU_LINES_UUID).await, EOF_SENTINEL);
        assert_eq!(registry.read(CPU_LINES_UUID).await, b"09-00-00,40.1\n");
    }

    #[tokio::test]
    async fn line_reset_needs_the_literal_command() {
        let hive = Hive::new();
        hive.put("temp/2024-03-05/temp.csv", b"a\nb\nc\n");
        let registry = hive.registry(StubRenderer::new(0));

        registry.read(TEMP_LINES_UUID).await;
        registry.read(TEMP_LINES_UUID).await;

        registry.write(TEMP_LINES_RESET_UUID, b"please").await;
        assert_eq!(registry.read(TEMP_LINES_UUID).await, b"c\n");

        registry.write(TEMP_LINES_RESET_UUID, b"reset").await;
        assert_eq!(registry.read(TEMP_LINES_UUID).await, b"a\n");
    }

    #[tokio::test]
    async fn video_lines_use_last_csv_by_name() {
        let hive = Hive::new();
        hive.put("video/2024-03-05/a_list.csv", b"old\n");
        hive.put("video/2024-03-05/b_list.csv", b"new\n");
        hive.put("video/2024-03-05/hive@2024-03-05@10-00-00.h264", b"h264");
        let registry = hive.registry(StubRenderer::new(0));

        assert_eq!(registry.read(VIDEO_LINES_UUID).await, b"new\n");
        assert_eq!(registry.read(VIDEO_LINES_UUID).await, b"EOF");
        registry.write(VIDEO_LINES_RESET_UUID, b"x").await;
        assert_eq!(registry.read(VIDEO_LINES_UUID).await, b"new\n");
    }

    #[tokio::test]
    async fn advance_then_return_skips_header() {
        let hive = Hive::new();
        hive.put("cpu/2024-03-05/cpu.csv", b"time,temp\n1,40\n");
        let settings = ServiceSettings {
            line_advance: LineAdvance::AdvanceThenReturn,
            ..hive.settings()
        };
        let registry = build_registry(&settings, StubRenderer::new(0));

        assert_eq!(registry.read(CPU_LINES_UUID).await, b"1,40\n");
        // The overrun read fails and collapses to an empty payload.
        assert!(registry.read(CPU_LINES_UUID).await.is_empty());
        assert_eq!(registry.read(CPU_LINES_UUID).await, b"EOF");
    }

    // -----------------------------------------------------------------------
    // Resolution
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn most_recent_dated_directory_wins() {
        let hive = Hive::new();
        hive.put("cpu/2024-01-01/cpu.csv", b"08-00-00,30.0\n");
        hive.put("cpu/2024-03-05/cpu.csv", b"08-00-00,35.5\n");
        std::fs::create_dir_all(hive.root.join("cpu/bogus-name")).unwrap();
        let registry = hive.registry(StubRenderer::new(0));

        assert_eq!(registry.read(CPU_READ_ALL_UUID).await, b"08-00-00,35.5\n");
        let latest = String::from_utf8(registry.read(CPU_LATEST_READING_UUID).await).unwrap();
        assert_eq!(latest, "08-00-00,35.5|Updated on 2024-03-05 at 08-00-00 AM");
    }

    #[tokio::test]
    async fn ambiguous_sensor_directory_reads_empty() {
        let hive = Hive::new();
        hive.put("temp/2024-03-05/temp.csv", b"1\n");
        hive.put("temp/2024-03-05/temp.csv.bak", b"1\n");
        let registry = hive.registry(StubRenderer::new(0));

        assert!(registry.read(TEMP_LOG_TRANSFER_UUID).await.is_empty());
        assert!(registry.read(TEMP_LATEST_READING_UUID).await.is_empty());
        assert!(registry.read(TEMP_LINES_UUID).await.is_empty());
    }

    #[tokio::test]
    async fn file_info_describes_latest_recording() {
        let hive = Hive::new();
        let path = hive.put("audio/2024-03-05/hive@2024-03-05@10-00-00.wav", b"abc");
        let registry = hive.registry(StubRenderer::new(0));

        let info = String::from_utf8(registry.read(AUDIO_FILE_INFO_UUID).await).unwrap();
        assert_eq!(
            info,
            format!(
                "{}, File Size: 3 bytes, SHA-256: ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
                path.display()
            )
        );
        assert!(registry.read(VIDEO_FILE_INFO_UUID).await.is_empty());
        assert_eq!(registry.service_uuid(), SERVICE_UUID);
    }
}
