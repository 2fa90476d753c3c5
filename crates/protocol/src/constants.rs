use uuid::Uuid;

/// Default chunk size for a single characteristic read.
///
/// Matches the largest ATT value BlueZ hands back in one read response
/// for the phones the app targets. The agent config may lower it.
pub const DEFAULT_MTU: usize = 512;

/// Payload returned by line transfers once every line has been served.
pub const EOF_SENTINEL: &[u8] = b"EOF";

/// Exact write payload accepted by literal-triggered reset characteristics.
pub const RESET_COMMAND: &str = "reset";

/// Date format of the per-day directories under each data root.
pub const DATED_DIR_FORMAT: &str = "%Y-%m-%d";

/// Suffix shared by every UUID in the hive service.
const UUID_BASE: u128 = 0x0000_0000_710e_4a5b_8d75_3e5b_444b_c3cf;

/// Builds a hive service UUID from its 16-bit short id (`0x0203` → `00000203-710e-…`).
pub const fn hive_uuid(short: u16) -> Uuid {
    Uuid::from_u128(UUID_BASE | ((short as u128) << 96))
}

/// Primary service advertised by the agent.
pub const SERVICE_UUID: Uuid = hive_uuid(0x0001);

// Audio / video tab
pub const AUDIO_FILE_INFO_UUID: Uuid = hive_uuid(0x0201);
pub const VIDEO_FILE_INFO_UUID: Uuid = hive_uuid(0x0202);
pub const VIDEO_FRAME_TRANSFER_UUID: Uuid = hive_uuid(0x0203);
pub const VIDEO_FRAME_RESET_UUID: Uuid = hive_uuid(0x0204);
pub const AUDIO_WAVEFORM_TRANSFER_UUID: Uuid = hive_uuid(0x0205);
pub const AUDIO_WAVEFORM_RESET_UUID: Uuid = hive_uuid(0x0206);
pub const PICTURE_TRANSFER_UUID: Uuid = hive_uuid(0x0207);
pub const PICTURE_RESET_UUID: Uuid = hive_uuid(0x0208);
pub const VIDEO_LINES_UUID: Uuid = hive_uuid(0x0209);
pub const VIDEO_LINES_RESET_UUID: Uuid = hive_uuid(0x0210);
pub const CPU_LOG_TRANSFER_UUID: Uuid = hive_uuid(0x0211);
pub const TEMP_LOG_TRANSFER_UUID: Uuid = hive_uuid(0x0212);

// Sensor data tab
pub const CPU_LATEST_READING_UUID: Uuid = hive_uuid(0x0301);
pub const TEMP_LATEST_READING_UUID: Uuid = hive_uuid(0x0302);
pub const CPU_READ_ALL_UUID: Uuid = hive_uuid(0x0303);
pub const CPU_LINES_UUID: Uuid = hive_uuid(0x0304);
pub const CPU_LINES_RESET_UUID: Uuid = hive_uuid(0x0305);
pub const TEMP_LINES_UUID: Uuid = hive_uuid(0x0306);
pub const TEMP_LINES_RESET_UUID: Uuid = hive_uuid(0x0307);
