//! Agent configuration management.
//!
//! Configuration is stored as TOML at `~/.config/hivegatt/agent.toml`, or at
//! the path in `HIVEGATT_CONFIG` when set.

use std::path::PathBuf;

use hivegatt_file_ops::expand_home;
use hivegatt_gatt_server::ServiceSettings;
use hivegatt_media::DEFAULT_FRAME_INDEX;
use hivegatt_protocol::{DEFAULT_MTU, LineAdvance};
use serde::{Deserialize, Serialize};

/// Environment variable overriding the configuration path.
const CONFIG_ENV: &str = "HIVEGATT_CONFIG";

/// Agent configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Advertised local name (hostname by default).
    #[serde(default = "default_name")]
    pub name: String,

    /// BlueZ adapter, e.g. `hci0`. The default adapter when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adapter: Option<String>,

    /// Largest payload returned by one transfer read.
    #[serde(default = "default_mtu")]
    pub mtu: usize,

    /// Root holding the `audio/`, `video/`, `cpu/` and `temp/` trees.
    #[serde(default = "default_data_root")]
    pub data_root: String,

    /// Photo dropped by the camera job; deleted once sent.
    #[serde(default = "default_picture_path")]
    pub picture_path: String,

    /// Where extracted frames and waveforms are written.
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: String,

    /// Frame extracted from video recordings.
    #[serde(default = "default_frame_index")]
    pub frame_index: u32,

    /// ffmpeg binary.
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: String,

    #[serde(default)]
    pub line_advance: LineAdvance,

    /// Delete a pending frame or waveform when its transfer is reset.
    #[serde(default = "default_true")]
    pub purge_artifact_on_reset: bool,
}

fn default_name() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "hive-monitor".into())
}

fn default_mtu() -> usize {
    DEFAULT_MTU
}

fn default_data_root() -> String {
    "/home/bee/appmais/bee_tmp".into()
}

fn default_picture_path() -> String {
    "/home/bee/GATT_server/picture.jpg".into()
}

fn default_artifact_dir() -> String {
    "/home/bee/GATT_server".into()
}

fn default_frame_index() -> u32 {
    DEFAULT_FRAME_INDEX
}

fn default_ffmpeg() -> String {
    "ffmpeg".into()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: default_name(),
            adapter: None,
            mtu: default_mtu(),
            data_root: default_data_root(),
            picture_path: default_picture_path(),
            artifact_dir: default_artifact_dir(),
            frame_index: default_frame_index(),
            ffmpeg: default_ffmpeg(),
            line_advance: LineAdvance::default(),
            purge_artifact_on_reset: default_true(),
        }
    }
}

impl Config {
    /// Loads configuration from disk, or creates a default if not found.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(config_path())
    }

    fn load_from(path: PathBuf) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(&path)?;
            Ok(config)
        }
    }

    fn save_to(&self, path: &std::path::Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        // Restrict permissions on Unix.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Data root with `~` expanded.
    pub fn data_root(&self) -> PathBuf {
        expand_home(&self.data_root)
    }

    pub fn picture_path(&self) -> PathBuf {
        expand_home(&self.picture_path)
    }

    /// Paths and policies for the characteristic table.
    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            data_root: self.data_root(),
            picture_path: self.picture_path(),
            artifact_dir: expand_home(&self.artifact_dir),
            mtu: self.mtu,
            frame_index: self.frame_index,
            line_advance: self.line_advance,
            purge_artifact_on_reset: self.purge_artifact_on_reset,
        }
    }
}

/// Returns the configuration file path.
fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
    PathBuf::from(home)
        .join(".config")
        .join("hivegatt")
        .join("agent.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(!config.name.is_empty());
        assert_eq!(config.mtu, 512);
        assert_eq!(config.frame_index, 100);
        assert_eq!(config.line_advance, LineAdvance::ReturnThenAdvance);
        assert!(config.purge_artifact_on_reset);
        assert!(config.adapter.is_none());
        let settings = config.service_settings();
        assert_eq!(settings.data_root, PathBuf::from("/home/bee/appmais/bee_tmp"));
        assert_eq!(
            settings.picture_path,
            PathBuf::from("/home/bee/GATT_server/picture.jpg")
        );
    }

    #[test]
    fn service_settings_follow_config() {
        let config = Config {
            mtu: 244,
            artifact_dir: "/var/lib/hive".into(),
            line_advance: LineAdvance::AdvanceThenReturn,
            ..Config::default()
        };
        let settings = config.service_settings();
        assert_eq!(settings.mtu, 244);
        assert_eq!(settings.artifact_dir, PathBuf::from("/var/lib/hive"));
        assert_eq!(settings.line_advance, LineAdvance::AdvanceThenReturn);
        assert_eq!(settings.data_root, config.data_root());
    }

    #[test]
    fn config_partial_toml() {
        let toml_str = r#"
            name = "hive-07"
            line_advance = "advance-then-return"
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.name, "hive-07");
        assert_eq!(config.line_advance, LineAdvance::AdvanceThenReturn);
        assert_eq!(config.mtu, 512);
        assert_eq!(config.ffmpeg, "ffmpeg");
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = Config {
            name: "hive-01".into(),
            adapter: Some("hci1".into()),
            mtu: 244,
            data_root: "~/bee_tmp".into(),
            purge_artifact_on_reset: false,
            ..Config::default()
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.name, "hive-01");
        assert_eq!(parsed.adapter.as_deref(), Some("hci1"));
        assert_eq!(parsed.mtu, 244);
        assert!(!parsed.purge_artifact_on_reset);
        assert!(!parsed.data_root().to_string_lossy().starts_with('~'));
    }

    #[test]
    fn missing_file_writes_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("hivegatt").join("agent.toml");

        let config = Config::load_from(path.clone()).unwrap();
        assert!(path.exists());
        assert_eq!(config.mtu, 512);

        let reloaded = Config::load_from(path).unwrap();
        assert_eq!(reloaded.name, config.name);
    }

    #[test]
    fn config_path_names_the_app() {
        let path = config_path();
        assert!(path.to_string_lossy().ends_with("agent.toml"));
    }
}
