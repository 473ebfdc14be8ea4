//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{TouchFabricError, TouchFabricResult};

/// Global application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Where touch batches are sent.
    pub network: NetworkConfig,

    /// Tracker calibration pushed every frame.
    pub calibration: CalibrationSettings,

    /// Active area file and interaction modes.
    pub area: AreaConfig,

    /// Frame loop parameters.
    pub frames: FrameLoopConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// OSC destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Listener host name or IP.
    pub host: String,

    /// Listener UDP port.
    pub port: u16,

    /// OSC address every batch is sent to.
    pub address: String,
}

/// Depth tracker calibration.
///
/// The tracked depth window is `[distance, distance + bandwidth]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationSettings {
    /// Depth window thickness.
    pub bandwidth: f64,

    /// Near edge of the depth window.
    pub distance: f64,

    /// Foreground threshold.
    pub threshold: f64,

    /// Blur kernel size. Zero disables blurring.
    pub blur: u32,

    /// Smallest blob area (pixels) the tracker reports.
    pub min_blob_size: f64,
}

/// Active area persistence and interaction flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaConfig {
    /// Path of the active area vertex file.
    pub file: PathBuf,

    /// Pointer presses append vertices to the area.
    pub edit_mode: bool,

    /// Touches are filtered, normalized and sent.
    pub play_mode: bool,

    /// Report x as-is instead of mirrored.
    pub flip_x: bool,

    /// Report y as-is instead of mirrored.
    pub flip_y: bool,
}

/// Frame loop parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameLoopConfig {
    /// Target frame rate.
    pub fps: u32,

    /// Frames to wait before the one-time background snapshot.
    pub warmup_frames: u64,

    /// Maximum touches per network message.
    pub batch_size: usize,

    /// Tracker frame size in pixels.
    pub frame_width: u32,
    pub frame_height: u32,

    /// Window size used to map pointer presses into the tracker frame.
    pub window_width: u32,
    pub window_height: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "touchfabric=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3333,
            address: "/touches".to_string(),
        }
    }
}

impl Default for CalibrationSettings {
    fn default() -> Self {
        Self {
            bandwidth: 5.0,
            distance: 80.0,
            threshold: 5.0,
            blur: 9,
            min_blob_size: 100.0,
        }
    }
}

impl Default for AreaConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("activeArea.json"),
            edit_mode: false,
            play_mode: true,
            flip_x: false,
            flip_y: false,
        }
    }
}

impl Default for FrameLoopConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            warmup_frames: 60,
            batch_size: 5,
            frame_width: 640,
            frame_height: 480,
            window_width: 1024,
            window_height: 768,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl CalibrationSettings {
    /// Blur kernel actually applied: even sizes are bumped to the next odd value.
    pub fn odd_blur(&self) -> u32 {
        if self.blur % 2 == 0 {
            self.blur + 1
        } else {
            self.blur
        }
    }

    /// Near and far depth limits.
    pub fn depth_window(&self) -> (f64, f64) {
        (self.distance, self.distance + self.bandwidth)
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from `path`, falling back to defaults when the file is
    /// missing or malformed.
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", path, e);
                }
            }
        }
        Self::default()
    }

    /// Reject values the frame loop cannot run with.
    pub fn validate(&self) -> TouchFabricResult<()> {
        if self.frames.fps == 0 {
            return Err(TouchFabricError::config("frames.fps must be at least 1"));
        }
        if self.frames.batch_size == 0 {
            return Err(TouchFabricError::config("frames.batch_size must be at least 1"));
        }
        if !self.network.address.starts_with('/') {
            return Err(TouchFabricError::config(format!(
                "network.address must start with '/': {:?}",
                self.network.address
            )));
        }
        if self.network.host.trim().is_empty() {
            return Err(TouchFabricError::config("network.host is empty"));
        }
        Ok(())
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(&config_file_path())
    }

    /// Save config to `path` as pretty JSON.
    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("touchfabric").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_controls() {
        let config = AppConfig::default();
        assert_eq!(config.network.port, 3333);
        assert_eq!(config.network.address, "/touches");
        assert_eq!(config.calibration.blur, 9);
        assert!(config.area.play_mode);
        assert!(!config.area.edit_mode);
        assert_eq!(config.frames.batch_size, 5);
        assert_eq!(config.frames.warmup_frames, 60);
    }

    #[test]
    fn test_validate_rejects_unusable_values() {
        assert!(AppConfig::default().validate().is_ok());

        let mut config = AppConfig::default();
        config.frames.fps = 0;
        assert!(matches!(
            config.validate(),
            Err(TouchFabricError::Config { .. })
        ));

        let mut config = AppConfig::default();
        config.frames.batch_size = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.network.address = "touches".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("network.address"));

        let mut config = AppConfig::default();
        config.network.host = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_odd_blur() {
        let mut cal = CalibrationSettings::default();
        cal.blur = 4;
        assert_eq!(cal.odd_blur(), 5);
        cal.blur = 7;
        assert_eq!(cal.odd_blur(), 7);
        cal.blur = 0;
        assert_eq!(cal.odd_blur(), 1);
    }

    #[test]
    fn test_depth_window() {
        let cal = CalibrationSettings {
            bandwidth: 12.0,
            distance: 70.0,
            ..CalibrationSettings::default()
        };
        assert_eq!(cal.depth_window(), (70.0, 82.0));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: AppConfig =
            serde_json::from_str(r#"{"network":{"port":9000},"area":{"flip_x":true}}"#).unwrap();
        assert_eq!(parsed.network.port, 9000);
        assert_eq!(parsed.network.host, "127.0.0.1");
        assert!(parsed.area.flip_x);
        assert!(parsed.area.play_mode);
        assert_eq!(parsed.calibration, CalibrationSettings::default());
    }

    #[test]
    fn test_load_from_malformed_falls_back_to_defaults() {
        let dir = std::env::temp_dir().join("touchfabric_test_config_malformed");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert_eq!(AppConfig::load_from(&path), AppConfig::default());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = std::env::temp_dir().join("touchfabric_test_config_roundtrip");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("nested").join("config.json");

        let mut config = AppConfig::default();
        config.network.host = "10.0.0.5".to_string();
        config.calibration.threshold = 11.0;
        config.save_to(&path).unwrap();

        assert_eq!(AppConfig::load_from(&path), config);

        std::fs::remove_dir_all(&dir).ok();
    }
}
