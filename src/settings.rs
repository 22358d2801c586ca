//! Viewer settings with persistence
//!
//! Settings are saved to `~/.config/ssgl/settings.toml`

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use ssgl_core::TimeConfig;
use ssgl_game::CameraConfig;
use tracing::{info, warn};

/// All viewer settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub video: VideoSettings,
    pub camera: CameraConfig,
    pub time: TimeConfig,
}

impl GameSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ssgl"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load settings from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<Self>(&content) {
                Ok(settings) => {
                    if let Err(e) = settings.camera.validate() {
                        warn!("Invalid camera settings: {}, using defaults", e);
                        return Self::default();
                    }
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let Some(path) = Self::settings_path() else {
            anyhow::bail!("Could not determine config directory");
        };
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save settings to a specific file, creating parent directories
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create {:?}", dir))?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }
}

/// Video/window settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoSettings {
    /// Initial window width
    pub width: u32,
    /// Initial window height
    pub height: u32,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl VideoSettings {
    /// Get resolution as a tuple
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_settings_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("ssgl-settings-test-{}-{}", std::process::id(), name))
            .join("settings.toml")
    }

    #[test]
    fn test_round_trip_through_file() {
        let path = temp_settings_path("round-trip");
        let mut settings = GameSettings::default();
        settings.video.width = 800;
        settings.camera.move_speed = 42.0;
        settings.time.pause_on_unfocus = false;

        settings.save_to(&path).unwrap();
        let loaded = GameSettings::load_from(&path);

        assert_eq!(loaded.video.resolution(), (800, 720));
        assert_eq!(loaded.camera, settings.camera);
        assert!(!loaded.time.pause_on_unfocus);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = temp_settings_path("missing");
        let loaded = GameSettings::load_from(&path);
        assert_eq!(loaded.camera, CameraConfig::default());
        assert_eq!(loaded.video.resolution(), (1280, 720));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: GameSettings = toml::from_str("[camera]\nzoom_floor = 10.0\n").unwrap();
        assert_eq!(settings.camera.zoom_floor, 10.0);
        assert_eq!(settings.camera.zoom_ceiling, 200.0);
        assert_eq!(settings.video.width, 1280);
    }

    #[test]
    fn test_invalid_camera_falls_back() {
        let path = temp_settings_path("invalid");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[camera]\nnear = 10.0\nfar = 1.0\n").unwrap();

        let loaded = GameSettings::load_from(&path);
        assert_eq!(loaded.camera, CameraConfig::default());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
