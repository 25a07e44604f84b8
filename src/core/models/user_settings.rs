use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::core::models::CaptureMode;
use crate::global_constants;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ThemeMode {
    Dark,
    Light,
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeMode::Dark => write!(f, "Dark"),
            ThemeMode::Light => write!(f, "Light"),
        }
    }
}

impl Default for ThemeMode {
    fn default() -> Self {
        ThemeMode::Dark
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSettings {
    #[serde(default)]
    pub capture_mode: CaptureMode,
    #[serde(default)]
    pub capture_delay_seconds: u32,
    #[serde(default)]
    pub capture_cursor: bool,
    #[serde(default = "default_snipping_frame_color")]
    pub snipping_frame_color: String,
    #[serde(default)]
    pub save_directory: Option<PathBuf>,
    #[serde(default = "default_filename_pattern")]
    pub filename_pattern: String,
    #[serde(default)]
    pub theme_mode: ThemeMode,
    #[serde(default)]
    pub run_in_system_tray: bool,
}

fn default_snipping_frame_color() -> String {
    global_constants::DEFAULT_SNIPPING_FRAME_COLOR.to_string()
}

fn default_filename_pattern() -> String {
    global_constants::DEFAULT_FILENAME_PATTERN.to_string()
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            capture_mode: CaptureMode::default(),
            capture_delay_seconds: 0,
            capture_cursor: false,
            snipping_frame_color: default_snipping_frame_color(),
            save_directory: None,
            filename_pattern: default_filename_pattern(),
            theme_mode: ThemeMode::default(),
            run_in_system_tray: false,
        }
    }
}

impl UserSettings {
    pub fn load() -> anyhow::Result<Self> {
        let settings_path = Self::get_settings_file_path()?;

        if !settings_path.exists() {
            log::info!("[SETTINGS] No settings file found, using defaults");
            return Ok(Self::default());
        }

        let settings = Self::load_from_path(&settings_path)?;

        log::info!("[SETTINGS] Loaded settings from {:?}", settings_path);
        log::debug!(
            "[SETTINGS] Capture mode: {}, delay: {}s, cursor: {}",
            settings.capture_mode,
            settings.capture_delay_seconds,
            settings.capture_cursor
        );

        Ok(settings)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let settings_path = Self::get_settings_file_path()?;
        self.save_to_path(&settings_path)?;

        log::info!("[SETTINGS] Saved settings to {:?}", settings_path);
        Ok(())
    }

    fn load_from_path(settings_path: &std::path::Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(settings_path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn save_to_path(&self, settings_path: &std::path::Path) -> anyhow::Result<()> {
        if let Some(parent) = settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(settings_path, contents)?;
        Ok(())
    }

    pub fn capture_delay_ms(&self) -> i64 {
        i64::from(self.capture_delay_seconds) * 1000
    }

    /// Directory screenshots are written to when no explicit path is given.
    pub fn resolve_save_directory(&self) -> PathBuf {
        if let Some(directory) = &self.save_directory {
            return directory.clone();
        }

        dirs::picture_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join("Pictures")))
            .unwrap_or_else(std::env::temp_dir)
    }

    fn get_settings_file_path() -> anyhow::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join(global_constants::SETTINGS_DIRECTORY_NAME);

        Ok(config_dir.join(global_constants::SETTINGS_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_mode_default_is_dark() {
        assert_eq!(ThemeMode::default(), ThemeMode::Dark);
    }

    #[test]
    fn test_user_settings_default_values() {
        let settings = UserSettings::default();

        assert_eq!(settings.capture_mode, CaptureMode::RectArea);
        assert_eq!(settings.capture_delay_seconds, 0);
        assert!(!settings.capture_cursor);
        assert_eq!(
            settings.snipping_frame_color,
            global_constants::DEFAULT_SNIPPING_FRAME_COLOR
        );
        assert_eq!(
            settings.filename_pattern,
            global_constants::DEFAULT_FILENAME_PATTERN
        );
        assert!(settings.save_directory.is_none());
        assert!(!settings.run_in_system_tray);
    }

    #[test]
    fn test_capture_delay_ms_converts_seconds() {
        let settings = UserSettings {
            capture_delay_seconds: 3,
            ..UserSettings::default()
        };

        assert_eq!(settings.capture_delay_ms(), 3000);
    }

    #[test]
    fn test_deserialization_fills_missing_fields_with_defaults() {
        let json = r#"{ "capture_mode": "active-window", "capture_cursor": true }"#;

        let settings: UserSettings = serde_json::from_str(json).unwrap();

        assert_eq!(settings.capture_mode, CaptureMode::ActiveWindow);
        assert!(settings.capture_cursor);
        assert_eq!(settings.capture_delay_seconds, 0);
        assert_eq!(
            settings.snipping_frame_color,
            global_constants::DEFAULT_SNIPPING_FRAME_COLOR
        );
        assert_eq!(settings.theme_mode, ThemeMode::Dark);
    }

    #[test]
    fn test_resolve_save_directory_prefers_configured_directory() {
        let settings = UserSettings {
            save_directory: Some(PathBuf::from("/tmp/shots")),
            ..UserSettings::default()
        };

        assert_eq!(settings.resolve_save_directory(), PathBuf::from("/tmp/shots"));
    }

    #[test]
    fn test_user_settings_save_and_load_roundtrip() {
        let temp_dir = std::env::temp_dir().join("snipgrab-settings-test");
        let settings_path = temp_dir.join("settings.json");

        let original_settings = UserSettings {
            capture_mode: CaptureMode::CurrentScreen,
            capture_delay_seconds: 5,
            capture_cursor: true,
            snipping_frame_color: "#ff8800".to_string(),
            save_directory: Some(PathBuf::from("/tmp/shots")),
            filename_pattern: "shot_%H%M.png".to_string(),
            theme_mode: ThemeMode::Light,
            run_in_system_tray: true,
        };

        original_settings.save_to_path(&settings_path).unwrap();
        let loaded_settings = UserSettings::load_from_path(&settings_path).unwrap();

        assert_eq!(loaded_settings, original_settings);

        std::fs::remove_dir_all(&temp_dir).ok();
    }
}
