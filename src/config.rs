use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::AppError;

/// Name of the single storage slot holding the song collection.
pub const STORAGE_KEY: &str = "piano_progress_tracker_v1";
pub const MAX_SLOTS: u8 = 10;
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);
pub const SETTINGS_FILE: &str = "settings.json";

pub fn get_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pianotrack")
}

pub fn get_settings_file_path() -> PathBuf {
    get_config_dir().join(SETTINGS_FILE)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Locale used for weekday and month names in date headers (e.g. "en_US", "fr_FR").
    pub locale: String,
    pub tones_enabled: bool,
    /// Master gain applied on top of each tone's envelope, 0.0..=1.0.
    pub tone_volume: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            locale: "en_US".to_string(),
            tones_enabled: true,
            tone_volume: 1.0,
        }
    }
}

impl TrackerConfig {
    /// Loads settings from the user's config directory, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&get_settings_file_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("[Config] No settings at {:?}, using defaults", path);
            return Self::default();
        }

        match Self::read(path) {
            Ok(config) => {
                log::info!("[Config] Loaded settings from {:?}", path);
                config.normalized()
            }
            Err(e) => {
                log::warn!("[Config] Ignoring settings at {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| AppError::Config(e.to_string()))
    }

    fn normalized(mut self) -> Self {
        if !self.tone_volume.is_finite() {
            self.tone_volume = 1.0;
        }
        self.tone_volume = self.tone_volume.clamp(0.0, 1.0);
        if chrono::Locale::try_from(self.locale.as_str()).is_err() {
            log::warn!("[Config] Unknown locale '{}', using en_US", self.locale);
            self.locale = "en_US".to_string();
        }
        self
    }

    pub fn chrono_locale(&self) -> chrono::Locale {
        chrono::Locale::try_from(self.locale.as_str()).unwrap_or(chrono::Locale::en_US)
    }
}
