//! Persistent settings for game initialization
//!
//! Saves and loads user preferences (player name, starting mode, database
//! locations) to/from an init_settings.json file in the config directory.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::modes::GameModeKind;

/// Path to the settings file
pub const SETTINGS_FILE: &str = "config/init_settings.json";

/// Persistent settings that survive between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitSettings {
    /// Name recorded with leaderboard entries
    pub player_name: String,
    /// Mode selected on launch
    pub start_mode: GameModeKind,
    /// SQLite file for the high-score table
    pub leaderboard_db: String,
    /// SQLite file for the event log
    pub event_log_db: String,
    pub event_log_enabled: bool,
}

impl Default for InitSettings {
    fn default() -> Self {
        Self {
            player_name: "Player".to_string(),
            start_mode: GameModeKind::FreeShoot,
            leaderboard_db: "db/leaderboard.db".to_string(),
            event_log_db: "db/events.db".to_string(),
            event_log_enabled: true,
        }
    }
}

impl InitSettings {
    /// Load settings from file, or return defaults if file doesn't exist
    pub fn load() -> Self {
        Self::load_from(Path::new(SETTINGS_FILE))
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No {} found, using defaults", path.display());
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings to file
    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(Path::new(SETTINGS_FILE))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, json)?;
        info!("Saved settings to {}", path.display());
        Ok(())
    }
}

/// Resource tracking the current init settings
#[derive(Resource, Default)]
pub struct CurrentSettings {
    pub settings: InitSettings,
    pub dirty: bool,
}

impl CurrentSettings {
    pub fn loaded() -> Self {
        Self {
            settings: InitSettings::load(),
            dirty: false,
        }
    }

    /// Mark settings as changed (will be saved on next update)
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Save if dirty
    pub fn save_if_dirty(&mut self) {
        if self.dirty {
            if let Err(e) = self.settings.save() {
                warn!("Failed to save settings: {}", e);
            }
            self.dirty = false;
        }
    }
}

/// Remember the last started mode as the next launch default
pub fn remember_start_mode(
    mode: Res<crate::modes::ModeController>,
    mut settings: ResMut<CurrentSettings>,
) {
    if !mode.is_changed() {
        return;
    }
    let kind = mode.kind();
    if settings.settings.start_mode != kind {
        settings.settings.start_mode = kind;
        settings.mark_dirty();
    }
}

/// System to save settings periodically when changed
pub fn save_settings_system(mut settings: ResMut<CurrentSettings>) {
    settings.save_if_dirty();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: InitSettings =
            serde_json::from_str(r#"{ "player_name": "Ana", "start_mode": "ShotLimit" }"#).unwrap();
        assert_eq!(settings.player_name, "Ana");
        assert_eq!(settings.start_mode, GameModeKind::ShotLimit);
        assert!(settings.event_log_enabled);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let settings = InitSettings::load_from(Path::new("config/not_a_settings_file.json"));
        assert_eq!(settings, InitSettings::default());
    }
}
