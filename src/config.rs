// Application configuration read from the data directory.
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::DataResult;
use crate::questions::{DEFAULT_DATA_FILE, loader::read_json};
use crate::waypoints::WaypointMapping;

pub const CONFIG_FILE: &str = "appconfig.json";
pub const LEGACY_CONFIG_FILE: &str = "gameconfig.json";

/// Directory holding the config and question files.
#[derive(Resource, Debug, Clone)]
pub struct DataDir(pub PathBuf);

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub language: String,
    pub fallback_language: String,
    /// Base name for the localized question files.
    pub data_file: String,
    /// Seconds a question stays open before it counts as inactivity. Zero
    /// disables the timeout.
    pub max_question_time: f32,
    pub feedback_display_duration: f32,
    /// Seconds the game over screen is held before the session resets.
    pub game_over_hold: f32,
    pub auto_reset_on_sequence_end: bool,
    /// Metres. Zero or less disables the distance check.
    pub max_marker_distance: f32,
    /// Degrees. Zero or less disables the angle check.
    pub max_angle_deviation: f32,
    pub waypoints: Vec<WaypointMapping>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            language: "pt".to_string(),
            fallback_language: "pt".to_string(),
            data_file: DEFAULT_DATA_FILE.to_string(),
            max_question_time: 30.0,
            feedback_display_duration: 2.5,
            game_over_hold: 5.0,
            auto_reset_on_sequence_end: true,
            max_marker_distance: 0.0,
            max_angle_deviation: 0.0,
            waypoints: Vec::new(),
        }
    }
}

impl GameConfig {
    /// Read `appconfig.json`, then `gameconfig.json`. Falls back to defaults
    /// when neither parses.
    pub fn load(data_dir: &Path) -> Self {
        for name in [CONFIG_FILE, LEGACY_CONFIG_FILE] {
            match Self::load_file(&data_dir.join(name)) {
                Ok(config) => {
                    info!(
                        "Loaded {name} with {} waypoint(s).",
                        config.waypoints.len()
                    );
                    return config;
                }
                Err(err) if err.is_not_found() => debug!("{name} not found in {data_dir:?}."),
                Err(err) => error!("Failed to read config: {err}"),
            }
        }

        warn!("No usable config in {data_dir:?}; using defaults.");
        Self::default()
    }

    pub fn load_file(path: &Path) -> DataResult<Self> {
        let mut config: Self = read_json(path)?;
        config.sanitize();
        Ok(config)
    }

    fn sanitize(&mut self) {
        if self.max_question_time.is_nan() || self.max_question_time < 0.0 {
            warn!("max_question_time must be non-negative; using 30s.");
            self.max_question_time = 30.0;
        }
        self.feedback_display_duration = self.feedback_display_duration.max(0.0);
        self.game_over_hold = self.game_over_hold.max(0.0);
        if self.fallback_language.trim().is_empty() {
            self.fallback_language = "pt".to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{"language":"en","waypoints":[{"marker":"casa-1","question_id":1}]}"#,
        )
        .unwrap();

        let config = GameConfig::load(dir.path());

        assert_eq!(config.language, "en");
        assert_eq!(config.fallback_language, "pt");
        assert_eq!(config.max_question_time, 30.0);
        assert!(config.auto_reset_on_sequence_end);
        assert_eq!(config.waypoints, vec![WaypointMapping::new("casa-1", 1)]);
    }

    #[test]
    fn legacy_file_is_used_when_primary_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(LEGACY_CONFIG_FILE),
            r#"{"max_question_time": 12.5}"#,
        )
        .unwrap();

        assert_eq!(GameConfig::load(dir.path()).max_question_time, 12.5);
    }

    #[test]
    fn broken_primary_falls_through_to_legacy() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{").unwrap();
        std::fs::write(dir.path().join(LEGACY_CONFIG_FILE), r#"{"language":"en"}"#).unwrap();

        assert_eq!(GameConfig::load(dir.path()).language, "en");
    }

    #[test]
    fn no_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(GameConfig::load(dir.path()), GameConfig::default());
    }

    #[test]
    fn negative_timings_are_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            r#"{"max_question_time": -1, "feedback_display_duration": -3, "fallback_language": " "}"#,
        )
        .unwrap();

        let config = GameConfig::load_file(&path).unwrap();
        assert_eq!(config.max_question_time, 30.0);
        assert_eq!(config.feedback_display_duration, 0.0);
        assert_eq!(config.fallback_language, "pt");
    }
}
