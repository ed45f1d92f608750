//! Tournament settings and tuning
//!
//! Persisted as JSON next to the binary. Missing or unreadable files fall back
//! to defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{BRACKET_SIZE, SIM_HZ};
use crate::sim::SimParams;

/// Default settings file name
pub const SETTINGS_FILE: &str = "bracket_pong_settings.json";

/// Who moves the paddles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ControlMode {
    /// One local input drives both paddles in every match, whatever the
    /// entrants' `is_automated` flags say
    #[default]
    HotSeat,
    /// Input is ignored and paddles stay put (headless runs)
    Idle,
}

impl ControlMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlMode::HotSeat => "Hot seat",
            ControlMode::Idle => "Idle",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "hotseat" => Some(ControlMode::HotSeat),
            "idle" | "headless" => Some(ControlMode::Idle),
            _ => None,
        }
    }
}

/// One seat in the default roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    pub automated: bool,
}

impl RosterEntry {
    pub fn human(name: &str) -> Self {
        Self {
            name: name.to_string(),
            automated: false,
        }
    }

    pub fn automated(name: &str) -> Self {
        Self {
            name: name.to_string(),
            automated: true,
        }
    }
}

/// Errors reading or writing the settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Tournament settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Simulation ===
    /// Physics and scoring tunables
    pub sim: SimParams,
    /// Fixed updates per second
    pub sim_hz: f32,
    /// Cap on one frame's elapsed time (seconds); unlimited when absent
    pub max_frame_delta: Option<f32>,

    // === Tournament ===
    /// Entrants per bracket (power of two)
    pub bracket_size: usize,
    /// Roster used to seed new brackets and restarts
    pub roster: Vec<RosterEntry>,
    /// Seed for shuffles and serves; random when absent
    pub seed: Option<u64>,

    // === Input ===
    pub control_mode: ControlMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sim: SimParams::default(),
            sim_hz: SIM_HZ,
            max_frame_delta: None,
            bracket_size: BRACKET_SIZE,
            roster: default_roster("Player 1"),
            seed: None,
            control_mode: ControlMode::HotSeat,
        }
    }
}

/// One human seat plus seven automated ones
pub fn default_roster(player_name: &str) -> Vec<RosterEntry> {
    let mut roster = vec![RosterEntry::human(player_name)];
    roster.extend(
        ["Alpha", "Bravo", "Charlie", "Delta", "Echo", "Foxtrot", "Golf"]
            .into_iter()
            .map(RosterEntry::automated),
    );
    roster
}

impl Settings {
    /// Parse settings from JSON, sanitizing tunables
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Fix up out-of-range values, logging what changed
    pub fn sanitize(&mut self) {
        for field in self.sim.sanitize() {
            log::warn!("Invalid sim.{} in settings, using default", field);
        }
        if !(self.sim_hz.is_finite() && self.sim_hz > 0.0) {
            log::warn!("Invalid sim_hz {} in settings, using default", self.sim_hz);
            self.sim_hz = SIM_HZ;
        }
        if self.roster.len() != self.bracket_size {
            log::warn!(
                "Roster has {} entrants but bracket expects {}",
                self.roster.len(),
                self.bracket_size
            );
        }
    }

    /// Fixed step length in seconds
    pub fn step(&self) -> f32 {
        1.0 / self.sim_hz
    }

    /// Set the human seat's display name (first non-automated roster entry)
    pub fn set_player_name(&mut self, name: &str) {
        if let Some(entry) = self.roster.iter_mut().find(|e| !e.automated) {
            entry.name = name.to_string();
        }
    }

    /// Load settings from a file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("{} ({}), using default settings", e, path.display());
                Self::default()
            }
        }
    }

    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Save settings to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roster() {
        let roster = default_roster("Ada");
        assert_eq!(roster.len(), 8);
        assert_eq!(roster[0], RosterEntry::human("Ada"));
        assert!(roster[1..].iter().all(|e| e.automated));
        assert_eq!(roster[7].name, "Golf");
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings::default();
        let json = settings.to_json().unwrap();
        let back = Settings::from_json(&json).unwrap();
        assert_eq!(back.sim, settings.sim);
        assert_eq!(back.roster, settings.roster);
        assert_eq!(back.control_mode, ControlMode::HotSeat);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings =
            Settings::from_json(r#"{"seed": 7, "sim": {"win_score": 3}, "control_mode": "Idle"}"#)
                .unwrap();
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.sim.win_score, 3);
        assert_eq!(settings.sim.paddle_boost, 1.15);
        assert_eq!(settings.control_mode, ControlMode::Idle);
        assert_eq!(settings.bracket_size, 8);
    }

    #[test]
    fn test_bad_values_are_sanitized() {
        let settings = Settings::from_json(r#"{"sim_hz": -5, "sim": {"paddle_boost": 0.5}}"#)
            .unwrap();
        assert_eq!(settings.sim_hz, 60.0);
        assert_eq!(settings.sim.paddle_boost, 1.15);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            Settings::from_json("{not json"),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let settings = Settings::load("/nonexistent/dir/settings.json");
        assert_eq!(settings.bracket_size, 8);
        assert!(settings.seed.is_none());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!(
            "bracket_pong_settings_test_{}.json",
            std::process::id()
        ));
        let mut settings = Settings {
            seed: Some(11),
            ..Default::default()
        };
        settings.set_player_name("Grace");
        settings.save(&path).unwrap();

        let loaded = Settings::try_load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded.seed, Some(11));
        assert_eq!(loaded.roster[0].name, "Grace");
    }

    #[test]
    fn test_control_mode_parse() {
        assert_eq!(ControlMode::from_str("hot-seat"), Some(ControlMode::HotSeat));
        assert_eq!(ControlMode::from_str("Headless"), Some(ControlMode::Idle));
        assert_eq!(ControlMode::from_str("ai"), None);
        assert_eq!(ControlMode::Idle.as_str(), "Idle");
    }
}
