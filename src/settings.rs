//! Game settings and preferences
//!
//! Persisted as `settings.json`. Loading overlays whatever valid keys are on
//! disk onto the defaults, so older or hand-edited files keep working.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consts::SETTINGS_KEY;
use crate::error::StoreError;
use crate::persistence::{self, Storage};
use crate::round3;

/// Difficulty levels (scale circle speed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Next level in the Easy → Normal → Hard → Easy cycle
    pub fn next(&self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Normal,
            Difficulty::Normal => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    /// Multiplier applied to the base circle speed
    pub fn speed_multiplier(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.75,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.25,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Name recorded with every run and drawn above the player
    pub last_name: String,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub fullscreen: bool,
    pub difficulty: Difficulty,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            last_name: "Player".to_string(),
            master_volume: 0.8,
            sfx_volume: 0.9,
            fullscreen: false,
            difficulty: Difficulty::Normal,
        }
    }
}

impl Settings {
    /// Build settings from a parsed JSON document.
    ///
    /// Returns `None` when the document is not an object. Keys that are
    /// missing or hold the wrong type keep their default.
    pub fn from_json(doc: &Value) -> Option<Self> {
        let map = doc.as_object()?;
        let mut settings = Self::default();

        if let Some(name) = map.get("last_name").and_then(Value::as_str) {
            settings.last_name = name.to_string();
        }
        if let Some(v) = map.get("master_volume").and_then(Value::as_f64) {
            settings.master_volume = (v as f32).clamp(0.0, 1.0);
        }
        if let Some(v) = map.get("sfx_volume").and_then(Value::as_f64) {
            settings.sfx_volume = (v as f32).clamp(0.0, 1.0);
        }
        if let Some(full) = map.get("fullscreen").and_then(Value::as_bool) {
            settings.fullscreen = full;
        }
        if let Some(d) = map
            .get("difficulty")
            .and_then(Value::as_str)
            .and_then(Difficulty::parse)
        {
            settings.difficulty = d;
        }

        Some(settings)
    }

    /// Load settings, falling back to defaults on any read or parse failure
    pub fn load(storage: &dyn Storage) -> Self {
        let raw = match storage.read(SETTINGS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log::info!("No settings found, using defaults");
                return Self::default();
            }
            Err(e) => {
                log::warn!("Could not read settings ({}), using defaults", e);
                return Self::default();
            }
        };

        let parsed = serde_json::from_str::<Value>(&raw)
            .ok()
            .and_then(|doc| Self::from_json(&doc));
        match parsed {
            Some(settings) => {
                log::info!("Loaded settings");
                settings
            }
            None => {
                log::warn!("Settings file is malformed, using defaults");
                Self::default()
            }
        }
    }

    /// Write the full settings document
    pub fn save(&self, storage: &dyn Storage) -> Result<(), StoreError> {
        persistence::write_json(storage, SETTINGS_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Set master volume, clamped to [0, 1] and rounded to 3 decimals
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = round3(vol.clamp(0.0, 1.0));
    }

    /// Set SFX volume, clamped to [0, 1] and rounded to 3 decimals
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = round3(vol.clamp(0.0, 1.0));
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
    }

    pub fn cycle_difficulty(&mut self) {
        self.difficulty = self.difficulty.next();
    }

    pub fn reset_to_defaults(&mut self) {
        *self = Self::default();
    }

    /// Gain applied to sound effects (master * sfx)
    pub fn effective_sfx_volume(&self) -> f32 {
        crate::audio::effective_volume(self.master_volume, self.sfx_volume)
    }
}
