//! Session settings
//!
//! Timing of the signal state machine, the per-length signal table and where
//! to find the actuator. Stored as JSON next to the puzzles.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::haptics::{Signal, SignalTable, Timing};

/// Timing presets for the grace window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TimingPreset {
    /// Collisions are felt from the very first frame
    Immediate,
    /// The grabbed rod's signal plays for a few frames even while touching
    #[default]
    Forgiving,
}

impl TimingPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimingPreset::Immediate => "Immediate",
            TimingPreset::Forgiving => "Forgiving",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "immediate" => Some(TimingPreset::Immediate),
            "forgiving" => Some(TimingPreset::Forgiving),
            _ => None,
        }
    }

    pub fn grace_period(&self) -> u32 {
        match self {
            TimingPreset::Immediate => 0,
            TimingPreset::Forgiving => DEFAULT_GRACE_PERIOD,
        }
    }

    pub fn impulse_duration(&self) -> u32 {
        DEFAULT_IMPULSE_DURATION
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// Session settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Timing (frames) ===
    /// Frames after grabbing during which the rod's own signal plays even while colliding
    pub grace_period: u32,
    /// Frames the collision impulse lasts
    pub impulse_duration: u32,

    // === Device ===
    /// Serial device node of the actuator; `None` runs without haptics
    pub device_path: Option<PathBuf>,
    /// Pointer pixels/frame to device speed units
    pub speed_scale: f32,

    // === Signals ===
    /// Signal for each rod length
    pub signals: SignalTable,
    /// Signal played when a collision outlasts the grace period
    pub impulse: Signal,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grace_period: DEFAULT_GRACE_PERIOD,
            impulse_duration: DEFAULT_IMPULSE_DURATION,

            device_path: Some(PathBuf::from(DEFAULT_DEVICE_PATH)),
            speed_scale: 1.0,

            signals: SignalTable::default(),
            impulse: Signal::IMPULSE,
        }
    }
}

impl Settings {
    /// Apply a timing preset (overwrites both timing fields)
    pub fn apply_preset(&mut self, preset: TimingPreset) {
        self.grace_period = preset.grace_period();
        self.impulse_duration = preset.impulse_duration();
    }

    pub fn timing(&self) -> Timing {
        Timing {
            grace_period: self.grace_period,
            impulse_duration: self.impulse_duration,
        }
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults if the file is missing or invalid
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{} - using default settings", e);
                Self::default()
            }
        }
    }

    /// Save settings as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
