//! Host settings
//!
//! Display size, seeding, frame pacing and audio levels. Read from a JSON file;
//! every field is optional and falls back to its default.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::sim::{FieldGeometry, SimError};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Display ===
    /// Display surface width; the field uses all of it
    pub display_width: i32,
    /// Display surface height, including the HUD strip
    pub display_height: i32,

    // === Simulation ===
    /// Fixed RNG seed; `None` seeds from the OS
    pub seed: Option<u64>,
    /// Host frames per second
    pub frame_rate: u32,
    /// Frames the headless demo runs before exiting
    pub max_frames: u32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display_width: 400,
            display_height: 664,

            seed: None,
            frame_rate: 60,
            max_frames: 60 * 60 * 5,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Load settings from `path`. A missing file means defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::warn!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let json = fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        let settings = Self::from_json(&json)
            .with_context(|| format!("parsing settings in {}", path.display()))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("serializing settings")?;
        fs::write(path, json).with_context(|| format!("writing settings to {}", path.display()))?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Playing field for the configured display
    pub fn field(&self) -> Result<FieldGeometry, SimError> {
        FieldGeometry::from_display(self.display_width, self.display_height)
    }

    /// Seconds per host frame
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.frame_rate.max(1) as f32
    }
}
