//! Game configuration (input feel, movement tuning, shift ability). Loaded
//! from config.ron at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors from the strict config loader.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Persistent game settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Mouse sensitivity; the controller applies sensitivity / 10 to raw
    /// look deltas.
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
    /// Movement tuning.
    #[serde(default)]
    pub movement: MovementTuning,
    /// Shift ability tuning.
    #[serde(default)]
    pub shift: ShiftTuning,
}

fn default_sensitivity() -> f32 {
    5.0
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            sensitivity: default_sensitivity(),
            movement: MovementTuning::default(),
            shift: ShiftTuning::default(),
        }
    }
}

/// Movement state machine tuning. Distances are centimeters, speeds are
/// configured in meters per second and scaled by 100 at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    /// Base walk speed in m/s.
    pub move_meters_per_sec: f32,
    /// Sprint bonus as a percentage of base speed.
    pub sprint_multiplier_pct: f32,
    /// Exponential blend rate for crouch height changes.
    pub crouch_smooth: f32,
    /// Forward speed added on slide entry, in m/s.
    pub slide_boost: f32,
    /// Slide deceleration in cm/s².
    pub slide_decay: f32,
    /// Sprint acts as a toggle instead of hold.
    pub sprint_toggle: bool,
    /// Crouch acts as a toggle instead of hold.
    pub crouch_toggle: bool,
    /// Capsule radius in cm.
    pub capsule_radius: f32,
    /// Standing capsule half-height in cm.
    pub standing_half_height: f32,
    /// Crouched capsule half-height in cm.
    pub crouched_half_height: f32,
    /// Eye height above the capsule center in cm.
    pub eye_height: f32,
    /// Vertical jump speed in cm/s.
    pub jump_speed: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            move_meters_per_sec: 6.0,
            sprint_multiplier_pct: 60.0,
            crouch_smooth: 8.0,
            slide_boost: 7.5,
            slide_decay: 400.0,
            sprint_toggle: false,
            crouch_toggle: false,
            capsule_radius: 34.0,
            standing_half_height: 88.0,
            crouched_half_height: 40.0,
            eye_height: 64.0,
            jump_speed: 420.0,
        }
    }
}

/// Shift ability tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShiftTuning {
    /// Forward probe length in cm.
    pub probe_distance: f32,
    /// Offset for the unvalidated forward retarget, in cm.
    pub retarget_offset: f32,
    /// Shift travel time in seconds.
    pub duration: f32,
    /// Field of view at the height of the shift, degrees.
    pub fov_peak: f32,
    /// Resource cost per shift.
    pub cost: f32,
    /// Resource regeneration in points per second.
    pub recharge_rate: f32,
    /// Seconds after a shift before the ability can be primed again.
    pub cooldown_ability_delay: f32,
    /// Seconds after a shift before the resource pool regenerates.
    pub cooldown_recharge_delay: f32,
}

impl Default for ShiftTuning {
    fn default() -> Self {
        Self {
            probe_distance: 800.0,
            retarget_offset: 400.0,
            duration: 0.25,
            fov_peak: 170.0,
            cost: 25.0,
            recharge_rate: 10.0,
            cooldown_ability_delay: 0.75,
            cooldown_recharge_delay: 4.0,
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid,
    /// returns default config.
    pub fn load() -> Self {
        let path = config_path();
        match Self::load_from(&path) {
            Ok(c) => c,
            Err(ConfigError::Io(_)) => Self::default(),
            Err(e) => {
                log::warn!("Invalid config at {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    /// Load config from an explicit path, surfacing errors.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        Ok(ron::from_str(&data)?)
    }

    /// Save current config to `config.ron`. Logs on error.
    pub fn save(&self) {
        let path = config_path();
        if let Ok(s) = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            if let Err(e) = std::fs::write(&path, s) {
                log::warn!("Could not write config to {:?}: {}", path, e);
            }
        }
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}
