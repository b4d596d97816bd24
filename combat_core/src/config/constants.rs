//! Game constants configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::ConfigError;

/// Tunable combat constants
///
/// Passed to `CombatWorld::new`; every section falls back to its defaults
/// when absent from the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameConstants {
    #[serde(default)]
    pub crit: CritConstants,
    #[serde(default)]
    pub strife: StrifeConstants,
    #[serde(default)]
    pub lunge: LungeConstants,
    #[serde(default)]
    pub combo: ComboConstants,
    #[serde(default)]
    pub playback: PlaybackConstants,
}

impl GameConstants {
    /// Load constants from a TOML file
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let constants: GameConstants = super::load_toml(path)?;
        constants.validate()?;
        Ok(constants)
    }

    /// Parse constants from a TOML string
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        let constants: GameConstants = super::parse_toml(toml)?;
        constants.validate()?;
        Ok(constants)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.crit.rate_cap <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "crit.rate_cap must be positive, got {}",
                self.crit.rate_cap
            )));
        }
        if self.strife.max_stacks == 0 {
            return Err(ConfigError::ValidationError(
                "strife.max_stacks must be at least 1".to_string(),
            ));
        }
        if self.strife.move_speed_per_stack < 0.0 || self.strife.pierce_per_stack < 0.0 {
            return Err(ConfigError::ValidationError(
                "strife per-stack bonuses cannot be negative".to_string(),
            ));
        }
        if self.lunge.fallback_speed <= self.lunge.min_speed {
            return Err(ConfigError::ValidationError(format!(
                "lunge.fallback_speed ({}) must exceed lunge.min_speed ({})",
                self.lunge.fallback_speed, self.lunge.min_speed
            )));
        }
        if self.combo.reset_after < 0.0 {
            return Err(ConfigError::ValidationError(
                "combo.reset_after cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CritConstants {
    /// Crit chance above this cap converts 1:1 into bonus crit damage
    #[serde(default = "default_rate_cap")]
    pub rate_cap: f64,
}

impl Default for CritConstants {
    fn default() -> Self {
        CritConstants {
            rate_cap: default_rate_cap(),
        }
    }
}

fn default_rate_cap() -> f64 {
    100.0
}

/// Kill-chain stacking buff tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrifeConstants {
    #[serde(default = "default_max_stacks")]
    pub max_stacks: u32,
    /// Fraction of current move speed granted per stack
    #[serde(default = "default_move_speed_per_stack")]
    pub move_speed_per_stack: f64,
    /// Fraction of current pierce attack granted per stack
    #[serde(default = "default_pierce_per_stack")]
    pub pierce_per_stack: f64,
}

impl Default for StrifeConstants {
    fn default() -> Self {
        StrifeConstants {
            max_stacks: default_max_stacks(),
            move_speed_per_stack: default_move_speed_per_stack(),
            pierce_per_stack: default_pierce_per_stack(),
        }
    }
}

fn default_max_stacks() -> u32 {
    4
}
fn default_move_speed_per_stack() -> f64 {
    0.04
}
fn default_pierce_per_stack() -> f64 {
    0.08
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LungeConstants {
    /// Dash speed used when the entity's own is at or below `min_speed`
    #[serde(default = "default_fallback_speed")]
    pub fallback_speed: f64,
    #[serde(default = "default_min_speed")]
    pub min_speed: f64,
}

impl Default for LungeConstants {
    fn default() -> Self {
        LungeConstants {
            fallback_speed: default_fallback_speed(),
            min_speed: default_min_speed(),
        }
    }
}

fn default_fallback_speed() -> f64 {
    20.0
}
fn default_min_speed() -> f64 {
    0.1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboConstants {
    /// Seconds without input after which the combo restarts at its first step
    #[serde(default = "default_reset_after")]
    pub reset_after: f64,
}

impl Default for ComboConstants {
    fn default() -> Self {
        ComboConstants {
            reset_after: default_reset_after(),
        }
    }
}

fn default_reset_after() -> f64 {
    1.0
}

/// Stat-driven animation rate limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConstants {
    /// Stats at or below this do not drive playback
    #[serde(default = "default_min_rate")]
    pub min_rate: f64,
    /// Rate used when neither stat nor clip gives a usable one
    #[serde(default = "default_fallback_rate")]
    pub fallback_rate: f64,
}

impl Default for PlaybackConstants {
    fn default() -> Self {
        PlaybackConstants {
            min_rate: default_min_rate(),
            fallback_rate: default_fallback_rate(),
        }
    }
}

fn default_min_rate() -> f64 {
    0.1
}
fn default_fallback_rate() -> f64 {
    1.0
}
