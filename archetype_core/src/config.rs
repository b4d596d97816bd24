use serde::Deserialize;
use types_core::{AttackDefinition, BaseStats};

/// TOML configuration for an archetype file
///
/// ```toml
/// [archetype]
/// id = "duelist"
/// combo_reset = 0.8
///
/// [stats]
/// max_health = 120
/// strength = 10
///
/// [[combo]]
/// name = "slash_1"
/// range = 2.0
/// angle_or_width = 90
///
/// [[skills]]
/// name = "gap_closer"
/// shape = "line"
/// range = 6.0
/// angle_or_width = 1.5
/// linked_buff = "strife"
/// cooldown = 4.0
/// ```
#[derive(Debug, Deserialize)]
pub struct ArchetypeFileConfig {
    pub archetype: ArchetypeConfig,
    #[serde(default)]
    pub stats: BaseStats,
    #[serde(default)]
    pub combo: Vec<AttackDefinition>,
    #[serde(default)]
    pub skills: Vec<AttackDefinition>,
}

/// Header of an archetype file
#[derive(Debug, Deserialize)]
pub struct ArchetypeConfig {
    pub id: String,
    /// Seconds of idle before the combo restarts; the game default when absent
    #[serde(default)]
    pub combo_reset: Option<f64>,
}
