use crate::config::ArchetypeFileConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use types_core::{AttackDefinition, AttackShape, BaseStats};

/// A combatant template: base stats plus its combo chain and skill slots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Archetype {
    pub id: String,
    pub stats: BaseStats,
    pub combo: Vec<AttackDefinition>,
    pub skills: Vec<AttackDefinition>,
    /// Idle seconds before the combo restarts, `None` for the game default
    pub combo_reset: Option<f64>,
}

/// Reason an archetype definition was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArchetypeError {
    #[error("Archetype id is empty")]
    EmptyId,
    #[error("combo_reset cannot be negative: {0}")]
    NegativeComboReset(f64),
    #[error("scaling_factor cannot be negative: {0}")]
    NegativeScalingFactor(f64),
    #[error("Attack has no name")]
    UnnamedAttack,
    #[error("Attack '{name}' has invalid range {range}")]
    InvalidRange { name: String, range: f32 },
    #[error("Cone attack '{name}' needs an angle in (0, 360], got {angle}")]
    InvalidAngle { name: String, angle: f32 },
    #[error("Line attack '{name}' needs a positive width, got {width}")]
    InvalidWidth { name: String, width: f32 },
    #[error("Attack '{name}' has negative cooldown {cooldown}")]
    NegativeCooldown { name: String, cooldown: f64 },
}

impl Archetype {
    /// Build and validate an archetype from its file config
    pub fn from_config(config: ArchetypeFileConfig) -> Result<Self, ArchetypeError> {
        let archetype = Archetype {
            id: config.archetype.id,
            stats: config.stats,
            combo: config.combo,
            skills: config.skills,
            combo_reset: config.archetype.combo_reset,
        };
        archetype.validate()?;
        Ok(archetype)
    }

    pub fn validate(&self) -> Result<(), ArchetypeError> {
        if self.id.trim().is_empty() {
            return Err(ArchetypeError::EmptyId);
        }
        if let Some(reset) = self.combo_reset {
            if reset < 0.0 {
                return Err(ArchetypeError::NegativeComboReset(reset));
            }
        }
        if self.stats.scaling_factor < 0.0 {
            return Err(ArchetypeError::NegativeScalingFactor(self.stats.scaling_factor));
        }

        self.combo
            .iter()
            .chain(self.skills.iter())
            .try_for_each(validate_attack)
    }

    /// Look up a skill slot by attack name
    pub fn skill_index(&self, name: &str) -> Option<usize> {
        self.skills.iter().position(|s| s.name == name)
    }
}

fn validate_attack(attack: &AttackDefinition) -> Result<(), ArchetypeError> {
    if attack.name.trim().is_empty() {
        return Err(ArchetypeError::UnnamedAttack);
    }
    if !attack.range.is_finite() || attack.range < 0.0 {
        return Err(ArchetypeError::InvalidRange {
            name: attack.name.clone(),
            range: attack.range,
        });
    }
    match attack.shape {
        AttackShape::Cone if !(attack.angle_or_width > 0.0 && attack.angle_or_width <= 360.0) => {
            return Err(ArchetypeError::InvalidAngle {
                name: attack.name.clone(),
                angle: attack.angle_or_width,
            });
        }
        AttackShape::Line if attack.angle_or_width <= 0.0 => {
            return Err(ArchetypeError::InvalidWidth {
                name: attack.name.clone(),
                width: attack.angle_or_width,
            });
        }
        _ => {}
    }
    if attack.cooldown < 0.0 {
        return Err(ArchetypeError::NegativeCooldown {
            name: attack.name.clone(),
            cooldown: attack.cooldown,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use types_core::{LinkedBuff, StatType};

    fn duelist() -> Archetype {
        Archetype {
            id: "duelist".to_string(),
            stats: BaseStats::default().with(StatType::Strength, 10.0),
            combo: vec![
                AttackDefinition::cone("slash_1", 2.0, 90.0),
                AttackDefinition::cone("slash_2", 2.5, 120.0),
            ],
            skills: vec![AttackDefinition::line("gap_closer", 6.0, 1.5)
                .with_linked_buff(LinkedBuff::Strife)
                .with_cooldown(4.0)],
            combo_reset: Some(0.8),
        }
    }

    #[test]
    fn test_valid_archetype() {
        assert!(duelist().validate().is_ok());
        assert_eq!(duelist().skill_index("gap_closer"), Some(0));
        assert_eq!(duelist().skill_index("missing"), None);
    }

    #[test]
    fn test_rejects_empty_id() {
        let mut archetype = duelist();
        archetype.id = "  ".to_string();
        assert_eq!(archetype.validate(), Err(ArchetypeError::EmptyId));
    }

    #[test]
    fn test_rejects_bad_cone_angle() {
        let mut archetype = duelist();
        archetype.combo.push(AttackDefinition::cone("wide", 2.0, 400.0));
        assert!(matches!(
            archetype.validate(),
            Err(ArchetypeError::InvalidAngle { name, .. }) if name == "wide"
        ));
    }

    #[test]
    fn test_rejects_zero_width_line() {
        let mut archetype = duelist();
        archetype.skills.push(AttackDefinition::line("needle", 6.0, 0.0));
        assert!(matches!(archetype.validate(), Err(ArchetypeError::InvalidWidth { .. })));
    }

    #[test]
    fn test_radial_needs_no_angle() {
        let mut archetype = duelist();
        archetype.skills.push(AttackDefinition::radial("whirl", 3.0));
        assert!(archetype.validate().is_ok());
    }

    #[test]
    fn test_rejects_negative_values() {
        let mut archetype = duelist();
        archetype.combo_reset = Some(-1.0);
        assert_eq!(archetype.validate(), Err(ArchetypeError::NegativeComboReset(-1.0)));

        let mut archetype = duelist();
        archetype.skills[0].cooldown = -2.0;
        assert!(matches!(archetype.validate(), Err(ArchetypeError::NegativeCooldown { .. })));

        let mut archetype = duelist();
        archetype.combo[0].range = -1.0;
        assert!(matches!(archetype.validate(), Err(ArchetypeError::InvalidRange { .. })));
    }
}
