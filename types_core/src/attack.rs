use crate::types::{AttackShape, LinkedBuff, StatType};
use serde::{Deserialize, Serialize};

/// Static description of a combo step or skill
///
/// Shared and stateless: the same definition is referenced by every
/// invocation of the move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackDefinition {
    /// Identifier used in logs and loadout files
    pub name: String,
    #[serde(default)]
    pub shape: AttackShape,
    /// Cone/radial radius, or line length
    pub range: f32,
    /// Full cone arc in degrees, or line width
    #[serde(default)]
    pub angle_or_width: f32,
    #[serde(default)]
    pub knockback: f32,
    /// Stat read from the attacker as the raw damage of each hit
    #[serde(default = "default_damage_stat")]
    pub damage_stat: StatType,
    #[serde(default)]
    pub linked_buff: Option<LinkedBuff>,
    /// Seconds before the skill can be used again (skills only)
    #[serde(default)]
    pub cooldown: f64,
    /// Whether the attacker lunges the attack's range before it lands
    #[serde(default)]
    pub moves_to_hitbox: bool,
}

fn default_damage_stat() -> StatType {
    StatType::SlashAttack
}

impl AttackDefinition {
    /// Create a cone attack with no knockback dealing slash damage
    pub fn new(name: impl Into<String>, shape: AttackShape, range: f32, angle_or_width: f32) -> Self {
        AttackDefinition {
            name: name.into(),
            shape,
            range,
            angle_or_width,
            knockback: 0.0,
            damage_stat: default_damage_stat(),
            linked_buff: None,
            cooldown: 0.0,
            moves_to_hitbox: false,
        }
    }

    pub fn cone(name: impl Into<String>, range: f32, angle: f32) -> Self {
        Self::new(name, AttackShape::Cone, range, angle)
    }

    pub fn line(name: impl Into<String>, length: f32, width: f32) -> Self {
        Self::new(name, AttackShape::Line, length, width)
    }

    pub fn radial(name: impl Into<String>, radius: f32) -> Self {
        Self::new(name, AttackShape::Radial, radius, 0.0)
    }

    pub fn with_damage_stat(mut self, stat: StatType) -> Self {
        self.damage_stat = stat;
        self
    }

    pub fn with_knockback(mut self, knockback: f32) -> Self {
        self.knockback = knockback;
        self
    }

    pub fn with_linked_buff(mut self, buff: LinkedBuff) -> Self {
        self.linked_buff = Some(buff);
        self
    }

    pub fn with_cooldown(mut self, cooldown: f64) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_lunge(mut self) -> Self {
        self.moves_to_hitbox = true;
        self
    }

    /// Whether this attack triggers the given buff's start/end hooks
    pub fn is_linked_to(&self, buff: LinkedBuff) -> bool {
        self.linked_buff == Some(buff)
    }
}
