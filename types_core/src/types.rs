use serde::{Deserialize, Serialize};
use std::fmt;

/// Every stat an entity carries
///
/// Doubles as the damage-type selector of an attack: an attack keyed on
/// `PierceAttack` deals the attacker's pierce value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatType {
    // Universal base stats
    MaxHealth,
    MoveSpeed,
    DashSpeed,
    SlashAttack,
    PierceAttack,
    MagicAttack,
    AttackSpeed,
    Defense,
    // Attributes
    ActionPoints,
    Strength,
    Luck,
    Fortitude,
    Agility,
    Imagination,
    // Sub-stats (percent values, 5 = 5%)
    CritRate,
    CritDamage,
}

impl StatType {
    /// Number of stat variants
    pub const COUNT: usize = 16;

    /// Get all stat variants in declaration order
    pub fn all() -> &'static [StatType; StatType::COUNT] {
        &[
            StatType::MaxHealth,
            StatType::MoveSpeed,
            StatType::DashSpeed,
            StatType::SlashAttack,
            StatType::PierceAttack,
            StatType::MagicAttack,
            StatType::AttackSpeed,
            StatType::Defense,
            StatType::ActionPoints,
            StatType::Strength,
            StatType::Luck,
            StatType::Fortitude,
            StatType::Agility,
            StatType::Imagination,
            StatType::CritRate,
            StatType::CritDamage,
        ]
    }

    /// Dense index of this stat, matching `all()`
    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether this is one of the five scaling attributes
    ///
    /// `ActionPoints` sits with the attributes in the enum but is itself
    /// scaled by Imagination, so it is not one.
    pub fn is_attribute(self) -> bool {
        matches!(
            self,
            StatType::Strength
                | StatType::Luck
                | StatType::Fortitude
                | StatType::Agility
                | StatType::Imagination
        )
    }

    /// The attribute whose points scale this stat by a percentage, if any
    pub fn scaling_attribute(self) -> Option<StatType> {
        match self {
            StatType::SlashAttack => Some(StatType::Strength),
            StatType::PierceAttack => Some(StatType::Luck),
            StatType::MagicAttack | StatType::ActionPoints => Some(StatType::Imagination),
            StatType::AttackSpeed => Some(StatType::Agility),
            StatType::Defense => Some(StatType::Fortitude),
            _ => None,
        }
    }
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatType::MaxHealth => "Max Health",
            StatType::MoveSpeed => "Move Speed",
            StatType::DashSpeed => "Dash Speed",
            StatType::SlashAttack => "Slash Attack",
            StatType::PierceAttack => "Pierce Attack",
            StatType::MagicAttack => "Magic Attack",
            StatType::AttackSpeed => "Attack Speed",
            StatType::Defense => "Defense",
            StatType::ActionPoints => "Action Points",
            StatType::Strength => "Strength",
            StatType::Luck => "Luck",
            StatType::Fortitude => "Fortitude",
            StatType::Agility => "Agility",
            StatType::Imagination => "Imagination",
            StatType::CritRate => "Crit Rate",
            StatType::CritDamage => "Crit Damage",
        };
        write!(f, "{}", name)
    }
}

/// Class buffs an attack can be linked to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkedBuff {
    /// Saber kill-chain stacking buff
    Strife,
    /// Swordsman
    Vengeance,
    /// Mage
    Arcana,
    /// Archer
    PerfectDraw,
}

impl LinkedBuff {
    pub fn all() -> &'static [LinkedBuff] {
        &[
            LinkedBuff::Strife,
            LinkedBuff::Vengeance,
            LinkedBuff::Arcana,
            LinkedBuff::PerfectDraw,
        ]
    }
}

impl fmt::Display for LinkedBuff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkedBuff::Strife => write!(f, "Strife"),
            LinkedBuff::Vengeance => write!(f, "Vengeance"),
            LinkedBuff::Arcana => write!(f, "Arcana"),
            LinkedBuff::PerfectDraw => write!(f, "Perfect Draw"),
        }
    }
}

/// Hit area of an attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AttackShape {
    /// Arc in front of the attacker, `angle_or_width` is the full arc in degrees
    #[default]
    Cone,
    /// Oriented box extending forward, `angle_or_width` is its width
    Line,
    /// Sphere around a world point
    Radial,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_all() {
        for (i, stat) in StatType::all().iter().enumerate() {
            assert_eq!(stat.index(), i);
        }
    }

    #[test]
    fn test_scaling_attributes() {
        assert_eq!(StatType::SlashAttack.scaling_attribute(), Some(StatType::Strength));
        assert_eq!(StatType::PierceAttack.scaling_attribute(), Some(StatType::Luck));
        assert_eq!(StatType::MagicAttack.scaling_attribute(), Some(StatType::Imagination));
        assert_eq!(StatType::ActionPoints.scaling_attribute(), Some(StatType::Imagination));
        assert_eq!(StatType::AttackSpeed.scaling_attribute(), Some(StatType::Agility));
        assert_eq!(StatType::Defense.scaling_attribute(), Some(StatType::Fortitude));
        for stat in [
            StatType::MaxHealth,
            StatType::MoveSpeed,
            StatType::DashSpeed,
            StatType::CritRate,
            StatType::CritDamage,
        ] {
            assert_eq!(stat.scaling_attribute(), None);
        }
    }

    #[test]
    fn test_attributes_are_unscaled() {
        for stat in StatType::all() {
            if stat.is_attribute() {
                assert_eq!(stat.scaling_attribute(), None);
            }
        }
        assert!(!StatType::ActionPoints.is_attribute());
    }
}
