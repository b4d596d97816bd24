use crate::types::StatType;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Dense per-stat storage
///
/// Every `StatType` has a slot from construction, so lookups never miss.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatMap([f64; StatType::COUNT]);

impl StatMap {
    /// All stats at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, stat: StatType) -> f64 {
        self.0[stat.index()]
    }

    pub fn set(&mut self, stat: StatType, value: f64) {
        self.0[stat.index()] = value;
    }

    pub fn add(&mut self, stat: StatType, value: f64) {
        self.0[stat.index()] += value;
    }

    /// Iterate `(stat, value)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (StatType, f64)> + '_ {
        StatType::all().iter().map(move |&stat| (stat, self.get(stat)))
    }

    /// Stats holding a non-zero value
    pub fn non_zero(&self) -> impl Iterator<Item = (StatType, f64)> + '_ {
        self.iter().filter(|(_, v)| *v != 0.0)
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|v| *v == 0.0)
    }
}

impl Index<StatType> for StatMap {
    type Output = f64;

    fn index(&self, stat: StatType) -> &f64 {
        &self.0[stat.index()]
    }
}

impl IndexMut<StatType> for StatMap {
    fn index_mut(&mut self, stat: StatType) -> &mut f64 {
        &mut self.0[stat.index()]
    }
}

/// Spawn-time stat configuration of an entity
///
/// Attributes default to 0, which is what enemies use. Crit values are
/// percentages (5 = 5%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseStats {
    /// How much one attribute point boosts its scaled stat (0.01 = 1%)
    #[serde(default = "default_scaling_factor")]
    pub scaling_factor: f64,

    #[serde(default = "default_max_health")]
    pub max_health: f64,
    #[serde(default = "default_move_speed")]
    pub move_speed: f64,
    #[serde(default = "default_dash_speed")]
    pub dash_speed: f64,
    #[serde(default = "default_defense")]
    pub defense: f64,
    #[serde(default = "default_attack_speed")]
    pub attack_speed: f64,

    #[serde(default = "default_attack")]
    pub slash_attack: f64,
    #[serde(default = "default_attack")]
    pub pierce_attack: f64,
    #[serde(default = "default_attack")]
    pub magic_attack: f64,

    #[serde(default = "default_action_points")]
    pub action_points: f64,
    #[serde(default)]
    pub strength: f64,
    #[serde(default)]
    pub luck: f64,
    #[serde(default)]
    pub fortitude: f64,
    #[serde(default)]
    pub agility: f64,
    #[serde(default)]
    pub imagination: f64,

    #[serde(default = "default_crit_rate")]
    pub crit_rate: f64,
    #[serde(default = "default_crit_damage")]
    pub crit_damage: f64,
}

impl Default for BaseStats {
    fn default() -> Self {
        BaseStats {
            scaling_factor: default_scaling_factor(),
            max_health: default_max_health(),
            move_speed: default_move_speed(),
            dash_speed: default_dash_speed(),
            defense: default_defense(),
            attack_speed: default_attack_speed(),
            slash_attack: default_attack(),
            pierce_attack: default_attack(),
            magic_attack: default_attack(),
            action_points: default_action_points(),
            strength: 0.0,
            luck: 0.0,
            fortitude: 0.0,
            agility: 0.0,
            imagination: 0.0,
            crit_rate: default_crit_rate(),
            crit_damage: default_crit_damage(),
        }
    }
}

impl BaseStats {
    /// Base value of a single stat
    pub fn get(&self, stat: StatType) -> f64 {
        match stat {
            StatType::MaxHealth => self.max_health,
            StatType::MoveSpeed => self.move_speed,
            StatType::DashSpeed => self.dash_speed,
            StatType::SlashAttack => self.slash_attack,
            StatType::PierceAttack => self.pierce_attack,
            StatType::MagicAttack => self.magic_attack,
            StatType::AttackSpeed => self.attack_speed,
            StatType::Defense => self.defense,
            StatType::ActionPoints => self.action_points,
            StatType::Strength => self.strength,
            StatType::Luck => self.luck,
            StatType::Fortitude => self.fortitude,
            StatType::Agility => self.agility,
            StatType::Imagination => self.imagination,
            StatType::CritRate => self.crit_rate,
            StatType::CritDamage => self.crit_damage,
        }
    }

    /// Override a single base stat
    pub fn with(mut self, stat: StatType, value: f64) -> Self {
        let slot = match stat {
            StatType::MaxHealth => &mut self.max_health,
            StatType::MoveSpeed => &mut self.move_speed,
            StatType::DashSpeed => &mut self.dash_speed,
            StatType::SlashAttack => &mut self.slash_attack,
            StatType::PierceAttack => &mut self.pierce_attack,
            StatType::MagicAttack => &mut self.magic_attack,
            StatType::AttackSpeed => &mut self.attack_speed,
            StatType::Defense => &mut self.defense,
            StatType::ActionPoints => &mut self.action_points,
            StatType::Strength => &mut self.strength,
            StatType::Luck => &mut self.luck,
            StatType::Fortitude => &mut self.fortitude,
            StatType::Agility => &mut self.agility,
            StatType::Imagination => &mut self.imagination,
            StatType::CritRate => &mut self.crit_rate,
            StatType::CritDamage => &mut self.crit_damage,
        };
        *slot = value;
        self
    }

    pub fn with_scaling_factor(mut self, factor: f64) -> Self {
        self.scaling_factor = factor;
        self
    }

    /// Flatten into dense storage
    pub fn to_map(&self) -> StatMap {
        let mut map = StatMap::new();
        for &stat in StatType::all() {
            map.set(stat, self.get(stat));
        }
        map
    }
}

fn default_scaling_factor() -> f64 {
    0.01
}
fn default_max_health() -> f64 {
    100.0
}
fn default_move_speed() -> f64 {
    5.0
}
fn default_dash_speed() -> f64 {
    20.0
}
fn default_defense() -> f64 {
    5.0
}
fn default_attack_speed() -> f64 {
    20.0
}
fn default_attack() -> f64 {
    10.0
}
fn default_action_points() -> f64 {
    50.0
}
fn default_crit_rate() -> f64 {
    5.0
}
fn default_crit_damage() -> f64 {
    50.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_map_starts_at_zero() {
        let map = StatMap::new();
        for &stat in StatType::all() {
            assert_eq!(map[stat], 0.0);
        }
        assert!(map.is_zero());
    }

    #[test]
    fn test_stat_map_add() {
        let mut map = StatMap::new();
        map.add(StatType::MoveSpeed, 2.0);
        map.add(StatType::MoveSpeed, -0.5);
        assert!((map[StatType::MoveSpeed] - 1.5).abs() < f64::EPSILON);
        assert_eq!(map.non_zero().count(), 1);
    }

    #[test]
    fn test_default_base_stats() {
        let base = BaseStats::default();
        assert!((base.get(StatType::MaxHealth) - 100.0).abs() < f64::EPSILON);
        assert!((base.get(StatType::DashSpeed) - 20.0).abs() < f64::EPSILON);
        assert!((base.get(StatType::CritDamage) - 50.0).abs() < f64::EPSILON);
        assert!((base.get(StatType::Strength) - 0.0).abs() < f64::EPSILON);
        assert!((base.scaling_factor - 0.01).abs() < f64::EPSILON);
    }

    #[test]
    fn test_with_overrides_one_stat() {
        let base = BaseStats::default().with(StatType::Luck, 25.0);
        assert!((base.get(StatType::Luck) - 25.0).abs() < f64::EPSILON);
        assert!((base.to_map()[StatType::Luck] - 25.0).abs() < f64::EPSILON);
        assert!((base.get(StatType::Strength) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_partial_stats() {
        let toml = r#"
max_health = 250
strength = 12
crit_rate = 15
"#;
        let base: BaseStats = toml::from_str(toml).unwrap();
        assert!((base.max_health - 250.0).abs() < f64::EPSILON);
        assert!((base.strength - 12.0).abs() < f64::EPSILON);
        assert!((base.crit_rate - 15.0).abs() < f64::EPSILON);
        // Unset fields fall back to defaults
        assert!((base.move_speed - 5.0).abs() < f64::EPSILON);
    }
}
