//! StatTable - Per-entity base stats, additive modifiers and health

mod ledger;

pub use ledger::{ModifierHandle, ModifierLedger, TimedModifier};

use crate::types::SimTime;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use types_core::{BaseStats, StatMap, StatType};

/// Stats of a single entity
///
/// Derived values are recomputed on every read from base + modifiers, so a
/// modifier change is visible to the very next lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatTable {
    base: StatMap,
    modifiers: StatMap,
    /// How much one attribute point boosts its scaled stat (0.01 = 1%)
    scaling_factor: f64,
    current_health: f64,
    dead: bool,
    ledger: ModifierLedger,
}

/// Outcome of a single `take_damage` call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageTaken {
    /// Damage before defense
    pub raw: f64,
    /// Defense value subtracted from the raw damage
    pub defense: f64,
    /// Health actually removed
    pub final_damage: f64,
    pub health_before: f64,
    pub health_after: f64,
    pub max_health: f64,
    /// Knockback vector forwarded to the hit notification
    pub knockback: Vec3,
    /// True only on the call that first drove health to zero
    pub killed: bool,
}

impl StatTable {
    /// Create a table at full health, with the ledger clock at `now`
    pub fn new(base: &BaseStats, now: SimTime) -> Self {
        let mut table = StatTable {
            base: base.to_map(),
            modifiers: StatMap::new(),
            scaling_factor: base.scaling_factor,
            current_health: 0.0,
            dead: false,
            ledger: ModifierLedger::new(now),
        };
        table.current_health = table.stat_value(StatType::MaxHealth).max(0.0);
        table
    }

    /// Final value of a stat
    ///
    /// - Attributes: base + modifier
    /// - Attribute-scaled stats: (base + modifier) * (1 + attribute * scaling_factor)
    /// - Everything else: base + modifier
    pub fn stat_value(&self, stat: StatType) -> f64 {
        let value = self.base_with_modifier(stat);
        match stat.scaling_attribute() {
            Some(attribute) => {
                let points = self.base_with_modifier(attribute);
                value * (1.0 + points * self.scaling_factor)
            }
            None => value,
        }
    }

    fn base_with_modifier(&self, stat: StatType) -> f64 {
        self.base[stat] + self.modifiers[stat]
    }

    pub fn base_value(&self, stat: StatType) -> f64 {
        self.base[stat]
    }

    /// Accumulated additive modifier on a stat
    pub fn modifier(&self, stat: StatType) -> f64 {
        self.modifiers[stat]
    }

    pub fn scaling_factor(&self) -> f64 {
        self.scaling_factor
    }

    /// Add `amount` to a stat immediately
    ///
    /// With `duration > 0` the amount is subtracted back once that many
    /// seconds have elapsed on the simulation clock and a handle to the
    /// reversal is returned. Otherwise the modifier stays until
    /// `remove_modifier` is called with the same amount.
    pub fn add_modifier(&mut self, stat: StatType, amount: f64, duration: f64) -> Option<ModifierHandle> {
        self.apply_modifier(stat, amount);
        if duration > 0.0 {
            Some(self.ledger.schedule(stat, amount, duration))
        } else {
            None
        }
    }

    /// Explicit inverse of a permanent `add_modifier`
    pub fn remove_modifier(&mut self, stat: StatType, amount: f64) {
        self.apply_modifier(stat, -amount);
    }

    /// Cancel a scheduled reversal. The modifier amount stays applied.
    pub fn cancel_modifier(&mut self, handle: ModifierHandle) -> Option<TimedModifier> {
        self.ledger.cancel(handle)
    }

    fn apply_modifier(&mut self, stat: StatType, amount: f64) {
        self.modifiers.add(stat, amount);
        if stat == StatType::MaxHealth {
            self.clamp_health();
        }
    }

    /// Advance the ledger to `now` and revert every modifier that expired
    pub fn tick(&mut self, now: SimTime) -> Vec<TimedModifier> {
        let expired = self.ledger.advance_to(now);
        for modifier in &expired {
            self.apply_modifier(modifier.stat, -modifier.amount);
        }
        expired
    }

    /// Drop all pending reversals (entity teardown)
    pub fn clear_scheduled(&mut self) -> usize {
        self.ledger.clear()
    }

    pub fn ledger(&self) -> &ModifierLedger {
        &self.ledger
    }

    /// Apply incoming damage reduced by Defense
    ///
    /// `killed` is reported once, on the call that first brings health to 0.
    pub fn take_damage(&mut self, raw: f64, knockback: Vec3) -> DamageTaken {
        let defense = self.stat_value(StatType::Defense);
        let final_damage = (raw - defense).max(0.0);
        let max_health = self.max_health();
        let health_before = self.current_health;

        self.current_health = (self.current_health - final_damage).clamp(0.0, max_health);

        let killed = !self.dead && self.current_health <= 0.0;
        if killed {
            self.dead = true;
        }

        DamageTaken {
            raw,
            defense,
            final_damage,
            health_before,
            health_after: self.current_health,
            max_health,
            knockback,
            killed,
        }
    }

    /// Restore health, clamped to max. Returns the amount actually healed.
    pub fn heal(&mut self, amount: f64) -> f64 {
        if self.dead || amount <= 0.0 {
            return 0.0;
        }
        let before = self.current_health;
        self.current_health = (self.current_health + amount).clamp(0.0, self.max_health());
        self.current_health - before
    }

    fn clamp_health(&mut self) {
        self.current_health = self.current_health.clamp(0.0, self.max_health());
    }

    fn max_health(&self) -> f64 {
        self.stat_value(StatType::MaxHealth).max(0.0)
    }

    pub fn current_health(&self) -> f64 {
        self.current_health
    }

    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    /// Current health as a percentage of max
    pub fn health_percent(&self) -> f64 {
        let max = self.max_health();
        if max <= 0.0 {
            return 0.0;
        }
        self.current_health / max * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn table(base: BaseStats) -> StatTable {
        StatTable::new(&base, 0.0)
    }

    #[test]
    fn test_spawns_at_full_health() {
        let stats = table(BaseStats::default().with(StatType::MaxHealth, 250.0));
        assert!((stats.current_health() - 250.0).abs() < EPS);
        assert!(stats.is_alive());
    }

    #[test]
    fn test_attribute_scaling() {
        // 10 slash with 50 strength at 1% per point = 15
        let stats = table(
            BaseStats::default()
                .with(StatType::SlashAttack, 10.0)
                .with(StatType::Strength, 50.0),
        );
        assert!((stats.stat_value(StatType::SlashAttack) - 15.0).abs() < EPS);
        // Attributes themselves are not scaled
        assert!((stats.stat_value(StatType::Strength) - 50.0).abs() < EPS);
    }

    #[test]
    fn test_each_attribute_scales_its_stats() {
        let base = BaseStats::default()
            .with(StatType::Luck, 20.0)
            .with(StatType::Imagination, 30.0)
            .with(StatType::Agility, 40.0)
            .with(StatType::Fortitude, 100.0);
        let stats = table(base);

        assert!((stats.stat_value(StatType::PierceAttack) - 12.0).abs() < EPS);
        assert!((stats.stat_value(StatType::MagicAttack) - 13.0).abs() < EPS);
        assert!((stats.stat_value(StatType::ActionPoints) - 65.0).abs() < EPS);
        assert!((stats.stat_value(StatType::AttackSpeed) - 28.0).abs() < EPS);
        assert!((stats.stat_value(StatType::Defense) - 10.0).abs() < EPS);
        // Unscaled stats ignore attributes
        assert!((stats.stat_value(StatType::MoveSpeed) - 5.0).abs() < EPS);
    }

    #[test]
    fn test_modifier_is_scaled_with_base() {
        let mut stats = table(
            BaseStats::default()
                .with(StatType::PierceAttack, 10.0)
                .with(StatType::Luck, 100.0),
        );
        stats.add_modifier(StatType::PierceAttack, 5.0, 0.0);
        // (10 + 5) * 2
        assert!((stats.stat_value(StatType::PierceAttack) - 30.0).abs() < EPS);
    }

    #[test]
    fn test_custom_scaling_factor() {
        let stats = table(
            BaseStats::default()
                .with(StatType::SlashAttack, 10.0)
                .with(StatType::Strength, 10.0)
                .with_scaling_factor(0.05),
        );
        assert!((stats.stat_value(StatType::SlashAttack) - 15.0).abs() < EPS);
    }

    #[test]
    fn test_defense_reduces_damage() {
        let mut stats = table(BaseStats::default().with(StatType::Defense, 5.0));
        let taken = stats.take_damage(12.0, Vec3::ZERO);
        assert!((taken.final_damage - 7.0).abs() < EPS);
        assert!((stats.current_health() - 93.0).abs() < EPS);
        assert!(!taken.killed);
    }

    #[test]
    fn test_damage_below_defense_is_zero() {
        let mut stats = table(BaseStats::default().with(StatType::Defense, 20.0));
        let taken = stats.take_damage(8.0, Vec3::X);
        assert!((taken.final_damage - 0.0).abs() < EPS);
        assert!((stats.current_health() - 100.0).abs() < EPS);
        assert_eq!(taken.knockback, Vec3::X);
    }

    #[test]
    fn test_killed_reported_once() {
        let mut stats = table(
            BaseStats::default()
                .with(StatType::MaxHealth, 20.0)
                .with(StatType::Defense, 0.0),
        );

        let first = stats.take_damage(15.0, Vec3::ZERO);
        assert!(!first.killed);

        let second = stats.take_damage(15.0, Vec3::ZERO);
        assert!(second.killed);
        assert!((stats.current_health() - 0.0).abs() < EPS);
        assert!(!stats.is_alive());

        let third = stats.take_damage(15.0, Vec3::ZERO);
        assert!(!third.killed);
    }

    #[test]
    fn test_timed_modifier_expires() {
        let mut stats = table(BaseStats::default());
        let before = stats.stat_value(StatType::MoveSpeed);

        let handle = stats.add_modifier(StatType::MoveSpeed, 2.0, 3.0);
        assert!(handle.is_some());
        assert!((stats.stat_value(StatType::MoveSpeed) - (before + 2.0)).abs() < EPS);

        assert!(stats.tick(2.0).is_empty());
        assert!((stats.stat_value(StatType::MoveSpeed) - (before + 2.0)).abs() < EPS);

        let expired = stats.tick(3.0);
        assert_eq!(expired.len(), 1);
        assert!((stats.stat_value(StatType::MoveSpeed) - before).abs() < EPS);
    }

    #[test]
    fn test_permanent_modifier_needs_explicit_removal() {
        let mut stats = table(BaseStats::default());
        assert!(stats.add_modifier(StatType::CritRate, 10.0, 0.0).is_none());
        assert!(stats.add_modifier(StatType::CritRate, 5.0, -1.0).is_none());
        stats.tick(1000.0);
        assert!((stats.stat_value(StatType::CritRate) - 20.0).abs() < EPS);

        stats.remove_modifier(StatType::CritRate, 15.0);
        assert!((stats.stat_value(StatType::CritRate) - 5.0).abs() < EPS);
    }

    #[test]
    fn test_cancelled_modifier_stays_applied() {
        let mut stats = table(BaseStats::default());
        let handle = stats.add_modifier(StatType::Luck, 4.0, 1.0).unwrap();
        assert!(stats.cancel_modifier(handle).is_some());
        stats.tick(10.0);
        assert!((stats.stat_value(StatType::Luck) - 4.0).abs() < EPS);
    }

    #[test]
    fn test_max_health_drop_clamps_current() {
        let mut stats = table(BaseStats::default());
        stats.add_modifier(StatType::MaxHealth, -40.0, 2.0);
        assert!((stats.current_health() - 60.0).abs() < EPS);

        // Expiry raises the cap but does not heal
        stats.tick(2.0);
        assert!((stats.current_health() - 60.0).abs() < EPS);
        assert!((stats.health_percent() - 60.0).abs() < EPS);
    }

    #[test]
    fn test_heal_is_clamped() {
        let mut stats = table(BaseStats::default().with(StatType::Defense, 0.0));
        stats.take_damage(30.0, Vec3::ZERO);
        let healed = stats.heal(50.0);
        assert!((healed - 30.0).abs() < EPS);
        assert!((stats.current_health() - 100.0).abs() < EPS);
    }

    proptest! {
        #[test]
        fn prop_health_stays_in_bounds(
            max_health in 1.0f64..500.0,
            defense in 0.0f64..30.0,
            hits in proptest::collection::vec(-50.0f64..200.0, 1..20),
        ) {
            let mut stats = table(
                BaseStats::default()
                    .with(StatType::MaxHealth, max_health)
                    .with(StatType::Defense, defense),
            );
            let mut kills = 0;
            for raw in hits {
                let taken = stats.take_damage(raw, Vec3::ZERO);
                if taken.killed {
                    kills += 1;
                }
                let health = stats.current_health();
                prop_assert!(health >= 0.0);
                prop_assert!(health <= stats.stat_value(StatType::MaxHealth));
            }
            prop_assert!(kills <= 1);
        }
    }
}
