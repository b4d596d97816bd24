//! Outgoing damage - turning an attacker's stats into a damage number

mod calculation;

pub use calculation::{apply_crit, crit_profile, damage_for_roll};

use crate::config::CritConstants;
use crate::stat_table::StatTable;
use rand::Rng;
use serde::{Deserialize, Serialize};
use types_core::StatType;

/// Effective crit chance and bonus after rollover
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CritProfile {
    /// Chance in percent, never above the configured cap
    pub rate: f64,
    /// Bonus damage in percent of the raw hit
    pub bonus: f64,
}

/// Damage an attacker sends out for one hit, before the target's defense
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutgoingDamage {
    pub amount: f64,
    pub is_critical: bool,
}

/// Rolls outgoing damage from an attacker's stat table
#[derive(Debug, Clone, Default)]
pub struct DamageResolver {
    crit: CritConstants,
}

impl DamageResolver {
    pub fn new(crit: CritConstants) -> Self {
        DamageResolver { crit }
    }

    pub fn crit_profile(&self, stats: &StatTable) -> CritProfile {
        crit_profile(stats, self.crit.rate_cap)
    }

    /// Roll damage for `damage_stat`, drawing the crit roll from `rng`
    pub fn calculate_outgoing_damage(
        &self,
        stats: &StatTable,
        damage_stat: StatType,
        rng: &mut impl Rng,
    ) -> OutgoingDamage {
        let roll = rng.gen_range(0.0..100.0);
        damage_for_roll(stats, damage_stat, roll, self.crit.rate_cap)
    }

    /// Average damage per hit over the crit distribution
    pub fn expected_damage(&self, stats: &StatTable, damage_stat: StatType) -> f64 {
        let raw = stats.stat_value(damage_stat);
        let crit = self.crit_profile(stats);
        let chance = (crit.rate / 100.0).clamp(0.0, 1.0);
        raw * (1.0 - chance) + apply_crit(raw, crit.bonus) * chance
    }
}
