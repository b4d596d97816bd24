//! Damage calculation - crit rollover and rounding

use super::{CritProfile, OutgoingDamage};
use crate::stat_table::StatTable;
use types_core::StatType;

/// Read crit rate and crit damage, converting rate above `rate_cap` into
/// bonus damage one point per point.
pub fn crit_profile(stats: &StatTable, rate_cap: f64) -> CritProfile {
    let rate = stats.stat_value(StatType::CritRate);
    let bonus = stats.stat_value(StatType::CritDamage);

    if rate > rate_cap {
        CritProfile {
            rate: rate_cap,
            bonus: bonus + (rate - rate_cap),
        }
    } else {
        CritProfile { rate, bonus }
    }
}

/// Crit damage: `ceil(raw + raw * bonus / 100)`
pub fn apply_crit(raw: f64, bonus_percent: f64) -> f64 {
    (raw + raw * (bonus_percent / 100.0)).ceil()
}

/// Deterministic core of the damage roll
///
/// `roll` is a value in `[0, 100)`; the hit crits when `roll <= rate`.
/// Crits round up, normal hits return the raw stat unrounded.
pub fn damage_for_roll(stats: &StatTable, damage_stat: StatType, roll: f64, rate_cap: f64) -> OutgoingDamage {
    let raw = stats.stat_value(damage_stat);
    let crit = crit_profile(stats, rate_cap);

    if roll <= crit.rate {
        OutgoingDamage {
            amount: apply_crit(raw, crit.bonus),
            is_critical: true,
        }
    } else {
        OutgoingDamage {
            amount: raw,
            is_critical: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::damage::DamageResolver;
    use rand::SeedableRng;
    use types_core::BaseStats;

    const EPS: f64 = 1e-9;

    fn make_test_rng() -> rand::rngs::StdRng {
        rand::rngs::StdRng::seed_from_u64(12345)
    }

    fn attacker(slash: f64, crit_rate: f64, crit_damage: f64) -> StatTable {
        let base = BaseStats::default()
            .with(StatType::SlashAttack, slash)
            .with(StatType::CritRate, crit_rate)
            .with(StatType::CritDamage, crit_damage);
        StatTable::new(&base, 0.0)
    }

    #[test]
    fn test_crit_rollover() {
        let stats = attacker(10.0, 120.0, 50.0);
        let crit = crit_profile(&stats, 100.0);
        assert!((crit.rate - 100.0).abs() < EPS);
        assert!((crit.bonus - 70.0).abs() < EPS);
    }

    #[test]
    fn test_no_rollover_below_cap() {
        let stats = attacker(10.0, 40.0, 50.0);
        let crit = crit_profile(&stats, 100.0);
        assert!((crit.rate - 40.0).abs() < EPS);
        assert!((crit.bonus - 50.0).abs() < EPS);
    }

    #[test]
    fn test_crit_rounds_up() {
        let stats = attacker(10.0, 50.0, 50.0);
        let damage = damage_for_roll(&stats, StatType::SlashAttack, 10.0, 100.0);
        assert!(damage.is_critical);
        assert!((damage.amount - 15.0).abs() < EPS);

        // 10.2 * 1.5 = 15.3 -> 16
        let stats = attacker(10.2, 50.0, 50.0);
        let damage = damage_for_roll(&stats, StatType::SlashAttack, 10.0, 100.0);
        assert!((damage.amount - 16.0).abs() < EPS);
    }

    #[test]
    fn test_normal_hit_is_not_rounded() {
        let stats = attacker(10.2, 50.0, 50.0);
        let damage = damage_for_roll(&stats, StatType::SlashAttack, 75.0, 100.0);
        assert!(!damage.is_critical);
        assert!((damage.amount - 10.2).abs() < EPS);
    }

    #[test]
    fn test_roll_equal_to_rate_crits() {
        let stats = attacker(10.0, 30.0, 50.0);
        assert!(damage_for_roll(&stats, StatType::SlashAttack, 30.0, 100.0).is_critical);
        assert!(!damage_for_roll(&stats, StatType::SlashAttack, 30.5, 100.0).is_critical);
    }

    #[test]
    fn test_overflowing_rate_always_crits_with_extra_bonus() {
        // 120 rate / 50 damage behaves as 100 / 70: 10 * 1.7 = 17
        let stats = attacker(10.0, 120.0, 50.0);
        let resolver = DamageResolver::default();
        let mut rng = make_test_rng();
        for _ in 0..100 {
            let damage = resolver.calculate_outgoing_damage(&stats, StatType::SlashAttack, &mut rng);
            assert!(damage.is_critical);
            assert!((damage.amount - 17.0).abs() < EPS);
        }
    }

    #[test]
    fn test_zero_rate_does_not_crit() {
        let stats = attacker(10.0, 0.0, 50.0);
        let resolver = DamageResolver::default();
        let mut rng = make_test_rng();
        let crits = (0..1000)
            .filter(|_| {
                resolver
                    .calculate_outgoing_damage(&stats, StatType::SlashAttack, &mut rng)
                    .is_critical
            })
            .count();
        assert_eq!(crits, 0);
    }

    #[test]
    fn test_crit_frequency_tracks_rate() {
        let stats = attacker(10.0, 25.0, 50.0);
        let resolver = DamageResolver::default();
        let mut rng = make_test_rng();
        let iterations = 10000;
        let crits = (0..iterations)
            .filter(|_| {
                resolver
                    .calculate_outgoing_damage(&stats, StatType::SlashAttack, &mut rng)
                    .is_critical
            })
            .count();
        let ratio = crits as f64 / iterations as f64;
        assert!(ratio > 0.22 && ratio < 0.28, "Crit ratio was {}", ratio);
    }

    #[test]
    fn test_expected_damage() {
        // 50% of 10, 50% of 15
        let stats = attacker(10.0, 50.0, 50.0);
        let resolver = DamageResolver::default();
        assert!((resolver.expected_damage(&stats, StatType::SlashAttack) - 12.5).abs() < EPS);
    }
}
