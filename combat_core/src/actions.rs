//! Action slots - combo chain, skill cooldowns and lunges

use crate::config::{LungeConstants, PlaybackConstants};
use crate::shape::horizontal;
use crate::stat_table::StatTable;
use crate::types::SimTime;
use crate::CombatError;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use types_core::{AttackDefinition, LinkedBuff, StatType};

/// An entity's basic-attack combo and skill slots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionSet {
    combo: Vec<AttackDefinition>,
    skills: Vec<AttackDefinition>,
    /// Seconds without input before the combo restarts
    combo_reset: f64,
    combo_index: usize,
    last_combo_input: Option<SimTime>,
    /// Remaining cooldown per skill slot
    cooldowns: Vec<f64>,
}

impl Default for ActionSet {
    fn default() -> Self {
        ActionSet::new(Vec::new(), Vec::new(), 1.0)
    }
}

impl ActionSet {
    pub fn new(combo: Vec<AttackDefinition>, skills: Vec<AttackDefinition>, combo_reset: f64) -> Self {
        let cooldowns = vec![0.0; skills.len()];
        ActionSet {
            combo,
            skills,
            combo_reset,
            combo_index: 0,
            last_combo_input: None,
            cooldowns,
        }
    }

    pub fn combo(&self) -> &[AttackDefinition] {
        &self.combo
    }

    pub fn skills(&self) -> &[AttackDefinition] {
        &self.skills
    }

    /// Next step of the combo
    ///
    /// The chain restarts at its first step when more than `combo_reset`
    /// seconds passed since the previous input.
    pub fn next_combo(&mut self, now: SimTime) -> Option<AttackDefinition> {
        if self.combo.is_empty() {
            return None;
        }
        if let Some(last) = self.last_combo_input {
            if now - last > self.combo_reset {
                self.combo_index = 0;
            }
        }
        self.last_combo_input = Some(now);

        let attack = self.combo.get(self.combo_index).cloned();
        self.combo_index = (self.combo_index + 1) % self.combo.len();
        attack
    }

    /// Index of the combo step the next input will play
    pub fn combo_index(&self) -> usize {
        self.combo_index
    }

    /// Start a skill's cooldown and hand back its definition
    pub fn try_skill(&mut self, index: usize) -> Result<AttackDefinition, CombatError> {
        let skill = self.skills.get(index).ok_or(CombatError::UnknownSkill(index))?;
        let remaining = self.cooldowns.get(index).copied().unwrap_or(0.0);
        if remaining > 0.0 {
            return Err(CombatError::SkillOnCooldown { index, remaining });
        }

        if let Some(slot) = self.cooldowns.get_mut(index) {
            *slot = skill.cooldown;
        }
        tracing::debug!("Skill {} ('{}') cooldown started: {}s", index, skill.name, skill.cooldown);
        Ok(skill.clone())
    }

    pub fn cooldown_remaining(&self, index: usize) -> Option<f64> {
        self.cooldowns.get(index).copied()
    }

    /// Zero the cooldown of every skill linked to `buff`. Returns how many
    /// were on cooldown.
    pub fn reset_linked_cooldowns(&mut self, buff: LinkedBuff) -> usize {
        let mut reset = 0;
        for (skill, cooldown) in self.skills.iter().zip(self.cooldowns.iter_mut()) {
            if skill.is_linked_to(buff) {
                if *cooldown > 0.0 {
                    reset += 1;
                }
                *cooldown = 0.0;
            }
        }
        reset
    }

    /// Count cooldowns down by `delta` seconds
    pub fn tick(&mut self, delta: f64) {
        for cooldown in &mut self.cooldowns {
            if *cooldown > 0.0 {
                *cooldown = (*cooldown - delta).max(0.0);
            }
        }
    }
}

/// Dash toward the hitbox performed before an attack lands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LungePlan {
    /// Unit direction on the ground plane
    pub direction: Vec3,
    pub speed: f64,
    /// Seconds the dash lasts, range / speed
    pub duration: f64,
}

/// Lunge for attacks that move to their hitbox, driven by DashSpeed
pub fn plan_lunge(
    attack: &AttackDefinition,
    stats: &StatTable,
    forward: Vec3,
    constants: &LungeConstants,
) -> Option<LungePlan> {
    if !attack.moves_to_hitbox {
        return None;
    }
    let direction = horizontal(forward)?;

    let dash = stats.stat_value(StatType::DashSpeed);
    let speed = if dash <= constants.min_speed {
        constants.fallback_speed
    } else {
        dash
    };

    Some(LungePlan {
        direction,
        speed,
        duration: attack.range as f64 / speed,
    })
}

/// Frame rate for stat-driven animation playback
///
/// Attacks play at AttackSpeed and walk cycles at MoveSpeed when those are
/// above the minimum; otherwise the clip's own rate is used.
pub fn playback_rate(stats: &StatTable, stat: StatType, clip_rate: f64, constants: &PlaybackConstants) -> f64 {
    let from_stat = stats.stat_value(stat);
    let rate = if from_stat > constants.min_rate {
        from_stat
    } else {
        clip_rate
    };

    if rate <= constants.min_rate {
        constants.fallback_rate
    } else {
        rate
    }
}
