//! Attack outcomes reported back to the host

use crate::actions::LungePlan;
use crate::buffs::BuffChange;
use crate::damage::OutgoingDamage;
use crate::stat_table::DamageTaken;
use crate::types::EntityId;
use serde::{Deserialize, Serialize};

/// What starting an attack did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackStart {
    pub attack: String,
    /// Dash the host should play before the hitbox resolves
    pub lunge: Option<LungePlan>,
    pub buff: Option<BuffChange>,
}

/// One target struck during a resolution pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitOutcome {
    pub target: EntityId,
    pub damage: OutgoingDamage,
    pub taken: DamageTaken,
}

/// Result of resolving one attack against the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackReport {
    pub attacker: EntityId,
    pub attack: String,
    /// Hits in resolution order
    pub hits: Vec<HitOutcome>,
    /// Candidates the shape found that are not live entities
    pub skipped: Vec<EntityId>,
    pub kills: Vec<EntityId>,
    /// Buff changes triggered by kills during the pass
    pub buff_changes: Vec<BuffChange>,
}

impl AttackReport {
    pub fn new(attacker: EntityId, attack: impl Into<String>) -> Self {
        AttackReport {
            attacker,
            attack: attack.into(),
            hits: Vec::new(),
            skipped: Vec::new(),
            kills: Vec::new(),
            buff_changes: Vec::new(),
        }
    }

    /// Health removed across all targets
    pub fn total_damage(&self) -> f64 {
        self.hits.iter().map(|h| h.taken.final_damage).sum()
    }

    pub fn crits(&self) -> usize {
        self.hits.iter().filter(|h| h.damage.is_critical).count()
    }

    pub fn is_miss(&self) -> bool {
        self.hits.is_empty()
    }
}
