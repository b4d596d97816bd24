//! Class buffs driven by linked attacks
//!
//! Each `LinkedBuff` kind maps to a `BuffBehavior` reacting to three events
//! of the attack it is linked to: start, target killed mid-attack, and end.
//! Only the kill-chain (Strife) behaviour has mechanics; the other kinds are
//! dormant and ignore every event.

mod kill_chain;

pub use kill_chain::KillChain;

use crate::actions::ActionSet;
use crate::config::GameConstants;
use crate::stat_table::StatTable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use types_core::{AttackDefinition, LinkedBuff, StatMap, StatType};

/// Stack state of one buff kind on one entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuffStackState {
    pub stacks: u32,
    /// Amounts this buff currently has added to the stat table
    pub applied: StatMap,
    /// Whether a kill landed during the current attack window
    pub kill_confirmed: bool,
}

impl BuffStackState {
    /// Add a permanent modifier and remember it for reverting
    pub fn apply(&mut self, stats: &mut StatTable, stat: StatType, amount: f64) {
        stats.add_modifier(stat, amount, 0.0);
        self.applied.add(stat, amount);
    }

    /// Subtract exactly what was applied, as stored
    pub fn revert(&mut self, stats: &mut StatTable) {
        for (stat, amount) in self.applied.non_zero() {
            stats.remove_modifier(stat, amount);
        }
        self.applied = StatMap::new();
    }
}

/// What a buff event changed, for observers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BuffChange {
    /// A stack was confirmed and bonuses reapplied
    Stacked {
        buff: LinkedBuff,
        stacks: u32,
        cooldowns_reset: usize,
    },
    /// All stacks and bonuses were dropped
    Reset { buff: LinkedBuff, from: u32 },
}

impl BuffChange {
    pub fn buff(&self) -> LinkedBuff {
        match self {
            BuffChange::Stacked { buff, .. } | BuffChange::Reset { buff, .. } => *buff,
        }
    }

    /// Stack count after the change
    pub fn stacks(&self) -> u32 {
        match self {
            BuffChange::Stacked { stacks, .. } => *stacks,
            BuffChange::Reset { .. } => 0,
        }
    }
}

/// Live collaborators a buff may touch
pub struct BuffContext<'a> {
    pub stats: &'a mut StatTable,
    pub actions: &'a mut ActionSet,
    pub constants: &'a GameConstants,
}

/// Reaction of one buff kind to linked-attack events
pub trait BuffBehavior: Send + Sync {
    fn kind(&self) -> LinkedBuff;

    fn on_attack_start(&self, state: &mut BuffStackState, ctx: &mut BuffContext<'_>) -> Option<BuffChange>;

    fn on_target_killed(&self, state: &mut BuffStackState, ctx: &mut BuffContext<'_>) -> Option<BuffChange>;

    fn on_attack_end(&self, state: &mut BuffStackState, ctx: &mut BuffContext<'_>) -> Option<BuffChange>;
}

/// Buff kind without mechanics yet
#[derive(Debug, Clone, Copy)]
pub struct Dormant(pub LinkedBuff);

impl BuffBehavior for Dormant {
    fn kind(&self) -> LinkedBuff {
        self.0
    }

    fn on_attack_start(&self, _: &mut BuffStackState, _: &mut BuffContext<'_>) -> Option<BuffChange> {
        None
    }

    fn on_target_killed(&self, _: &mut BuffStackState, _: &mut BuffContext<'_>) -> Option<BuffChange> {
        None
    }

    fn on_attack_end(&self, _: &mut BuffStackState, _: &mut BuffContext<'_>) -> Option<BuffChange> {
        None
    }
}

static STRIFE: KillChain = KillChain;
static VENGEANCE: Dormant = Dormant(LinkedBuff::Vengeance);
static ARCANA: Dormant = Dormant(LinkedBuff::Arcana);
static PERFECT_DRAW: Dormant = Dormant(LinkedBuff::PerfectDraw);

/// Behaviour table for every buff kind
pub fn behavior_for(buff: LinkedBuff) -> &'static dyn BuffBehavior {
    match buff {
        LinkedBuff::Strife => &STRIFE,
        LinkedBuff::Vengeance => &VENGEANCE,
        LinkedBuff::Arcana => &ARCANA,
        LinkedBuff::PerfectDraw => &PERFECT_DRAW,
    }
}

/// Per-entity buff stacks, one state per buff kind
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuffStacker {
    states: HashMap<LinkedBuff, BuffStackState>,
}

impl BuffStacker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A linked attack started
    pub fn attack_started(&mut self, attack: &AttackDefinition, ctx: &mut BuffContext<'_>) -> Option<BuffChange> {
        let buff = attack.linked_buff?;
        let state = self.states.entry(buff).or_default();
        behavior_for(buff).on_attack_start(state, ctx)
    }

    /// A target died to this entity
    ///
    /// `current_attack` is the attack in progress, `None` when the entity
    /// is not mid-attack; only a linked attack in progress counts.
    pub fn target_killed(
        &mut self,
        current_attack: Option<&AttackDefinition>,
        ctx: &mut BuffContext<'_>,
    ) -> Option<BuffChange> {
        let buff = current_attack?.linked_buff?;
        let state = self.states.entry(buff).or_default();
        behavior_for(buff).on_target_killed(state, ctx)
    }

    /// A linked attack finished
    pub fn attack_ended(&mut self, attack: &AttackDefinition, ctx: &mut BuffContext<'_>) -> Option<BuffChange> {
        let buff = attack.linked_buff?;
        let state = self.states.entry(buff).or_default();
        behavior_for(buff).on_attack_end(state, ctx)
    }

    pub fn state(&self, buff: LinkedBuff) -> Option<&BuffStackState> {
        self.states.get(&buff)
    }

    pub fn stacks(&self, buff: LinkedBuff) -> u32 {
        self.state(buff).map(|s| s.stacks).unwrap_or(0)
    }

    /// Amount `buff` currently has applied to `stat`
    pub fn applied(&self, buff: LinkedBuff, stat: StatType) -> f64 {
        self.state(buff).map(|s| s.applied.get(stat)).unwrap_or(0.0)
    }
}
