//! CombatWorld - owns every combatant and drives attacks and ticks
//!
//! The world is single-threaded and polled. The host calls `tick` once per
//! frame and drives each attack through `begin_attack`, `perform_attack`
//! (when the hitbox frame plays) and `end_attack`. Physics stays on the host
//! side behind `CandidateQuery`.

use super::events::{CombatEvent, CombatObserver};
use super::result::{AttackReport, AttackStart, HitOutcome};
use crate::actions::{plan_lunge, playback_rate, ActionSet};
use crate::buffs::{BuffChange, BuffContext, BuffStacker};
use crate::config::GameConstants;
use crate::damage::DamageResolver;
use crate::shape::{AttackAim, AttackShapeResolver, CandidateQuery};
use crate::stat_table::{DamageTaken, ModifierHandle, StatTable};
use crate::types::{EntityId, SimClock, SimTime};
use crate::CombatError;
use archetype_core::Archetype;
use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use std::fmt;
use types_core::{AttackDefinition, BaseStats, StatType};

/// Everything the world tracks for one entity
struct Combatant {
    stats: StatTable,
    buffs: BuffStacker,
    actions: ActionSet,
    current_attack: Option<AttackDefinition>,
    lunge_until: Option<SimTime>,
    observers: Vec<Box<dyn CombatObserver>>,
}

impl Combatant {
    fn new(stats: StatTable, actions: ActionSet) -> Self {
        Combatant {
            stats,
            buffs: BuffStacker::new(),
            actions,
            current_attack: None,
            lunge_until: None,
            observers: Vec::new(),
        }
    }

    fn emit(&mut self, id: EntityId, event: CombatEvent) {
        for observer in &mut self.observers {
            observer.notify(id, &event);
        }
    }
}

impl fmt::Debug for Combatant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Combatant")
            .field("stats", &self.stats)
            .field("buffs", &self.buffs)
            .field("current_attack", &self.current_attack.as_ref().map(|a| &a.name))
            .field("lunge_until", &self.lunge_until)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

fn buff_event(change: BuffChange) -> CombatEvent {
    CombatEvent::BuffChanged {
        buff: change.buff(),
        stacks: change.stacks(),
    }
}

/// Live combat simulation
#[derive(Debug)]
pub struct CombatWorld {
    constants: GameConstants,
    clock: SimClock,
    rng: ChaCha8Rng,
    next_id: u64,
    entities: BTreeMap<EntityId, Combatant>,
    damage: DamageResolver,
    shapes: AttackShapeResolver,
}

impl CombatWorld {
    /// World with an entropy-seeded RNG
    pub fn new(constants: GameConstants) -> Self {
        Self::with_rng(constants, ChaCha8Rng::from_entropy())
    }

    /// World with a fixed seed, for replays and tests
    pub fn with_seed(constants: GameConstants, seed: u64) -> Self {
        Self::with_rng(constants, ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(constants: GameConstants, rng: ChaCha8Rng) -> Self {
        let damage = DamageResolver::new(constants.crit.clone());
        CombatWorld {
            constants,
            clock: SimClock::new(),
            rng,
            next_id: 0,
            entities: BTreeMap::new(),
            damage,
            shapes: AttackShapeResolver::new(),
        }
    }

    pub fn constants(&self) -> &GameConstants {
        &self.constants
    }

    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn entity_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Add an entity at full health
    pub fn spawn(&mut self, base: &BaseStats, actions: ActionSet) -> EntityId {
        self.next_id += 1;
        let id = EntityId(self.next_id);
        let stats = StatTable::new(base, self.clock.now());
        self.entities.insert(id, Combatant::new(stats, actions));
        tracing::debug!("Spawned {}", id);
        id
    }

    /// Spawn from an archetype; a missing combo reset falls back to the
    /// configured default
    pub fn spawn_archetype(&mut self, archetype: &Archetype) -> EntityId {
        let combo_reset = archetype
            .combo_reset
            .unwrap_or(self.constants.combo.reset_after);
        let actions = ActionSet::new(archetype.combo.clone(), archetype.skills.clone(), combo_reset);
        let id = self.spawn(&archetype.stats, actions);
        tracing::debug!("{} spawned as '{}'", id, archetype.id);
        id
    }

    /// Remove an entity. Its pending modifier reversals and observers are
    /// dropped, so it receives no further events.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        match self.entities.remove(&id) {
            Some(mut combatant) => {
                let dropped = combatant.stats.clear_scheduled();
                tracing::debug!("Despawned {} ({} pending modifiers dropped)", id, dropped);
                true
            }
            None => false,
        }
    }

    pub fn subscribe(&mut self, id: EntityId, observer: Box<dyn CombatObserver>) -> Result<(), CombatError> {
        self.combatant_mut(id)?.observers.push(observer);
        Ok(())
    }

    // =========================================================================
    // Attacks
    // =========================================================================

    /// Start an attack: fires the linked buff's start hook and plans the
    /// lunge for attacks that move to their hitbox
    pub fn begin_attack(
        &mut self,
        id: EntityId,
        attack: AttackDefinition,
        aim: &AttackAim,
    ) -> Result<AttackStart, CombatError> {
        let now = self.clock.now();
        let constants = &self.constants;
        let combatant = self.entities.get_mut(&id).ok_or(CombatError::UnknownEntity(id))?;
        if combatant.current_attack.is_some() {
            return Err(CombatError::AlreadyAttacking(id));
        }

        let lunge = plan_lunge(&attack, &combatant.stats, aim.forward, &constants.lunge);
        combatant.lunge_until = lunge.map(|plan| now + plan.duration);

        let Combatant {
            stats, buffs, actions, ..
        } = &mut *combatant;
        let buff = buffs.attack_started(
            &attack,
            &mut BuffContext {
                stats,
                actions,
                constants,
            },
        );

        combatant.emit(
            id,
            CombatEvent::AttackStarted {
                attack: attack.name.clone(),
            },
        );
        if let Some(change) = buff {
            combatant.emit(id, buff_event(change));
        }

        tracing::debug!("{} started '{}'", id, attack.name);
        let start = AttackStart {
            attack: attack.name.clone(),
            lunge,
            buff,
        };
        combatant.current_attack = Some(attack);
        Ok(start)
    }

    /// Resolve `attack` against the scene
    ///
    /// Hits are applied in the order the shape reports them. Outgoing damage
    /// is rolled from the attacker's stats as they are at each hit, so a
    /// bonus gained from a kill earlier in the pass applies to later targets.
    /// Candidates that are not live entities are skipped.
    pub fn perform_attack(
        &mut self,
        id: EntityId,
        attack: &AttackDefinition,
        aim: &AttackAim,
        query: &dyn CandidateQuery,
    ) -> Result<AttackReport, CombatError> {
        self.combatant(id)?;
        let hits = self.shapes.resolve(id, attack, aim, query);
        let mut report = AttackReport::new(id, attack.name.clone());

        for hit in hits {
            let damage = match self.entities.get(&id) {
                Some(attacker) => {
                    self.damage
                        .calculate_outgoing_damage(&attacker.stats, attack.damage_stat, &mut self.rng)
                }
                None => break,
            };

            let Some(taken) = self.damage_entity(hit.entity, damage.amount, hit.knockback, damage.is_critical) else {
                tracing::warn!("{} hit {} which is not a live entity, skipping", id, hit.entity);
                report.skipped.push(hit.entity);
                continue;
            };
            report.hits.push(HitOutcome {
                target: hit.entity,
                damage,
                taken,
            });

            if taken.killed {
                self.emit(id, CombatEvent::Killed { target: hit.entity });
                self.despawn(hit.entity);
                report.kills.push(hit.entity);
                if let Some(change) = self.credit_kill(id) {
                    report.buff_changes.push(change);
                }
            }
        }

        tracing::debug!(
            "{} '{}': {} hits, {} kills, {:.1} damage",
            id,
            attack.name,
            report.hits.len(),
            report.kills.len(),
            report.total_damage()
        );
        Ok(report)
    }

    /// Finish the attack in progress and fire the linked buff's end hook
    pub fn end_attack(&mut self, id: EntityId) -> Result<Option<BuffChange>, CombatError> {
        let constants = &self.constants;
        let combatant = self.entities.get_mut(&id).ok_or(CombatError::UnknownEntity(id))?;
        let attack = combatant
            .current_attack
            .take()
            .ok_or(CombatError::NotAttacking(id))?;

        let Combatant {
            stats, buffs, actions, ..
        } = &mut *combatant;
        let change = buffs.attack_ended(
            &attack,
            &mut BuffContext {
                stats,
                actions,
                constants,
            },
        );

        combatant.emit(id, CombatEvent::AttackEnded { attack: attack.name });
        if let Some(change) = change {
            combatant.emit(id, buff_event(change));
        }
        Ok(change)
    }

    /// Play the next combo step: start it and resolve it right away
    pub fn trigger_combo(
        &mut self,
        id: EntityId,
        aim: &AttackAim,
        query: &dyn CandidateQuery,
    ) -> Result<AttackReport, CombatError> {
        let now = self.clock.now();
        let combatant = self.combatant_mut(id)?;
        if combatant.current_attack.is_some() {
            return Err(CombatError::AlreadyAttacking(id));
        }
        let attack = combatant
            .actions
            .next_combo(now)
            .ok_or(CombatError::NoComboAttacks(id))?;

        self.begin_attack(id, attack.clone(), aim)?;
        self.perform_attack(id, &attack, aim, query)
    }

    /// Use skill slot `index`: starts its cooldown, then starts and resolves it
    pub fn trigger_skill(
        &mut self,
        id: EntityId,
        index: usize,
        aim: &AttackAim,
        query: &dyn CandidateQuery,
    ) -> Result<AttackReport, CombatError> {
        let combatant = self.combatant_mut(id)?;
        if combatant.current_attack.is_some() {
            return Err(CombatError::AlreadyAttacking(id));
        }
        let attack = combatant.actions.try_skill(index)?;

        self.begin_attack(id, attack.clone(), aim)?;
        self.perform_attack(id, &attack, aim, query)
    }

    /// Damage from a source outside any attack (hazards, scripts)
    ///
    /// Kills despawn the target but credit nobody.
    pub fn apply_damage(&mut self, target: EntityId, raw: f64, knockback: Vec3) -> Result<DamageTaken, CombatError> {
        let taken = self
            .damage_entity(target, raw, knockback, false)
            .ok_or(CombatError::UnknownEntity(target))?;
        if taken.killed {
            self.despawn(target);
        }
        Ok(taken)
    }

    fn damage_entity(&mut self, target: EntityId, amount: f64, knockback: Vec3, critical: bool) -> Option<DamageTaken> {
        let combatant = self.entities.get_mut(&target)?;
        let taken = combatant.stats.take_damage(amount, knockback);

        combatant.emit(
            target,
            CombatEvent::HealthChanged {
                current: taken.health_after,
                max: taken.max_health,
            },
        );
        combatant.emit(
            target,
            CombatEvent::Hit {
                damage: taken.final_damage,
                knockback,
                critical,
            },
        );
        if taken.killed {
            tracing::debug!("{} died", target);
            combatant.emit(target, CombatEvent::Death);
        }
        Some(taken)
    }

    /// Kill credit counts toward the attack the killer has in progress
    fn credit_kill(&mut self, killer: EntityId) -> Option<BuffChange> {
        let constants = &self.constants;
        let combatant = self.entities.get_mut(&killer)?;

        let Combatant {
            stats,
            buffs,
            actions,
            current_attack,
            ..
        } = &mut *combatant;
        let change = buffs.target_killed(
            current_attack.as_ref(),
            &mut BuffContext {
                stats,
                actions,
                constants,
            },
        );

        if let Some(change) = change {
            combatant.emit(killer, buff_event(change));
        }
        change
    }

    // =========================================================================
    // Time
    // =========================================================================

    /// Advance the clock by `delta` seconds, reverting expired modifiers,
    /// counting cooldowns down and ending finished lunges
    pub fn tick(&mut self, delta: f64) -> SimTime {
        let before = self.clock.now();
        let now = self.clock.advance(delta);
        let elapsed = now - before;

        for (&id, combatant) in self.entities.iter_mut() {
            for expired in combatant.stats.tick(now) {
                tracing::trace!("{} modifier expired: {} {:+}", id, expired.stat, -expired.amount);
                combatant.emit(
                    id,
                    CombatEvent::ModifierExpired {
                        stat: expired.stat,
                        amount: expired.amount,
                    },
                );
                if expired.stat == StatType::MaxHealth {
                    let event = CombatEvent::HealthChanged {
                        current: combatant.stats.current_health(),
                        max: combatant.stats.stat_value(StatType::MaxHealth),
                    };
                    combatant.emit(id, event);
                }
            }

            combatant.actions.tick(elapsed);

            if combatant.lunge_until.is_some_and(|end| now >= end) {
                combatant.lunge_until = None;
                combatant.emit(id, CombatEvent::LungeEnded);
            }
        }
        now
    }

    // =========================================================================
    // Stats
    // =========================================================================

    /// Add a stat modifier; with `duration > 0` it reverts on a later tick
    pub fn add_modifier(
        &mut self,
        id: EntityId,
        stat: StatType,
        amount: f64,
        duration: f64,
    ) -> Result<Option<ModifierHandle>, CombatError> {
        let combatant = self.combatant_mut(id)?;
        let handle = combatant.stats.add_modifier(stat, amount, duration);
        if stat == StatType::MaxHealth {
            let event = CombatEvent::HealthChanged {
                current: combatant.stats.current_health(),
                max: combatant.stats.stat_value(StatType::MaxHealth),
            };
            combatant.emit(id, event);
        }
        Ok(handle)
    }

    pub fn remove_modifier(&mut self, id: EntityId, stat: StatType, amount: f64) -> Result<(), CombatError> {
        self.combatant_mut(id)?.stats.remove_modifier(stat, amount);
        Ok(())
    }

    pub fn stat_value(&self, id: EntityId, stat: StatType) -> Option<f64> {
        self.entities.get(&id).map(|c| c.stats.stat_value(stat))
    }

    pub fn current_health(&self, id: EntityId) -> Option<f64> {
        self.entities.get(&id).map(|c| c.stats.current_health())
    }

    pub fn stats(&self, id: EntityId) -> Option<&StatTable> {
        self.entities.get(&id).map(|c| &c.stats)
    }

    pub fn buffs(&self, id: EntityId) -> Option<&BuffStacker> {
        self.entities.get(&id).map(|c| &c.buffs)
    }

    pub fn actions(&self, id: EntityId) -> Option<&ActionSet> {
        self.entities.get(&id).map(|c| &c.actions)
    }

    pub fn is_attacking(&self, id: EntityId) -> bool {
        self.current_attack(id).is_some()
    }

    pub fn current_attack(&self, id: EntityId) -> Option<&AttackDefinition> {
        self.entities.get(&id).and_then(|c| c.current_attack.as_ref())
    }

    pub fn is_lunging(&self, id: EntityId) -> bool {
        self.entities.get(&id).is_some_and(|c| c.lunge_until.is_some())
    }

    /// Animation rate for a clip driven by `stat` (AttackSpeed or MoveSpeed)
    pub fn playback_rate(&self, id: EntityId, stat: StatType, clip_rate: f64) -> Option<f64> {
        self.entities
            .get(&id)
            .map(|c| playback_rate(&c.stats, stat, clip_rate, &self.constants.playback))
    }

    fn combatant(&self, id: EntityId) -> Result<&Combatant, CombatError> {
        self.entities.get(&id).ok_or(CombatError::UnknownEntity(id))
    }

    fn combatant_mut(&mut self, id: EntityId) -> Result<&mut Combatant, CombatError> {
        self.entities.get_mut(&id).ok_or(CombatError::UnknownEntity(id))
    }

    fn emit(&mut self, id: EntityId, event: CombatEvent) {
        if let Some(combatant) = self.entities.get_mut(&id) {
            combatant.emit(id, event);
        }
    }
}
