//! combat_core - Engine-agnostic combat and stat resolution
//!
//! This library provides:
//! - StatTable: Per-entity stats with attribute scaling, timed modifiers and health
//! - DamageResolver: Outgoing damage with crit rollover
//! - BuffStacker: Class buffs driven by linked attacks (kill-chain stacking)
//! - AttackShapeResolver: Cone, line and radial hit tests over a host query
//! - CombatWorld: Entities, attack lifecycle, observers and the simulation tick
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use combat_core::prelude::*;
//! use glam::Vec3;
//!
//! let mut world = CombatWorld::with_seed(GameConstants::default(), 7);
//! let hero = world.spawn(&BaseStats::default(), ActionSet::default());
//! let goblin = world.spawn(&BaseStats::default(), ActionSet::default());
//!
//! let mut scene = SceneQuery::new();
//! scene.insert(goblin, Vec3::new(0.0, 0.0, 1.5), ColliderShape::Point);
//!
//! let slash = AttackDefinition::cone("slash", 2.0, 90.0);
//! let aim = AttackAim::new(Vec3::ZERO, Vec3::Z);
//! world.begin_attack(hero, slash.clone(), &aim)?;
//! let report = world.perform_attack(hero, &slash, &aim, &scene)?;
//! world.end_attack(hero)?;
//! println!("Dealt {} damage!", report.total_damage());
//! ```

pub mod actions;
pub mod buffs;
pub mod combat;
pub mod config;
pub mod damage;
pub mod prelude;
pub mod shape;
pub mod stat_table;
pub mod types;

// Core API - what most users need
pub use combat::{AttackReport, AttackStart, CombatEvent, CombatObserver, CombatWorld, HitOutcome};
pub use stat_table::{DamageTaken, StatTable};
pub use types::{EntityId, SimClock, SimTime};

// Resolvers
pub use buffs::{BuffChange, BuffStacker};
pub use damage::{DamageResolver, OutgoingDamage};
pub use shape::{AttackAim, AttackShapeResolver, CandidateQuery, SceneQuery};

// Configuration
pub use config::{ConfigError, GameConstants};

// Re-export the shared data types
pub use archetype_core::{Archetype, ArchetypeRegistry};
pub use types_core::{AttackDefinition, AttackShape, BaseStats, LinkedBuff, StatType};

use thiserror::Error;

/// Error driving entities through the combat world
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CombatError {
    #[error("Unknown entity: {0}")]
    UnknownEntity(EntityId),
    #[error("Unknown skill slot: {0}")]
    UnknownSkill(usize),
    #[error("Skill {index} is on cooldown for {remaining:.2}s")]
    SkillOnCooldown { index: usize, remaining: f64 },
    #[error("{0} is already attacking")]
    AlreadyAttacking(EntityId),
    #[error("{0} has no attack in progress")]
    NotAttacking(EntityId),
    #[error("{0} has no combo attacks")]
    NoComboAttacks(EntityId),
}
