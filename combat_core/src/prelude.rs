//! Prelude module for convenient imports
//!
//! ```rust
//! use combat_core::prelude::*;
//! ```

// Core types
pub use crate::stat_table::{DamageTaken, ModifierHandle, StatTable};
pub use crate::types::{EntityId, SimTime};
pub use crate::CombatError;

// World
pub use crate::combat::{AttackReport, AttackStart, CombatEvent, CombatObserver, CombatWorld};

// Actions and buffs
pub use crate::actions::{ActionSet, LungePlan};
pub use crate::buffs::{BuffChange, BuffStacker};

// Shapes
pub use crate::shape::{AttackAim, CandidateQuery, ColliderShape, LayerMask, SceneQuery};

// Damage
pub use crate::damage::{DamageResolver, OutgoingDamage};

// Config
pub use crate::config::GameConstants;

// Shared data types
pub use types_core::{AttackDefinition, AttackShape, BaseStats, LinkedBuff, StatType};
