//! types_core - Shared vocabulary for the combat engine
//!
//! Stat identifiers, attack definitions and spawn-time base stats. Everything
//! here is plain data that loadout files deserialize into.

pub mod attack;
pub mod stats;
pub mod types;

pub use attack::AttackDefinition;
pub use stats::{BaseStats, StatMap};
pub use types::{AttackShape, LinkedBuff, StatType};
