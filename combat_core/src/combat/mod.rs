//! Combat world - entities, attack lifecycle and the resolution pass

mod events;
mod result;
mod world;

pub use events::{CombatEvent, CombatObserver};
pub use result::{AttackReport, AttackStart, HitOutcome};
pub use world::CombatWorld;
