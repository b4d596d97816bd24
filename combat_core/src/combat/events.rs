//! Notifications delivered to per-entity observers

use crate::types::EntityId;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::Sender;
use types_core::{LinkedBuff, StatType};

/// Something that happened to an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    HealthChanged { current: f64, max: f64 },
    /// Damage landed; `damage` is what got through defense
    Hit { damage: f64, knockback: Vec3, critical: bool },
    /// Health reached zero. Last event the entity receives.
    Death,
    /// This entity landed the killing blow on `target`
    Killed { target: EntityId },
    AttackStarted { attack: String },
    AttackEnded { attack: String },
    BuffChanged { buff: LinkedBuff, stacks: u32 },
    ModifierExpired { stat: StatType, amount: f64 },
    LungeEnded,
}

/// Receives events for the entity it is subscribed to
pub trait CombatObserver {
    fn notify(&mut self, entity: EntityId, event: &CombatEvent);
}

impl CombatObserver for Sender<(EntityId, CombatEvent)> {
    fn notify(&mut self, entity: EntityId, event: &CombatEvent) {
        if self.send((entity, event.clone())).is_err() {
            tracing::trace!("Observer of {} hung up", entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_sender_forwards_events() {
        let (tx, rx) = mpsc::channel::<(EntityId, CombatEvent)>();
        let mut observer: Box<dyn CombatObserver> = Box::new(tx);
        observer.notify(EntityId(3), &CombatEvent::Death);

        assert_eq!(rx.try_recv().unwrap(), (EntityId(3), CombatEvent::Death));
    }

    #[test]
    fn test_sender_ignores_dropped_receiver() {
        let (mut tx, rx) = mpsc::channel::<(EntityId, CombatEvent)>();
        drop(rx);
        tx.notify(EntityId(1), &CombatEvent::LungeEnded);
    }
}
