//! ModifierLedger - Scheduled reversal of timed stat modifiers

use crate::types::SimTime;
use serde::{Deserialize, Serialize};
use types_core::StatType;

/// Handle to a scheduled modifier reversal, used for cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModifierHandle(pub u64);

/// A modifier whose amount is subtracted back once `fire_at` is reached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedModifier {
    pub handle: ModifierHandle,
    pub stat: StatType,
    pub amount: f64,
    /// Simulation time at which the reversal fires
    pub fire_at: SimTime,
}

impl TimedModifier {
    /// Time left before reversal, as seen from `now`
    pub fn remaining(&self, now: SimTime) -> f64 {
        (self.fire_at - now).max(0.0)
    }
}

/// Per-entity list of pending modifier reversals
///
/// Polled once per tick via `advance_to`; nothing here runs on its own.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModifierLedger {
    pending: Vec<TimedModifier>,
    now: SimTime,
    next_handle: u64,
}

impl ModifierLedger {
    /// Create an empty ledger starting at `now`
    pub fn new(now: SimTime) -> Self {
        ModifierLedger {
            pending: Vec::new(),
            now,
            next_handle: 0,
        }
    }

    /// Time the ledger was last advanced to
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Schedule the reversal of `amount` on `stat` after `duration` seconds
    pub fn schedule(&mut self, stat: StatType, amount: f64, duration: f64) -> ModifierHandle {
        let handle = ModifierHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.push(TimedModifier {
            handle,
            stat,
            amount,
            fire_at: self.now + duration,
        });
        handle
    }

    /// Drop a scheduled reversal. Returns the entry if it was still pending.
    pub fn cancel(&mut self, handle: ModifierHandle) -> Option<TimedModifier> {
        let pos = self.pending.iter().position(|m| m.handle == handle)?;
        Some(self.pending.remove(pos))
    }

    /// Move the ledger's clock to `now` and take every entry that is due,
    /// ordered by fire time then scheduling order.
    pub fn advance_to(&mut self, now: SimTime) -> Vec<TimedModifier> {
        if now > self.now {
            self.now = now;
        }

        let current = self.now;
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|m| m.fire_at <= current);
        self.pending = pending;

        due.sort_by(|a, b| {
            a.fire_at
                .total_cmp(&b.fire_at)
                .then_with(|| a.handle.cmp(&b.handle))
        });
        due
    }

    /// Drop every pending reversal without firing it
    pub fn clear(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    pub fn pending(&self) -> &[TimedModifier] {
        &self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_fires_at_duration() {
        let mut ledger = ModifierLedger::new(10.0);
        ledger.schedule(StatType::MoveSpeed, 2.0, 3.0);

        assert!(ledger.advance_to(12.9).is_empty());
        let due = ledger.advance_to(13.0);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].stat, StatType::MoveSpeed);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_due_entries_ordered_by_fire_time() {
        let mut ledger = ModifierLedger::new(0.0);
        let late = ledger.schedule(StatType::Defense, 1.0, 5.0);
        let early = ledger.schedule(StatType::Luck, 1.0, 2.0);

        let due = ledger.advance_to(10.0);
        assert_eq!(due.iter().map(|m| m.handle).collect::<Vec<_>>(), vec![early, late]);
    }

    #[test]
    fn test_cancel() {
        let mut ledger = ModifierLedger::new(0.0);
        let handle = ledger.schedule(StatType::CritRate, 10.0, 1.0);

        assert!(ledger.cancel(handle).is_some());
        assert!(ledger.cancel(handle).is_none());
        assert!(ledger.advance_to(5.0).is_empty());
    }

    #[test]
    fn test_clock_never_rewinds() {
        let mut ledger = ModifierLedger::new(4.0);
        ledger.advance_to(1.0);
        assert!((ledger.now() - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_remaining() {
        let mut ledger = ModifierLedger::new(1.0);
        ledger.schedule(StatType::Agility, 3.0, 2.5);
        let entry = &ledger.pending()[0];
        assert!((entry.remaining(2.0) - 1.5).abs() < f64::EPSILON);
        assert!((entry.remaining(9.0) - 0.0).abs() < f64::EPSILON);
    }
}
