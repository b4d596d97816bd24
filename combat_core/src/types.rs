//! Identifiers and simulation time

use serde::{Deserialize, Serialize};
use std::fmt;

/// Simulation time in seconds
pub type SimTime = f64;

/// Handle of an entity living in a `CombatWorld`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// Monotonic simulation clock advanced once per host tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimClock {
    now: SimTime,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Advance by `delta` seconds. Negative deltas are ignored so time never
    /// runs backwards.
    pub fn advance(&mut self, delta: f64) -> SimTime {
        if delta > 0.0 {
            self.now += delta;
        }
        self.now
    }
}
