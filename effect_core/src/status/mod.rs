//! Status engine - slow, burn and armor-shred timers

mod active;
mod table;

pub use active::{burn_tick_count, ActiveStatus, MIN_BURN_INTERVAL};
pub use table::{StatusChange, StatusTable};

use crate::types::StatusKind;
use serde::{Deserialize, Serialize};

/// Result of advancing one entity's statuses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusTickResult {
    /// Burn damage actually dealt after armor
    pub burn_damage: f64,
    /// Number of burn ticks that fired
    pub burn_ticks: u32,
    /// Statuses that ended this tick (one entry per burn timer)
    pub expired: Vec<StatusKind>,
    /// Whether a burn tick landed the killing blow
    pub killed: bool,
}

impl StatusTickResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_burn_tick(&mut self, dealt: f64, killing_blow: bool) {
        self.burn_damage += dealt;
        self.burn_ticks += 1;
        self.killed |= killing_blow;
    }

    /// Whether anything observable happened
    pub fn is_empty(&self) -> bool {
        self.burn_ticks == 0 && self.expired.is_empty()
    }
}
