//! ActiveStatus - A status instance running on an entity

use crate::types::{EntityId, StatusKind};
use serde::{Deserialize, Serialize};

/// Slack for accumulated float error when comparing timers
pub(crate) const TIMER_EPSILON: f64 = 1e-9;

/// Shortest burn interval the engine will run, whatever the caller asks for
pub const MIN_BURN_INTERVAL: f64 = 1e-3;

/// An applied status instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveStatus {
    pub kind: StatusKind,
    /// Time left on the countdown
    pub remaining_seconds: f64,
    /// Slow percent, shred amount, or burn damage per tick
    pub magnitude: f64,
    /// Time banked toward the next burn tick
    pub tick_accumulator: f64,
    /// Burn only: seconds between ticks
    pub tick_interval: f64,
    /// Burn only: ticks still to fire
    pub ticks_remaining: u32,
    /// Entity that applied this instance, if any
    pub source: Option<EntityId>,
    /// Modifier delta this instance is currently holding on the entity
    applied_delta: f64,
}

impl ActiveStatus {
    /// New slow or armor-shred instance. The caller applies the delta.
    pub fn refreshing(
        kind: StatusKind,
        magnitude: f64,
        duration: f64,
        source: Option<EntityId>,
    ) -> Self {
        ActiveStatus {
            kind,
            remaining_seconds: duration,
            magnitude,
            tick_accumulator: 0.0,
            tick_interval: 0.0,
            ticks_remaining: 0,
            source,
            applied_delta: -magnitude,
        }
    }

    /// New burn timer firing `ceil(duration / interval)` ticks.
    ///
    /// `interval` is floored at [`MIN_BURN_INTERVAL`].
    pub fn burn(tick_damage: f64, interval: f64, duration: f64, source: Option<EntityId>) -> Self {
        let interval = interval.max(MIN_BURN_INTERVAL);
        ActiveStatus {
            kind: StatusKind::Burn,
            remaining_seconds: duration,
            magnitude: tick_damage,
            tick_accumulator: 0.0,
            tick_interval: interval,
            ticks_remaining: burn_tick_count(duration, interval),
            source,
            applied_delta: 0.0,
        }
    }

    /// Delta this instance has added to the entity's modifier
    pub fn applied_delta(&self) -> f64 {
        self.applied_delta
    }

    pub(crate) fn set_applied_delta(&mut self, delta: f64) {
        self.applied_delta = delta;
    }

    pub fn is_active(&self) -> bool {
        match self.kind {
            StatusKind::Burn => self.ticks_remaining > 0,
            _ => self.remaining_seconds > TIMER_EPSILON,
        }
    }

    /// Advance the countdown; returns how many burn ticks fired
    pub fn advance(&mut self, delta_time: f64) -> u32 {
        self.remaining_seconds -= delta_time;
        if self.kind != StatusKind::Burn {
            return 0;
        }

        self.tick_accumulator += delta_time;
        let due = ((self.tick_accumulator + TIMER_EPSILON) / self.tick_interval).floor();
        let fired = (due.max(0.0) as u32).min(self.ticks_remaining);
        self.tick_accumulator -= fired as f64 * self.tick_interval;
        self.ticks_remaining -= fired;
        fired
    }

    /// Total burn damage still to come, before armor
    pub fn pending_damage(&self) -> f64 {
        match self.kind {
            StatusKind::Burn => self.ticks_remaining as f64 * self.magnitude,
            _ => 0.0,
        }
    }
}

/// Ticks a burn fires while elapsed < duration
pub fn burn_tick_count(duration: f64, interval: f64) -> u32 {
    if duration <= 0.0 || interval <= 0.0 {
        return 0;
    }
    (duration / interval - TIMER_EPSILON).ceil().max(0.0) as u32
}
