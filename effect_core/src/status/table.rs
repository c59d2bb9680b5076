//! StatusTable - Per-entity status state keyed by kind

use super::active::ActiveStatus;
use super::StatusTickResult;
use crate::effect::StatusSpec;
use crate::entity::{Health, Mobility};
use crate::types::{EntityId, StatusKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What an application did to the table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatusChange {
    /// Absent -> Active
    Applied { magnitude: f64, duration: f64 },
    /// Active -> Active on slow/shred
    Refreshed {
        magnitude: f64,
        remaining: f64,
        magnitude_raised: bool,
    },
    /// A new independent burn timer; `active_burns` includes it
    Stacked { active_burns: usize },
}

/// Active statuses on one entity.
///
/// Slow and armor-shred hold at most one instance each and refresh in place.
/// Burns are independent timers that are never merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusTable {
    refreshing: BTreeMap<StatusKind, ActiveStatus>,
    burns: Vec<ActiveStatus>,
}

impl StatusTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a validated status spec
    pub fn apply(
        &mut self,
        spec: &StatusSpec,
        source: Option<EntityId>,
        health: &mut Health,
        mobility: &mut Mobility,
    ) -> StatusChange {
        if !spec.kind.refreshes_in_place() {
            return self.apply_burn(spec.magnitude, spec.tick_interval, spec.duration, source);
        }
        self.apply_refreshing(spec.kind, spec.magnitude, spec.duration, source, |delta| {
            adjust_modifier(spec.kind, delta, health, mobility)
        })
    }

    /// Slow movement by `percent` (clamped to 0..=1)
    pub fn apply_slow(
        &mut self,
        percent: f64,
        duration: f64,
        source: Option<EntityId>,
        mobility: &mut Mobility,
    ) -> StatusChange {
        self.apply_refreshing(StatusKind::Slow, percent, duration, source, |delta| {
            mobility.adjust_move(delta)
        })
    }

    /// Remove `amount` (clamped to 0..=1) from armor
    pub fn apply_armor_shred(
        &mut self,
        amount: f64,
        duration: f64,
        source: Option<EntityId>,
        health: &mut Health,
    ) -> StatusChange {
        self.apply_refreshing(StatusKind::ArmorShred, amount, duration, source, |delta| {
            health.adjust_armor(delta)
        })
    }

    /// Start another burn timer alongside any already running
    pub fn apply_burn(
        &mut self,
        tick_damage: f64,
        interval: f64,
        duration: f64,
        source: Option<EntityId>,
    ) -> StatusChange {
        self.burns
            .push(ActiveStatus::burn(tick_damage, interval, duration, source));
        log::debug!(
            "burn started: {} per {}s for {}s ({} running)",
            tick_damage,
            interval,
            duration,
            self.burns.len()
        );
        StatusChange::Stacked {
            active_burns: self.burns.len(),
        }
    }

    fn apply_refreshing(
        &mut self,
        kind: StatusKind,
        magnitude: f64,
        duration: f64,
        source: Option<EntityId>,
        mut adjust: impl FnMut(f64),
    ) -> StatusChange {
        let magnitude = if magnitude.is_nan() { 0.0 } else { magnitude.clamp(0.0, 1.0) };

        match self.refreshing.get_mut(&kind) {
            None => {
                let status = ActiveStatus::refreshing(kind, magnitude, duration, source);
                adjust(status.applied_delta());
                self.refreshing.insert(kind, status);
                log::debug!("{} applied: magnitude {} for {}s", kind, magnitude, duration);
                StatusChange::Applied { magnitude, duration }
            }
            Some(existing) => {
                let raised = magnitude > existing.magnitude;
                if raised {
                    adjust(-existing.applied_delta());
                    existing.magnitude = magnitude;
                    existing.set_applied_delta(-magnitude);
                    adjust(existing.applied_delta());
                    existing.source = source;
                }
                existing.remaining_seconds = existing.remaining_seconds.max(duration);
                log::debug!(
                    "{} refreshed: magnitude {} ({}), {}s left",
                    kind,
                    existing.magnitude,
                    if raised { "raised" } else { "kept" },
                    existing.remaining_seconds
                );
                StatusChange::Refreshed {
                    magnitude: existing.magnitude,
                    remaining: existing.remaining_seconds,
                    magnitude_raised: raised,
                }
            }
        }
    }

    /// Advance every status by `delta_time`.
    ///
    /// Burn ticks are dealt through `health` (armor applies). Expired
    /// statuses are removed and their modifier deltas reversed before this
    /// returns.
    pub fn tick(
        &mut self,
        delta_time: f64,
        health: &mut Health,
        mobility: &mut Mobility,
        armor_cap: f64,
    ) -> StatusTickResult {
        let mut result = StatusTickResult::new();

        for burn in self.burns.iter_mut() {
            let fired = burn.advance(delta_time);
            for _ in 0..fired {
                let taken = health.take_damage(burn.magnitude, armor_cap);
                result.add_burn_tick(taken.dealt_amount, taken.is_killing_blow);
            }
        }
        let burns_before = self.burns.len();
        self.burns.retain(|b| b.is_active());
        for _ in self.burns.len()..burns_before {
            result.expired.push(StatusKind::Burn);
        }

        let mut expired = Vec::new();
        for (kind, status) in self.refreshing.iter_mut() {
            status.advance(delta_time);
            if !status.is_active() {
                expired.push(*kind);
            }
        }
        for kind in expired {
            if let Some(status) = self.refreshing.remove(&kind) {
                reverse(&status, health, mobility);
                log::debug!("{} expired", kind);
                result.expired.push(kind);
            }
        }

        result
    }

    /// Remove every status, reversing modifier deltas
    pub fn clear(&mut self, health: &mut Health, mobility: &mut Mobility) {
        for (_, status) in std::mem::take(&mut self.refreshing) {
            reverse(&status, health, mobility);
        }
        self.burns.clear();
    }

    pub fn get(&self, kind: StatusKind) -> Option<&ActiveStatus> {
        if kind.refreshes_in_place() {
            self.refreshing.get(&kind)
        } else {
            self.burns.first()
        }
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn burns(&self) -> &[ActiveStatus] {
        &self.burns
    }

    /// All active instances, refreshing kinds first
    pub fn iter(&self) -> impl Iterator<Item = &ActiveStatus> {
        self.refreshing.values().chain(self.burns.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.refreshing.is_empty() && self.burns.is_empty()
    }
}

fn reverse(status: &ActiveStatus, health: &mut Health, mobility: &mut Mobility) {
    adjust_modifier(status.kind, -status.applied_delta(), health, mobility);
}

/// Route a modifier delta to the stat the kind affects
fn adjust_modifier(kind: StatusKind, delta: f64, health: &mut Health, mobility: &mut Mobility) {
    match kind {
        StatusKind::Slow => mobility.adjust_move(delta),
        StatusKind::ArmorShred => health.adjust_armor(delta),
        StatusKind::Burn => {}
    }
}
