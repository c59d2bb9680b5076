//! Single-target selection for towers and units

use super::TargetFilter;
use crate::entity::Combatant;
use crate::types::EntityId;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// How to pick one target among everything in range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetPriority {
    #[default]
    Nearest,
    LowestHealth,
    /// Highest current HP
    Strongest,
}

/// Pick the best living target within `range` of `origin`.
///
/// Range is measured to the nearest collider surface. Ties go to the lower
/// entity id.
pub fn select_target<'a>(
    entities: impl IntoIterator<Item = &'a Combatant>,
    origin: DVec3,
    range: f64,
    filter: TargetFilter,
    priority: TargetPriority,
) -> Option<EntityId> {
    entities
        .into_iter()
        .filter(|c| c.is_alive() && filter.matches(c.team))
        .map(|c| (c, c.distance_to(origin)))
        .filter(|(_, distance)| *distance <= range)
        .min_by(|(a, da), (b, db)| {
            let by_priority = match priority {
                TargetPriority::Nearest => da.partial_cmp(db),
                TargetPriority::LowestHealth => {
                    a.health.current_hp.partial_cmp(&b.health.current_hp)
                }
                TargetPriority::Strongest => b.health.current_hp.partial_cmp(&a.health.current_hp),
            };
            by_priority
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        })
        .map(|(c, _)| c.id)
}
