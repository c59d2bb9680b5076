//! Area queries - Colliders and radius overlap with per-entity dedupe

use crate::entity::Combatant;
use crate::types::{EntityId, Team};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Sphere collision volume, offset from its owner's position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    #[serde(default)]
    pub offset: DVec3,
    pub radius: f64,
}

impl Collider {
    pub fn new(offset: DVec3, radius: f64) -> Self {
        Collider {
            offset,
            radius: radius.max(0.0),
        }
    }

    /// Sphere centered on the owner
    pub fn sphere(radius: f64) -> Self {
        Collider::new(DVec3::ZERO, radius)
    }

    pub fn center(&self, origin: DVec3) -> DVec3 {
        origin + self.offset
    }

    /// Whether this volume touches the sphere at `center` with `radius`
    pub fn overlaps_sphere(&self, origin: DVec3, center: DVec3, radius: f64) -> bool {
        self.center(origin).distance(center) <= radius + self.radius
    }

    /// Distance from `point` to this volume's surface, 0 when inside
    pub fn surface_distance(&self, origin: DVec3, point: DVec3) -> f64 {
        (self.center(origin).distance(point) - self.radius).max(0.0)
    }
}

/// Which teams a query may return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "team", rename_all = "snake_case")]
pub enum TargetFilter {
    #[default]
    Any,
    Team(Team),
    NotTeam(Team),
}

impl TargetFilter {
    pub fn matches(&self, team: Team) -> bool {
        match self {
            TargetFilter::Any => true,
            TargetFilter::Team(t) => *t == team,
            TargetFilter::NotTeam(t) => *t != team,
        }
    }

    /// Filter that hits everyone hostile to `team`
    pub fn hostile_to(team: Team) -> Self {
        TargetFilter::NotTeam(team)
    }
}

/// Collect living entities whose colliders touch the sphere at `center`.
///
/// Every collision volume is tested, but each entity appears at most once,
/// in the order the entities are yielded.
pub fn query_area<'a>(
    entities: impl IntoIterator<Item = &'a Combatant>,
    center: DVec3,
    radius: f64,
    filter: TargetFilter,
) -> Vec<EntityId> {
    let mut seen = HashSet::new();
    let mut hits = Vec::new();

    let volumes = entities
        .into_iter()
        .filter(|c| c.is_alive() && filter.matches(c.team))
        .flat_map(|c| c.colliders.iter().map(move |collider| (c, collider)));

    for (combatant, collider) in volumes {
        if collider.overlaps_sphere(combatant.position, center, radius)
            && seen.insert(combatant.id)
        {
            hits.push(combatant.id);
        }
    }

    hits
}
