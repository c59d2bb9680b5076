//! Projectile - In-flight carrier for an effect list

use super::{Launch, TargetFilter, Trajectory};
use crate::effect::{EffectDescriptor, EffectSchema, TowerDefinition};
use crate::types::EntityId;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a projectile in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectileId(pub u32);

impl fmt::Display for ProjectileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// What a projectile is aimed at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ProjectileTarget {
    Entity(EntityId),
    Point(DVec3),
}

/// Everything needed to fire a projectile
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileLaunch {
    pub source: Option<EntityId>,
    pub start: DVec3,
    pub target: ProjectileTarget,
    pub speed: f64,
    pub trajectory: Trajectory,
    pub effects: Vec<EffectDescriptor>,
    /// Explosion radius; single target when absent
    pub impact_radius: Option<f64>,
    /// Team filter for area impacts
    pub filter: TargetFilter,
    /// Initial direction; straight at the target when absent
    pub heading: Option<DVec3>,
}

impl ProjectileLaunch {
    /// Single-target direct shot
    pub fn new(
        start: DVec3,
        target: ProjectileTarget,
        speed: f64,
        effects: Vec<EffectDescriptor>,
    ) -> Self {
        ProjectileLaunch {
            source: None,
            start,
            target,
            speed,
            trajectory: Trajectory::Direct,
            effects,
            impact_radius: None,
            filter: TargetFilter::Any,
            heading: None,
        }
    }

    /// Shot described by a tower definition; falls back to a direct shot at `default_speed`
    pub fn from_tower(
        tower: &TowerDefinition,
        source: Option<EntityId>,
        start: DVec3,
        target: ProjectileTarget,
        default_speed: f64,
    ) -> Self {
        let mut launch =
            ProjectileLaunch::new(start, target, default_speed, tower.normalized_effects());
        launch.source = source;
        if let Some(projectile) = &tower.projectile {
            launch.speed = projectile.speed;
            launch.trajectory = projectile.trajectory;
            launch.impact_radius = projectile.impact_radius;
        }
        launch
    }

    pub fn with_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_trajectory(mut self, trajectory: Trajectory) -> Self {
        self.trajectory = trajectory;
        self
    }

    pub fn with_impact_radius(mut self, radius: f64, filter: TargetFilter) -> Self {
        self.impact_radius = Some(radius);
        self.filter = filter;
        self
    }

    pub fn with_heading(mut self, heading: DVec3) -> Self {
        self.heading = Some(heading);
        self
    }
}

/// A projectile in flight
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: ProjectileId,
    pub source: Option<EntityId>,
    pub target: ProjectileTarget,
    pub trajectory: Trajectory,
    pub launch: Launch,
    /// Where the projectile will land; follows the target when homing
    pub aim_point: DVec3,
    pub elapsed: f64,
    pub position: DVec3,
    pub effects: Vec<EffectDescriptor>,
    pub impact_radius: Option<f64>,
    pub filter: TargetFilter,
}

impl Projectile {
    /// Fire toward `aim_point` (the target's position at launch)
    pub fn fire(
        id: ProjectileId,
        spec: ProjectileLaunch,
        aim_point: DVec3,
        min_flight_time: f64,
    ) -> Self {
        let mut launch = Launch::toward(spec.start, aim_point, spec.speed, min_flight_time);
        if let Some(heading) = spec.heading {
            launch = launch.with_heading(heading);
        }
        Projectile {
            id,
            source: spec.source,
            target: spec.target,
            trajectory: spec.trajectory,
            launch,
            aim_point,
            elapsed: 0.0,
            position: spec.start,
            effects: spec.effects,
            impact_radius: spec.impact_radius,
            filter: spec.filter,
        }
    }

    /// Advance along the trajectory; returns true on arrival.
    ///
    /// `live_target` is the target entity's current position, if it still
    /// exists. Only tracking trajectories move their aim point.
    pub fn advance(&mut self, delta_time: f64, live_target: Option<DVec3>) -> bool {
        if self.trajectory.tracks_target() {
            if let Some(position) = live_target {
                self.aim_point = position;
            }
        }
        self.elapsed = (self.elapsed + delta_time).min(self.launch.flight_time);
        self.position = self
            .trajectory
            .position(&self.launch, self.aim_point, self.elapsed);
        self.has_arrived()
    }

    pub fn has_arrived(&self) -> bool {
        self.elapsed >= self.launch.flight_time
    }

    pub fn progress(&self) -> f64 {
        self.launch.progress(self.elapsed)
    }
}
