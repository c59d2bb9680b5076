//! Combatant - A live entity that effects can target

use super::{Health, Mobility};
use crate::effect::{HeroDefinition, StatusSpec, UnitDefinition};
use crate::status::{StatusChange, StatusTable, StatusTickResult};
use crate::targeting::Collider;
use crate::types::{EntityId, Team};
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Radius used when a combatant is built without explicit colliders
pub const DEFAULT_COLLIDER_RADIUS: f64 = 0.5;

/// Complete combat state for one entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub id: EntityId,
    pub name: String,
    pub team: Team,
    pub position: DVec3,
    pub health: Health,
    pub mobility: Mobility,
    /// Collision volumes relative to `position`; may overlap
    pub colliders: Vec<Collider>,
    #[serde(default)]
    pub statuses: StatusTable,
}

impl Combatant {
    /// Create a combatant with a single default collider
    pub fn new(
        id: EntityId,
        name: impl Into<String>,
        team: Team,
        position: DVec3,
        health: Health,
    ) -> Self {
        Combatant {
            id,
            name: name.into(),
            team,
            position,
            health,
            mobility: Mobility::default(),
            colliders: vec![Collider::sphere(DEFAULT_COLLIDER_RADIUS)],
            statuses: StatusTable::new(),
        }
    }

    /// Spawn from a unit archetype
    pub fn from_unit(id: EntityId, team: Team, position: DVec3, unit: &UnitDefinition) -> Self {
        let health = Health::new(unit.max_hp, unit.armor);
        let mut combatant = Combatant::new(id, unit.name.clone(), team, position, health);
        combatant.mobility = Mobility::new(unit.move_speed);
        combatant.colliders = vec![Collider::sphere(unit.collider_radius)];
        combatant
    }

    /// Spawn from a hero definition
    pub fn from_hero(id: EntityId, team: Team, position: DVec3, hero: &HeroDefinition) -> Self {
        let health = Health::new(hero.max_hp, hero.armor);
        let mut combatant = Combatant::new(id, hero.name.clone(), team, position, health);
        combatant.mobility = Mobility::new(hero.move_speed);
        combatant
    }

    pub fn with_mobility(mut self, mobility: Mobility) -> Self {
        self.mobility = mobility;
        self
    }

    /// Replace the collider set
    pub fn with_colliders(mut self, colliders: Vec<Collider>) -> Self {
        self.colliders = colliders;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.health.is_alive()
    }

    /// Apply a validated status to this entity
    pub fn apply_status(&mut self, spec: &StatusSpec, source: Option<EntityId>) -> StatusChange {
        self.statuses
            .apply(spec, source, &mut self.health, &mut self.mobility)
    }

    /// Advance this entity's statuses
    pub fn tick_statuses(&mut self, delta_time: f64, armor_cap: f64) -> StatusTickResult {
        self.statuses
            .tick(delta_time, &mut self.health, &mut self.mobility, armor_cap)
    }

    /// Strip every status, restoring armor and movement
    pub fn cleanse(&mut self) {
        self.statuses.clear(&mut self.health, &mut self.mobility);
    }

    /// Distance from `point` to the nearest collider surface (0 inside)
    pub fn distance_to(&self, point: DVec3) -> f64 {
        if self.colliders.is_empty() {
            return self.position.distance(point);
        }
        self.colliders
            .iter()
            .map(|c| c.surface_distance(self.position, point))
            .fold(f64::INFINITY, f64::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StatusKind;

    fn grunt() -> Combatant {
        Combatant::new(EntityId(1), "Grunt", Team::Attacker, DVec3::ZERO, Health::new(100.0, 0.2))
    }

    #[test]
    fn test_status_round_trip_restores_baseline() {
        let mut unit = grunt();
        let shred = StatusSpec {
            kind: StatusKind::ArmorShred,
            duration: 1.5,
            magnitude: 0.3,
            tick_interval: 0.0,
            chance: 1.0,
        };
        let before = unit.health.effective_armor(0.9);
        unit.apply_status(&shred, None);
        assert!(unit.health.effective_armor(0.9) < before);

        unit.tick_statuses(1.0, 0.9);
        unit.tick_statuses(1.0, 0.9);
        assert!((unit.health.effective_armor(0.9) - before).abs() < 1e-12);
    }

    #[test]
    fn test_cleanse() {
        let mut unit = grunt();
        let slow = StatusSpec {
            kind: StatusKind::Slow,
            duration: 5.0,
            magnitude: 0.5,
            tick_interval: 0.0,
            chance: 1.0,
        };
        unit.apply_status(&slow, None);
        assert!((unit.mobility.move_multiplier() - 0.5).abs() < f64::EPSILON);
        unit.cleanse();
        assert!((unit.mobility.move_multiplier() - 1.0).abs() < f64::EPSILON);
        assert!(unit.statuses.is_empty());
    }

    #[test]
    fn test_distance_uses_nearest_collider() {
        let unit = grunt().with_colliders(vec![
            Collider::sphere(0.5),
            Collider::new(DVec3::new(3.0, 0.0, 0.0), 1.0),
        ]);
        let d = unit.distance_to(DVec3::new(5.0, 0.0, 0.0));
        assert!((d - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_unit_definition() {
        let def: UnitDefinition = serde_json::from_str(
            r#"{"id": "runner", "name": "Runner", "max_hp": 40, "armor": 0.1, "move_speed": 3.5}"#,
        )
        .unwrap();
        let unit = Combatant::from_unit(EntityId(9), Team::Attacker, DVec3::ZERO, &def);
        assert!((unit.health.max_hp - 40.0).abs() < f64::EPSILON);
        assert!((unit.mobility.effective_speed() - 3.5).abs() < f64::EPSILON);
        assert_eq!(unit.colliders.len(), 1);
    }
}
