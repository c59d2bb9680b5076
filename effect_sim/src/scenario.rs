//! Scenario files - entities, standing traps and timed actions

use effect_core::config::{load_toml, parse_toml, ConfigError};
use effect_core::effect::{EffectDescriptor, EffectOrigin};
use effect_core::targeting::{Collider, TargetPriority, Trajectory};
use effect_core::types::Team;
use effect_core::DVec3;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Problems found while building a simulation from a scenario
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("entity id {0} is declared twice")]
    DuplicateEntity(u32),
    #[error("entity {0} has no max_hp and no unit archetype")]
    MissingHealth(u32),
    #[error("unknown {origin} '{id}' in content")]
    UnknownContent { origin: EffectOrigin, id: String },
    #[error("action at t={at} names no effects")]
    NoEffects { at: f64 },
    #[error("invalid timing: {0}")]
    InvalidTiming(String),
}

/// A full scenario file
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    /// Seconds to simulate
    #[serde(default = "default_duration")]
    pub duration: f64,
    /// Seconds per tick
    #[serde(default = "default_dt")]
    pub dt: f64,
    #[serde(default)]
    pub entities: Vec<EntitySpec>,
    #[serde(default)]
    pub traps: Vec<TrapSpec>,
    #[serde(default)]
    pub actions: Vec<ActionSpec>,
}

fn default_duration() -> f64 {
    10.0
}

fn default_dt() -> f64 {
    0.1
}

/// An entity placed at the start of the fight
#[derive(Debug, Clone, Deserialize)]
pub struct EntitySpec {
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
    /// Unit archetype from content; explicit fields below override it
    #[serde(default)]
    pub unit: Option<String>,
    /// Hero definition from content
    #[serde(default)]
    pub hero: Option<String>,
    #[serde(default)]
    pub team: Team,
    #[serde(default)]
    pub position: DVec3,
    #[serde(default)]
    pub max_hp: Option<f64>,
    #[serde(default)]
    pub armor: Option<f64>,
    #[serde(default)]
    pub move_speed: Option<f64>,
    /// Direction the entity walks each tick at its effective speed
    #[serde(default)]
    pub walk: Option<DVec3>,
    #[serde(default)]
    pub colliders: Vec<Collider>,
}

/// A trap lying on the field, triggered by hostile entities
#[derive(Debug, Clone, Deserialize)]
pub struct TrapSpec {
    pub trap: String,
    pub position: DVec3,
    #[serde(default = "default_trap_team")]
    pub team: Team,
}

fn default_trap_team() -> Team {
    Team::Defender
}

/// Where an action's effect list comes from
#[derive(Debug, Clone, Deserialize)]
pub struct ContentRef {
    pub origin: EffectOrigin,
    pub id: String,
}

/// Something that happens at a scheduled time
#[derive(Debug, Clone, Deserialize)]
pub struct ActionSpec {
    /// First time the action runs
    pub at: f64,
    /// Repeat period; runs once when absent
    #[serde(default)]
    pub every: Option<f64>,
    #[serde(default)]
    pub source: Option<u32>,
    #[serde(flatten)]
    pub kind: ActionKind,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionKind {
    /// Resolve effects on a single entity
    Apply {
        target: u32,
        #[serde(default)]
        content: Option<ContentRef>,
        #[serde(default)]
        effects: Vec<EffectDescriptor>,
    },
    /// Resolve effects on everything inside a sphere
    Area {
        center: DVec3,
        /// Falls back to the spell's radius
        #[serde(default)]
        radius: Option<f64>,
        /// Only hit teams hostile to this one
        #[serde(default)]
        hostile_to: Option<Team>,
        #[serde(default)]
        content: Option<ContentRef>,
        #[serde(default)]
        effects: Vec<EffectDescriptor>,
    },
    /// Fire a tower's projectile from a fixed position
    Fire {
        tower: String,
        from: DVec3,
        /// Picked by priority within the tower's range when absent
        #[serde(default)]
        target: Option<u32>,
        #[serde(default)]
        priority: TargetPriority,
        #[serde(default = "default_trap_team")]
        team: Team,
        /// Overrides the tower's projectile motion
        #[serde(default)]
        trajectory: Option<Trajectory>,
    },
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let scenario: Scenario = load_toml(path)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn parse(content: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = parse_toml(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    fn validate(&self) -> Result<(), ScenarioError> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(ScenarioError::InvalidTiming(format!(
                "dt must be positive, got {}",
                self.dt
            )));
        }
        if !(self.duration.is_finite() && self.duration >= 0.0) {
            return Err(ScenarioError::InvalidTiming(format!(
                "duration must be non-negative, got {}",
                self.duration
            )));
        }

        let mut seen = HashSet::new();
        for entity in &self.entities {
            if !seen.insert(entity.id) {
                return Err(ScenarioError::DuplicateEntity(entity.id));
            }
        }

        for action in &self.actions {
            if let Some(every) = action.every {
                if !(every.is_finite() && every > 0.0) {
                    return Err(ScenarioError::InvalidTiming(format!(
                        "action at t={} repeats every {}",
                        action.at, every
                    )));
                }
            }
            let names_effects = match &action.kind {
                ActionKind::Apply {
                    content, effects, ..
                }
                | ActionKind::Area {
                    content, effects, ..
                } => content.is_some() || !effects.is_empty(),
                ActionKind::Fire { .. } => true,
            };
            if !names_effects {
                return Err(ScenarioError::NoEffects { at: action.at });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"
name = "Lane defense"
duration = 5.0
dt = 0.05

[[entities]]
id = 1
name = "Grunt"
team = "attacker"
position = [0.0, 0.0, 0.0]
max_hp = 100
armor = 0.2
walk = [1.0, 0.0, 0.0]

[[entities]]
id = 2
unit = "knight"
team = "attacker"
position = [2.0, 0.0, 0.0]
colliders = [{ offset = [0.0, 0.0, 0.0], radius = 0.5 }, { offset = [0.5, 0.0, 0.0], radius = 0.5 }]

[[traps]]
trap = "spikes"
position = [4.0, 0.0, 0.0]

[[actions]]
kind = "apply"
at = 0.5
target = 1
effects = [{ effect_type = "status", status = { apply = "slow", slow_percent = 0.5, duration_seconds = 1 } }]

[[actions]]
kind = "area"
at = 1.0
center = [1.0, 0.0, 0.0]
hostile_to = "defender"
content = { origin = "spell", id = "fireball" }

[[actions]]
kind = "fire"
at = 0.0
every = 1.0
tower = "archer"
from = [0.0, 0.0, 8.0]
trajectory = { type = "homing", turn_rate = 4.0 }
"#;

    #[test]
    fn test_parse_scenario() {
        let scenario = Scenario::parse(SCENARIO).unwrap();
        assert_eq!(scenario.name, "Lane defense");
        assert_eq!(scenario.entities.len(), 2);
        assert_eq!(scenario.entities[1].colliders.len(), 2);
        assert_eq!(scenario.traps[0].team, Team::Defender);
        assert!(matches!(scenario.actions[0].kind, ActionKind::Apply { target: 1, .. }));
        assert!(matches!(
            scenario.actions[2].kind,
            ActionKind::Fire {
                trajectory: Some(Trajectory::Homing { .. }),
                ..
            }
        ));
        assert_eq!(scenario.actions[2].every, Some(1.0));
    }

    #[test]
    fn test_defaults() {
        let scenario = Scenario::parse("").unwrap();
        assert!((scenario.duration - 10.0).abs() < f64::EPSILON);
        assert!((scenario.dt - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_duplicate_entity() {
        let toml = "[[entities]]\nid = 1\nmax_hp = 5\n[[entities]]\nid = 1\nmax_hp = 5\n";
        assert!(matches!(Scenario::parse(toml), Err(ScenarioError::DuplicateEntity(1))));
    }

    #[test]
    fn test_bad_dt() {
        assert!(matches!(Scenario::parse("dt = 0.0"), Err(ScenarioError::InvalidTiming(_))));
    }

    #[test]
    fn test_action_without_effects() {
        let toml = "[[actions]]\nkind = \"apply\"\nat = 1.0\ntarget = 3\n";
        assert!(matches!(Scenario::parse(toml), Err(ScenarioError::NoEffects { .. })));
    }
}
