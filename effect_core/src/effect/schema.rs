//! Authoring schemas - spell/unit/tower/trap/hero definitions
//!
//! Every schema carries the same effect list shape. Each one implements
//! [`EffectSchema`], which normalizes its list into canonical
//! [`EffectDescriptor`]s before anything is dispatched.

use super::EffectDescriptor;
use crate::targeting::Trajectory;
use crate::types::normalize_key;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which authoring schema an effect list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectOrigin {
    Spell,
    Unit,
    Tower,
    Trap,
    Hero,
}

impl fmt::Display for EffectOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EffectOrigin::Spell => "spell",
            EffectOrigin::Unit => "unit",
            EffectOrigin::Tower => "tower",
            EffectOrigin::Trap => "trap",
            EffectOrigin::Hero => "hero",
        };
        f.write_str(name)
    }
}

/// Trait for any authored definition that carries an effect list
pub trait EffectSchema {
    /// Definition identifier
    fn id(&self) -> &str;

    /// Schema this definition belongs to
    fn origin(&self) -> EffectOrigin;

    /// Effects exactly as authored
    fn raw_effects(&self) -> &[EffectDescriptor];

    /// Effects normalized to the canonical spelling
    fn normalized_effects(&self) -> Vec<EffectDescriptor> {
        self.raw_effects().iter().map(normalize_descriptor).collect()
    }
}

/// Canonicalize the string keys of a descriptor.
///
/// Values are left untouched. They are validated per entry at resolve time.
pub fn normalize_descriptor(raw: &EffectDescriptor) -> EffectDescriptor {
    let mut out = raw.clone();
    out.effect_type = raw
        .effect_type
        .as_deref()
        .map(normalize_key)
        .filter(|s| !s.is_empty());
    out.mode = raw.mode.as_deref().map(normalize_key);
    out.stat = raw.stat.as_deref().map(normalize_key);
    if let Some(status) = out.status.as_mut() {
        status.apply = status
            .apply
            .as_deref()
            .map(normalize_key)
            .filter(|s| !s.is_empty());
    }
    out
}

/// Spell cast by a player or hero
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpellDefinition {
    pub id: String,
    pub name: String,
    #[serde(default, alias = "cooldownSeconds")]
    pub cooldown_seconds: f64,
    /// Area radius; single target when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default)]
    pub effects: Vec<EffectDescriptor>,
}

/// Lane unit archetype
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitDefinition {
    pub id: String,
    pub name: String,
    #[serde(alias = "maxHp")]
    pub max_hp: f64,
    /// Fractional damage reduction, 0..=1
    #[serde(default)]
    pub armor: f64,
    #[serde(default = "default_move_speed", alias = "moveSpeed")]
    pub move_speed: f64,
    #[serde(default = "default_collider_radius", alias = "colliderRadius")]
    pub collider_radius: f64,
    /// Effects applied by this unit's attacks
    #[serde(default, alias = "onHit", alias = "on_hit")]
    pub effects: Vec<EffectDescriptor>,
}

/// Defensive tower
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TowerDefinition {
    pub id: String,
    pub name: String,
    pub range: f64,
    #[serde(default = "default_fire_rate", alias = "fireRate")]
    pub fire_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projectile: Option<ProjectileDefinition>,
    #[serde(default)]
    pub effects: Vec<EffectDescriptor>,
}

/// Projectile fired by a tower
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileDefinition {
    pub speed: f64,
    #[serde(default)]
    pub trajectory: Trajectory,
    /// Explosion radius; single target when absent
    #[serde(default, alias = "impactRadius", skip_serializing_if = "Option::is_none")]
    pub impact_radius: Option<f64>,
}

/// Ground trap triggered by units walking over it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrapDefinition {
    pub id: String,
    pub name: String,
    #[serde(alias = "triggerRadius")]
    pub trigger_radius: f64,
    #[serde(default, alias = "rearmSeconds")]
    pub rearm_seconds: f64,
    #[serde(default)]
    pub effects: Vec<EffectDescriptor>,
}

/// Hero with a signature ability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeroDefinition {
    pub id: String,
    pub name: String,
    #[serde(alias = "maxHp")]
    pub max_hp: f64,
    #[serde(default)]
    pub armor: f64,
    #[serde(default = "default_move_speed", alias = "moveSpeed")]
    pub move_speed: f64,
    #[serde(default, alias = "abilityEffects")]
    pub ability_effects: Vec<EffectDescriptor>,
}

fn default_move_speed() -> f64 {
    1.0
}

fn default_collider_radius() -> f64 {
    0.5
}

fn default_fire_rate() -> f64 {
    1.0
}

macro_rules! impl_effect_schema {
    ($ty:ty, $origin:expr, $field:ident) => {
        impl EffectSchema for $ty {
            fn id(&self) -> &str {
                &self.id
            }

            fn origin(&self) -> EffectOrigin {
                $origin
            }

            fn raw_effects(&self) -> &[EffectDescriptor] {
                &self.$field
            }
        }
    };
}

impl_effect_schema!(SpellDefinition, EffectOrigin::Spell, effects);
impl_effect_schema!(UnitDefinition, EffectOrigin::Unit, effects);
impl_effect_schema!(TowerDefinition, EffectOrigin::Tower, effects);
impl_effect_schema!(TrapDefinition, EffectOrigin::Trap, effects);
impl_effect_schema!(HeroDefinition, EffectOrigin::Hero, ability_effects);
