//! Effect model - canonical descriptors and the authoring schemas that feed them

mod descriptor;
mod schema;

pub use descriptor::{BuffSpec, Effect, EffectDescriptor, StatusDescriptor, StatusSpec};
pub use schema::{
    normalize_descriptor, EffectOrigin, EffectSchema, HeroDefinition, ProjectileDefinition,
    SpellDefinition, TowerDefinition, TrapDefinition, UnitDefinition,
};
