//! effect_core - Effect resolution and status engine for tower-defense combat
//!
//! This library provides:
//! - EffectDescriptor: Canonical data-driven effect (damage, heal, status, buff)
//! - EffectResolver: Applies an effect list to a target and reports the outcome
//! - StatusTable: Slow, burn and armor-shred timers with reversible modifiers
//! - Targeting: Multi-collider area queries, target selection, projectile motion
//! - Battlefield: Entity table and per-tick driver tying it all together

pub mod battlefield;
pub mod config;
pub mod effect;
pub mod entity;
pub mod prelude;
pub mod resolve;
pub mod status;
pub mod targeting;
pub mod types;

// Re-export core types for convenience
pub use battlefield::{Battlefield, ImpactOutcome, ImpactReport, TickReport};
pub use config::{ConfigError, ContentLibrary, EngineConfig};
pub use effect::{
    Effect, EffectDescriptor, EffectOrigin, EffectSchema, StatusDescriptor, StatusSpec,
};
pub use entity::{Combatant, DamageTaken, Health, Mobility};
pub use resolve::{
    AppliedEffect, BuffHandler, BuffOutcome, BuffRegistry, EffectResolver, RejectReason,
    ResolveReport,
};
pub use status::{ActiveStatus, StatusChange, StatusTable, StatusTickResult};
pub use targeting::{
    Collider, Projectile, ProjectileId, ProjectileLaunch, ProjectileTarget, TargetFilter,
    TargetPriority, Trajectory,
};
pub use types::{EntityId, StatusKind, Team};

// Math types used throughout the public API
pub use glam::DVec3;
