//! Prelude module for convenient imports
//!
//! ```rust
//! use effect_core::prelude::*;
//! ```

// Core types
pub use crate::types::{EntityId, StatusKind, Team};
pub use glam::DVec3;

// Effects
pub use crate::effect::{EffectDescriptor, EffectOrigin, EffectSchema, StatusDescriptor};

// Entities
pub use crate::entity::{Combatant, Health, Mobility};

// Resolution
pub use crate::resolve::{AppliedEffect, BuffRegistry, EffectResolver, ResolveReport};

// Statuses
pub use crate::status::{StatusTable, StatusTickResult};

// Targeting
pub use crate::targeting::{
    Collider, ProjectileLaunch, ProjectileTarget, TargetFilter, TargetPriority, Trajectory,
};

// Battlefield
pub use crate::battlefield::{Battlefield, TickReport};

// Config
pub use crate::config::{ContentLibrary, EngineConfig};
