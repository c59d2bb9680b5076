//! Entities - health, movement and status state for anything on the battlefield

mod combatant;
mod health;

pub use combatant::{Combatant, DEFAULT_COLLIDER_RADIUS};
pub use health::{DamageTaken, Health, Mobility};
