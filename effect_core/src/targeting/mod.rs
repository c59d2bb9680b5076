//! Targeting - area queries, target selection and projectile motion

mod area;
mod projectile;
mod select;
mod trajectory;

pub use area::{query_area, Collider, TargetFilter};
pub use projectile::{Projectile, ProjectileId, ProjectileLaunch, ProjectileTarget};
pub use select::{select_target, TargetPriority};
pub use trajectory::{Launch, Trajectory, UP};
