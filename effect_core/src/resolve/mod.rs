//! Effect resolution - validate and dispatch effect lists against combatants

mod buff;
mod resolution;
mod result;

pub use buff::{BuffHandler, BuffOutcome, BuffRegistry};
pub use resolution::EffectResolver;
pub use result::{AppliedEffect, RejectReason, Rejection, ResolveReport};
