//! BuffRegistry - Pluggable handlers for `buff` effects

use crate::effect::BuffSpec;
use crate::entity::Combatant;
use crate::types::normalize_key;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// What a buff did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BuffOutcome {
    /// A handler changed `stat` by `delta`
    Applied { stat: String, delta: f64 },
    /// No handler is registered for this stat/mode; logged only
    Observed { stat: String, mode: String },
}

/// Trait for anything that can apply a buff to a combatant
pub trait BuffHandler: Send + Sync {
    fn apply(&self, target: &mut Combatant, buff: &BuffSpec) -> BuffOutcome;
}

impl<F> BuffHandler for F
where
    F: Fn(&mut Combatant, &BuffSpec) -> BuffOutcome + Send + Sync,
{
    fn apply(&self, target: &mut Combatant, buff: &BuffSpec) -> BuffOutcome {
        self(target, buff)
    }
}

/// Buff handlers keyed by normalized `(stat, mode)`
#[derive(Default)]
pub struct BuffRegistry {
    handlers: HashMap<(String, String), Box<dyn BuffHandler>>,
}

impl BuffRegistry {
    /// Create an empty registry; every buff is observed only
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with flat `armor` and `move_speed` handlers
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register("armor", "flat", |target: &mut Combatant, buff: &BuffSpec| {
            target.health.adjust_armor(buff.value);
            BuffOutcome::Applied {
                stat: buff.stat.clone(),
                delta: buff.value,
            }
        });

        registry.register("move_speed", "flat", |target: &mut Combatant, buff: &BuffSpec| {
            target.mobility.adjust_move(buff.value);
            BuffOutcome::Applied {
                stat: buff.stat.clone(),
                delta: buff.value,
            }
        });

        registry
    }

    /// Register (or replace) the handler for a stat/mode pair
    pub fn register(&mut self, stat: &str, mode: &str, handler: impl BuffHandler + 'static) {
        self.handlers
            .insert((normalize_key(stat), normalize_key(mode)), Box::new(handler));
    }

    pub fn contains(&self, stat: &str, mode: &str) -> bool {
        self.handlers
            .contains_key(&(normalize_key(stat), normalize_key(mode)))
    }

    /// Dispatch a buff to its handler, or observe it when none is registered
    pub fn apply(&self, target: &mut Combatant, buff: &BuffSpec) -> BuffOutcome {
        match self.handlers.get(&(buff.stat.clone(), buff.mode.clone())) {
            Some(handler) => {
                let outcome = handler.apply(target, buff);
                log::debug!("buff {}/{} applied to {}", buff.stat, buff.mode, target.id);
                outcome
            }
            None => {
                log::info!(
                    "buff {}/{} ({}) on {} has no handler; observed only",
                    buff.stat,
                    buff.mode,
                    buff.value,
                    target.id
                );
                BuffOutcome::Observed {
                    stat: buff.stat.clone(),
                    mode: buff.mode.clone(),
                }
            }
        }
    }
}

impl fmt::Debug for BuffRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.handlers.keys().collect();
        keys.sort();
        f.debug_struct("BuffRegistry").field("handlers", &keys).finish()
    }
}
