//! ResolveReport - Outcome of resolving an effect list against a target

use super::buff::BuffOutcome;
use crate::entity::DamageTaken;
use crate::status::StatusChange;
use crate::types::{EntityId, StatusKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a single effect was skipped
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum RejectReason {
    #[error("target {0} does not exist")]
    TargetMissing(EntityId),
    #[error("target {0} is already dead")]
    TargetDead(EntityId),
    #[error("effect list is empty")]
    EmptyEffectList,
    #[error("effect_type is missing")]
    MissingEffectType,
    #[error("unknown effect_type '{0}'")]
    UnknownEffectType(String),
    #[error("{effect} value must be positive, got {value}")]
    NonPositiveValue { effect: String, value: f64 },
    #[error("status effect has no status block")]
    MissingStatus,
    #[error("status 'apply' is missing")]
    MissingStatusKind,
    #[error("unknown status kind '{0}'")]
    UnknownStatusKind(String),
    #[error("status duration must be positive, got {0}")]
    InvalidDuration(f64),
    #[error("burn tick interval must be positive, got {0}")]
    InvalidTickInterval(f64),
}

impl RejectReason {
    /// Normal play rather than bad input: an earlier effect in the same
    /// list already killed the target
    pub fn is_routine(&self) -> bool {
        matches!(self, RejectReason::TargetDead(_))
    }
}

/// A rejected effect and its position in the list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rejection {
    /// Index into the effect list; `None` for list-level rejections
    pub index: Option<usize>,
    pub reason: RejectReason,
}

/// An effect that was dispatched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppliedEffect {
    Damage { index: usize, taken: DamageTaken },
    Heal { index: usize, amount: f64, healed: f64 },
    Status { index: usize, kind: StatusKind, change: StatusChange },
    /// The chance roll failed; nothing changed
    StatusResisted { index: usize, kind: StatusKind },
    Buff { index: usize, outcome: BuffOutcome },
}

impl AppliedEffect {
    pub fn index(&self) -> usize {
        match self {
            AppliedEffect::Damage { index, .. }
            | AppliedEffect::Heal { index, .. }
            | AppliedEffect::Status { index, .. }
            | AppliedEffect::StatusResisted { index, .. }
            | AppliedEffect::Buff { index, .. } => *index,
        }
    }
}

/// Everything that happened while resolving one effect list on one target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolveReport {
    pub target: EntityId,
    pub source: Option<EntityId>,
    /// Applied effects, in list order
    pub applied: Vec<AppliedEffect>,
    /// Skipped effects, in list order
    pub rejected: Vec<Rejection>,
}

impl ResolveReport {
    pub fn new(target: EntityId, source: Option<EntityId>) -> Self {
        ResolveReport {
            target,
            source,
            applied: Vec::new(),
            rejected: Vec::new(),
        }
    }

    pub(crate) fn reject(&mut self, index: Option<usize>, reason: RejectReason) {
        let index_label = index.map(|i| i.to_string()).unwrap_or_else(|| "-".to_string());
        if reason.is_routine() {
            log::debug!("effect {} on {} skipped: {}", index_label, self.target, reason);
        } else {
            log::warn!("effect {} on {} rejected: {}", index_label, self.target, reason);
        }
        self.rejected.push(Rejection { index, reason });
    }

    /// HP removed from the target by damage effects
    pub fn total_damage(&self) -> f64 {
        self.applied
            .iter()
            .map(|a| match a {
                AppliedEffect::Damage { taken, .. } => taken.dealt_amount,
                _ => 0.0,
            })
            .sum()
    }

    /// HP restored to the target by heal effects
    pub fn total_healed(&self) -> f64 {
        self.applied
            .iter()
            .map(|a| match a {
                AppliedEffect::Heal { healed, .. } => *healed,
                _ => 0.0,
            })
            .sum()
    }

    pub fn is_killing_blow(&self) -> bool {
        self.applied.iter().any(|a| {
            matches!(a, AppliedEffect::Damage { taken, .. } if taken.is_killing_blow)
        })
    }

    /// Status kinds applied or refreshed
    pub fn statuses_applied(&self) -> Vec<StatusKind> {
        self.applied
            .iter()
            .filter_map(|a| match a {
                AppliedEffect::Status { kind, .. } => Some(*kind),
                _ => None,
            })
            .collect()
    }

    /// Rejections caused by bad input, excluding post-death skips
    pub fn invalid_effects(&self) -> usize {
        self.rejected
            .iter()
            .filter(|r| !r.reason.is_routine())
            .count()
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();

        let damage = self.total_damage();
        if damage > 0.0 {
            parts.push(format!("{:.0} damage", damage));
        }

        let healed = self.total_healed();
        if healed > 0.0 {
            parts.push(format!("{:.0} healed", healed));
        }

        for kind in self.statuses_applied() {
            parts.push(kind.to_string());
        }

        if !self.rejected.is_empty() {
            parts.push(format!("{} rejected", self.rejected.len()));
        }

        if self.is_killing_blow() {
            parts.push("FATAL".to_string());
        }

        if parts.is_empty() {
            "No effect".to_string()
        } else {
            parts.join(", ")
        }
    }
}
