//! TickReport - What happened during one battlefield tick

use crate::resolve::ResolveReport;
use crate::status::StatusTickResult;
use crate::targeting::ProjectileId;
use crate::types::EntityId;
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Result of a projectile reaching the end of its flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImpactOutcome {
    /// Single target hit
    Hit { report: ResolveReport },
    /// Area explosion, one report per entity caught
    Area { reports: Vec<ResolveReport> },
    /// Single target no longer exists or is already dead
    Fizzled { target: EntityId },
}

/// A projectile impact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactReport {
    pub projectile: ProjectileId,
    pub source: Option<EntityId>,
    pub position: DVec3,
    pub outcome: ImpactOutcome,
}

impl ImpactReport {
    /// Entities that received the effect list
    pub fn targets(&self) -> Vec<EntityId> {
        match &self.outcome {
            ImpactOutcome::Hit { report } => vec![report.target],
            ImpactOutcome::Area { reports } => reports.iter().map(|r| r.target).collect(),
            ImpactOutcome::Fizzled { .. } => Vec::new(),
        }
    }

    pub fn total_damage(&self) -> f64 {
        match &self.outcome {
            ImpactOutcome::Hit { report } => report.total_damage(),
            ImpactOutcome::Area { reports } => reports.iter().map(|r| r.total_damage()).sum(),
            ImpactOutcome::Fizzled { .. } => 0.0,
        }
    }
}

/// Everything observable from one call to `Battlefield::tick`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Battlefield clock after this tick
    pub time: f64,
    /// Entities whose statuses ticked or expired
    pub statuses: Vec<(EntityId, StatusTickResult)>,
    pub impacts: Vec<ImpactReport>,
    /// Entities that died this tick
    pub deaths: Vec<EntityId>,
}

impl TickReport {
    /// Burn damage dealt across all entities
    pub fn burn_damage(&self) -> f64 {
        self.statuses.iter().map(|(_, r)| r.burn_damage).sum()
    }

    /// Burn damage dealt to one entity
    pub fn burn_damage_to(&self, id: EntityId) -> f64 {
        self.statuses
            .iter()
            .filter(|(e, _)| *e == id)
            .map(|(_, r)| r.burn_damage)
            .sum()
    }

    pub fn is_quiet(&self) -> bool {
        self.statuses.is_empty() && self.impacts.is_empty() && self.deaths.is_empty()
    }
}
