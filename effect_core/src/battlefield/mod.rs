//! Battlefield - Entity table, projectiles and the per-tick driver

mod report;

pub use report::{ImpactOutcome, ImpactReport, TickReport};

use crate::config::EngineConfig;
use crate::effect::EffectDescriptor;
use crate::entity::Combatant;
use crate::resolve::{BuffRegistry, EffectResolver, ResolveReport};
use crate::targeting::{
    query_area, select_target, Projectile, ProjectileId, ProjectileLaunch, ProjectileTarget,
    TargetFilter, TargetPriority,
};
use crate::types::EntityId;
use glam::DVec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{BTreeMap, BTreeSet};

/// Every live entity and projectile in one fight.
///
/// Single-threaded and tick driven: [`Battlefield::tick`] advances statuses
/// and projectiles by one time delta. Despawning an entity drops its status
/// table, which cancels all of its timers.
#[derive(Debug)]
pub struct Battlefield {
    entities: BTreeMap<EntityId, Combatant>,
    projectiles: Vec<Projectile>,
    buffs: BuffRegistry,
    config: EngineConfig,
    rng: StdRng,
    next_entity: u32,
    next_projectile: u32,
    time: f64,
    /// Dead entities already reported (only used when bodies are kept)
    reported_dead: BTreeSet<EntityId>,
}

impl Battlefield {
    /// Create an empty battlefield with an entropy-seeded RNG
    pub fn new(config: EngineConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an empty battlefield with a deterministic RNG
    pub fn with_seed(config: EngineConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: EngineConfig, rng: StdRng) -> Self {
        Battlefield {
            entities: BTreeMap::new(),
            projectiles: Vec::new(),
            buffs: BuffRegistry::with_defaults(),
            config,
            rng,
            next_entity: 1,
            next_projectile: 1,
            time: 0.0,
            reported_dead: BTreeSet::new(),
        }
    }

    /// Replace the buff handler table
    pub fn with_buffs(mut self, buffs: BuffRegistry) -> Self {
        self.buffs = buffs;
        self
    }

    pub fn buffs_mut(&mut self) -> &mut BuffRegistry {
        &mut self.buffs
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Seconds simulated so far
    pub fn time(&self) -> f64 {
        self.time
    }

    // === Entities ===

    /// Reserve a fresh entity id
    pub fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_entity);
        self.next_entity += 1;
        id
    }

    /// Add a combatant under its own id, replacing any previous holder
    pub fn spawn(&mut self, combatant: Combatant) -> EntityId {
        let id = combatant.id;
        self.next_entity = self.next_entity.max(id.0.saturating_add(1));
        if self.entities.insert(id, combatant).is_some() {
            log::warn!("spawn replaced existing entity {}", id);
        }
        self.reported_dead.remove(&id);
        log::debug!("spawned {}", id);
        id
    }

    /// Remove an entity; its pending status timers go with it
    pub fn despawn(&mut self, id: EntityId) -> Option<Combatant> {
        let removed = self.entities.remove(&id);
        if let Some(combatant) = &removed {
            log::debug!(
                "despawned {} ({} statuses cancelled)",
                id,
                combatant.statuses.iter().count()
            );
        }
        self.reported_dead.remove(&id);
        removed
    }

    pub fn get(&self, id: EntityId) -> Option<&Combatant> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Combatant> {
        self.entities.get_mut(&id)
    }

    /// All entities in id order
    pub fn entities(&self) -> impl Iterator<Item = &Combatant> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    // === Effects ===

    /// Resolve an effect list against one target
    pub fn resolve(
        &mut self,
        source: Option<EntityId>,
        target: EntityId,
        effects: &[EffectDescriptor],
    ) -> ResolveReport {
        let resolver = EffectResolver::new(&self.buffs, &self.config);
        resolver.resolve_with_rng(
            source,
            target,
            self.entities.get_mut(&target),
            effects,
            &mut self.rng,
        )
    }

    /// Resolve an effect list once against every entity caught in the area
    pub fn resolve_area(
        &mut self,
        source: Option<EntityId>,
        center: DVec3,
        radius: f64,
        filter: TargetFilter,
        effects: &[EffectDescriptor],
    ) -> Vec<ResolveReport> {
        let targets = query_area(self.entities.values(), center, radius, filter);
        log::debug!(
            "area at ({:.1}, {:.1}, {:.1}) r={} caught {} entities",
            center.x,
            center.y,
            center.z,
            radius,
            targets.len()
        );
        targets
            .into_iter()
            .map(|target| self.resolve(source, target, effects))
            .collect()
    }

    /// Living entities touching the sphere, each once
    pub fn query_area(&self, center: DVec3, radius: f64, filter: TargetFilter) -> Vec<EntityId> {
        query_area(self.entities.values(), center, radius, filter)
    }

    /// Best target in range, e.g. for a tower
    pub fn select_target(
        &self,
        origin: DVec3,
        range: f64,
        filter: TargetFilter,
        priority: TargetPriority,
    ) -> Option<EntityId> {
        select_target(self.entities.values(), origin, range, filter, priority)
    }

    // === Projectiles ===

    /// Fire a projectile; `None` when its target entity does not exist
    pub fn launch_projectile(&mut self, spec: ProjectileLaunch) -> Option<ProjectileId> {
        let aim_point = match spec.target {
            ProjectileTarget::Entity(id) => match self.entities.get(&id) {
                Some(target) => target.position,
                None => {
                    log::warn!("projectile launch skipped: target {} does not exist", id);
                    return None;
                }
            },
            ProjectileTarget::Point(point) => point,
        };

        let id = ProjectileId(self.next_projectile);
        self.next_projectile += 1;
        let min_flight_time = self.config.projectile.min_flight_time;
        let projectile = Projectile::fire(id, spec, aim_point, min_flight_time);
        log::debug!(
            "launched {} ({:?}, {:.2}s flight)",
            id,
            projectile.trajectory,
            projectile.launch.flight_time
        );
        self.projectiles.push(projectile);
        Some(id)
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    // === Tick ===

    /// Advance the battlefield by `delta_time` seconds.
    ///
    /// 1. Tick every entity's statuses (burn damage, expiry and reversal)
    /// 2. Move projectiles and resolve the ones that arrive
    /// 3. Report deaths, despawning the dead when configured
    pub fn tick(&mut self, delta_time: f64) -> TickReport {
        let delta_time = if delta_time.is_finite() { delta_time.max(0.0) } else { 0.0 };
        self.time += delta_time;

        let mut report = TickReport {
            time: self.time,
            ..Default::default()
        };

        let armor_cap = self.config.armor.max_reduction;
        for (id, combatant) in self.entities.iter_mut() {
            let result = combatant.tick_statuses(delta_time, armor_cap);
            if !result.is_empty() {
                report.statuses.push((*id, result));
            }
        }

        for projectile in self.projectiles.iter_mut() {
            let live_target = match projectile.target {
                ProjectileTarget::Entity(id) => self.entities.get(&id).map(|c| c.position),
                ProjectileTarget::Point(_) => None,
            };
            projectile.advance(delta_time, live_target);
        }

        let (landed, flying): (Vec<_>, Vec<_>) = std::mem::take(&mut self.projectiles)
            .into_iter()
            .partition(|p| p.has_arrived());
        self.projectiles = flying;
        for projectile in landed {
            let impact = self.impact(projectile);
            report.impacts.push(impact);
        }

        let dead: Vec<EntityId> = self
            .entities
            .values()
            .filter(|c| !c.is_alive() && !self.reported_dead.contains(&c.id))
            .map(|c| c.id)
            .collect();
        for id in dead {
            if let Some(combatant) = self.entities.get(&id) {
                log::info!("{} ({}) died at t={:.2}", combatant.name, id, self.time);
            }
            if self.config.battlefield.despawn_on_death {
                self.despawn(id);
            } else {
                self.reported_dead.insert(id);
            }
            report.deaths.push(id);
        }

        report
    }

    fn impact(&mut self, projectile: Projectile) -> ImpactReport {
        let outcome = match (projectile.impact_radius, projectile.target) {
            (Some(radius), _) => ImpactOutcome::Area {
                reports: self.resolve_area(
                    projectile.source,
                    projectile.position,
                    radius,
                    projectile.filter,
                    &projectile.effects,
                ),
            },
            (None, ProjectileTarget::Entity(target)) => {
                if self.entities.get(&target).map_or(false, |c| c.is_alive()) {
                    ImpactOutcome::Hit {
                        report: self.resolve(projectile.source, target, &projectile.effects),
                    }
                } else {
                    ImpactOutcome::Fizzled { target }
                }
            }
            (None, ProjectileTarget::Point(point)) => ImpactOutcome::Area {
                reports: self.resolve_area(
                    projectile.source,
                    point,
                    0.0,
                    projectile.filter,
                    &projectile.effects,
                ),
            },
        };

        let report = ImpactReport {
            projectile: projectile.id,
            source: projectile.source,
            position: projectile.position,
            outcome,
        };
        log::info!(
            "{} impact at ({:.1}, {:.1}, {:.1}): {:.1} damage to {} targets",
            projectile.id,
            report.position.x,
            report.position.y,
            report.position.z,
            report.total_damage(),
            report.targets().len()
        );
        report
    }
}

impl Default for Battlefield {
    fn default() -> Self {
        Battlefield::new(EngineConfig::default())
    }
}
