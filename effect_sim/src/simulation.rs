//! Scenario simulation - drives a battlefield through a scripted fight

use crate::scenario::{
    ActionKind, ActionSpec, ContentRef, EntitySpec, Scenario, ScenarioError, TrapSpec,
};
use effect_core::battlefield::{Battlefield, ImpactOutcome, TickReport};
use effect_core::config::{ContentLibrary, EngineConfig};
use effect_core::effect::{EffectDescriptor, EffectOrigin};
use effect_core::entity::{Combatant, Health, Mobility};
use effect_core::resolve::{AppliedEffect, ResolveReport};
use effect_core::targeting::{ProjectileLaunch, ProjectileTarget, TargetFilter};
use effect_core::types::{EntityId, StatusKind};
use effect_core::DVec3;
use std::collections::{BTreeMap, HashMap};

/// Slack for scheduling actions on a float clock
const SCHEDULE_EPSILON: f64 = 1e-9;

/// Totals gathered over a run
#[derive(Debug, Clone, Default)]
pub struct SimulationStats {
    pub ticks: u32,
    pub direct_damage: f64,
    pub burn_damage: f64,
    pub healed: f64,
    pub statuses_applied: BTreeMap<StatusKind, u32>,
    pub statuses_resisted: u32,
    /// Effects rejected as invalid input
    pub rejections: u32,
    /// Effects skipped because an earlier effect in the list killed the target
    pub dead_target_skips: u32,
    pub impacts: u32,
    pub fizzles: u32,
    pub trap_triggers: u32,
    /// Entity and time of death
    pub deaths: Vec<(EntityId, f64)>,
}

impl SimulationStats {
    pub fn total_damage(&self) -> f64 {
        self.direct_damage + self.burn_damage
    }

    fn record(&mut self, report: &ResolveReport) {
        self.direct_damage += report.total_damage();
        self.healed += report.total_healed();
        let invalid = report.invalid_effects();
        self.rejections += invalid as u32;
        self.dead_target_skips += (report.rejected.len() - invalid) as u32;
        for applied in &report.applied {
            match applied {
                AppliedEffect::Status { kind, .. } => {
                    *self.statuses_applied.entry(*kind).or_insert(0) += 1;
                }
                AppliedEffect::StatusResisted { .. } => self.statuses_resisted += 1,
                _ => {}
            }
        }
    }
}

/// A trap placed on the field
#[derive(Debug, Clone)]
struct PlacedTrap {
    name: String,
    position: DVec3,
    filter: TargetFilter,
    trigger_radius: f64,
    rearm_seconds: f64,
    effects: Vec<EffectDescriptor>,
    ready_at: f64,
}

/// A scheduled action and when it next runs
#[derive(Debug, Clone)]
struct Scheduled {
    action: ActionSpec,
    next_at: Option<f64>,
}

/// Scripted fight on a single battlefield
pub struct Simulation {
    field: Battlefield,
    content: ContentLibrary,
    duration: f64,
    dt: f64,
    walkers: HashMap<EntityId, DVec3>,
    traps: Vec<PlacedTrap>,
    schedule: Vec<Scheduled>,
    stats: SimulationStats,
}

impl Simulation {
    /// Build the battlefield described by `scenario`
    pub fn new(
        scenario: Scenario,
        content: ContentLibrary,
        config: EngineConfig,
        seed: u64,
    ) -> Result<Self, ScenarioError> {
        let mut field = Battlefield::with_seed(config, seed);
        let mut walkers = HashMap::new();

        for spec in &scenario.entities {
            let combatant = build_entity(spec, &content)?;
            if let Some(direction) = spec.walk {
                walkers.insert(combatant.id, direction.normalize_or_zero());
            }
            field.spawn(combatant);
        }

        let traps = scenario
            .traps
            .iter()
            .map(|spec| place_trap(spec, &content))
            .collect::<Result<Vec<_>, _>>()?;

        for action in &scenario.actions {
            check_content_refs(action, &content)?;
        }
        let schedule = scenario
            .actions
            .into_iter()
            .map(|action| Scheduled {
                next_at: Some(action.at),
                action,
            })
            .collect();

        log::info!(
            "scenario '{}': {} entities, {} traps, {:.1}s at dt={}",
            scenario.name,
            field.len(),
            traps.len(),
            scenario.duration,
            scenario.dt
        );

        Ok(Simulation {
            field,
            content,
            duration: scenario.duration,
            dt: scenario.dt,
            walkers,
            traps,
            schedule,
            stats: SimulationStats::default(),
        })
    }

    pub fn battlefield(&self) -> &Battlefield {
        &self.field
    }

    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    pub fn is_finished(&self) -> bool {
        self.field.time() + SCHEDULE_EPSILON >= self.duration
    }

    /// Run to the end, handing every tick report to `on_tick`
    pub fn run(&mut self, mut on_tick: impl FnMut(&TickReport)) -> &SimulationStats {
        while !self.is_finished() {
            let report = self.step();
            on_tick(&report);
        }
        &self.stats
    }

    /// One frame: scheduled actions, traps, movement, then the battlefield tick
    pub fn step(&mut self) -> TickReport {
        let now = self.field.time();
        self.run_due_actions(now);
        self.check_traps(now);
        self.move_walkers();

        let report = self.field.tick(self.dt);
        self.stats.ticks += 1;
        self.stats.burn_damage += report.burn_damage();
        for impact in &report.impacts {
            self.stats.impacts += 1;
            match &impact.outcome {
                ImpactOutcome::Hit { report } => self.stats.record(report),
                ImpactOutcome::Area { reports } => {
                    reports.iter().for_each(|r| self.stats.record(r))
                }
                ImpactOutcome::Fizzled { .. } => self.stats.fizzles += 1,
            }
        }
        for id in &report.deaths {
            self.walkers.remove(id);
            self.stats.deaths.push((*id, report.time));
        }
        report
    }

    fn run_due_actions(&mut self, now: f64) {
        let mut due = Vec::new();
        for scheduled in self.schedule.iter_mut() {
            while let Some(at) = scheduled.next_at {
                if at > now + SCHEDULE_EPSILON {
                    break;
                }
                due.push(scheduled.action.clone());
                scheduled.next_at = scheduled.action.every.map(|every| at + every);
            }
        }
        for action in due {
            self.perform(&action);
        }
    }

    fn perform(&mut self, action: &ActionSpec) {
        let source = action.source.map(EntityId);
        match &action.kind {
            ActionKind::Apply {
                target,
                content,
                effects,
            } => {
                let effects = self.effects_for(content.as_ref(), effects);
                let report = self.field.resolve(source, EntityId(*target), &effects);
                log::info!("apply -> {}", report.summary());
                self.stats.record(&report);
            }
            ActionKind::Area {
                center,
                radius,
                hostile_to,
                content,
                effects,
            } => {
                let radius = radius
                    .or_else(|| {
                        content
                            .as_ref()
                            .and_then(|c| self.content.spell(&c.id))
                            .and_then(|spell| spell.radius)
                    })
                    .unwrap_or(0.0);
                let filter = hostile_to.map(TargetFilter::hostile_to).unwrap_or_default();
                let effects = self.effects_for(content.as_ref(), effects);
                let reports = self.field.resolve_area(source, *center, radius, filter, &effects);
                log::info!("area r={} hit {} entities", radius, reports.len());
                for report in &reports {
                    self.stats.record(report);
                }
            }
            ActionKind::Fire {
                tower,
                from,
                target,
                priority,
                team,
                trajectory,
            } => {
                let Some(definition) = self.content.tower(tower) else {
                    log::warn!("fire skipped: unknown tower '{}'", tower);
                    return;
                };
                let filter = TargetFilter::hostile_to(*team);
                let target = match target {
                    Some(id) => Some(EntityId(*id)),
                    None => self.field.select_target(*from, definition.range, filter, *priority),
                };
                let Some(target) = target else {
                    log::debug!("{} has nothing in range", definition.name);
                    return;
                };

                let mut launch = ProjectileLaunch::from_tower(
                    definition,
                    source,
                    *from,
                    ProjectileTarget::Entity(target),
                    self.field.config().projectile.default_speed,
                );
                launch.filter = filter;
                if let Some(trajectory) = trajectory {
                    launch.trajectory = *trajectory;
                }
                if let Some(id) = self.field.launch_projectile(launch) {
                    log::debug!("{} fired {} at {}", definition.name, id, target);
                }
            }
        }
    }

    fn effects_for(
        &self,
        content: Option<&ContentRef>,
        inline: &[EffectDescriptor],
    ) -> Vec<EffectDescriptor> {
        let mut effects = content
            .and_then(|c| self.content.effects(c.origin, &c.id))
            .unwrap_or_default();
        effects.extend(inline.iter().cloned());
        effects
    }

    fn check_traps(&mut self, now: f64) {
        for trap in self.traps.iter_mut() {
            if now + SCHEDULE_EPSILON < trap.ready_at {
                continue;
            }
            if self
                .field
                .query_area(trap.position, trap.trigger_radius, trap.filter)
                .is_empty()
            {
                continue;
            }
            let reports = self.field.resolve_area(
                None,
                trap.position,
                trap.trigger_radius,
                trap.filter,
                &trap.effects,
            );
            log::info!("{} triggered on {} entities", trap.name, reports.len());
            for report in &reports {
                self.stats.record(report);
            }
            self.stats.trap_triggers += 1;
            trap.ready_at = if trap.rearm_seconds > 0.0 {
                now + trap.rearm_seconds
            } else {
                f64::INFINITY
            };
        }
    }

    fn move_walkers(&mut self) {
        for (id, direction) in &self.walkers {
            if let Some(combatant) = self.field.get_mut(*id) {
                if combatant.is_alive() {
                    let speed = combatant.mobility.effective_speed();
                    combatant.position += *direction * speed * self.dt;
                }
            }
        }
    }

    /// Human-readable end-of-run summary
    pub fn summary(&self) -> String {
        let stats = &self.stats;
        let mut lines = vec![
            format!("Simulated {:.2}s over {} ticks", self.field.time(), stats.ticks),
            format!(
                "Damage: {:.1} total ({:.1} direct, {:.1} burn)",
                stats.total_damage(),
                stats.direct_damage,
                stats.burn_damage
            ),
            format!("Healed: {:.1}", stats.healed),
        ];
        if !stats.statuses_applied.is_empty() {
            let applied: Vec<String> = stats
                .statuses_applied
                .iter()
                .map(|(kind, count)| format!("{} x{}", kind, count))
                .collect();
            lines.push(format!(
                "Statuses: {} ({} resisted)",
                applied.join(", "),
                stats.statuses_resisted
            ));
        }
        lines.push(format!(
            "Projectiles: {} impacts, {} fizzled; traps triggered {} times",
            stats.impacts, stats.fizzles, stats.trap_triggers
        ));
        if stats.rejections > 0 {
            lines.push(format!("Rejected effects: {}", stats.rejections));
        }
        if stats.dead_target_skips > 0 {
            lines.push(format!("Effects skipped on dead targets: {}", stats.dead_target_skips));
        }
        for (id, time) in &stats.deaths {
            lines.push(format!("  {} died at {:.2}s", id, time));
        }
        for combatant in self.field.entities() {
            lines.push(format!(
                "  {} {:<12} {:>7.1}/{:<7.1} ({:>3.0}%) armor {:.2} speed x{:.2}",
                combatant.id,
                combatant.name,
                combatant.health.current_hp,
                combatant.health.max_hp,
                combatant.health.hp_percent(),
                combatant
                    .health
                    .effective_armor(self.field.config().armor.max_reduction),
                combatant.mobility.move_multiplier()
            ));
        }
        lines.join("\n")
    }
}

fn build_entity(spec: &EntitySpec, content: &ContentLibrary) -> Result<Combatant, ScenarioError> {
    let id = EntityId(spec.id);
    let mut combatant = if let Some(unit) = &spec.unit {
        let definition = content.unit(unit).ok_or_else(|| ScenarioError::UnknownContent {
            origin: EffectOrigin::Unit,
            id: unit.clone(),
        })?;
        Combatant::from_unit(id, spec.team, spec.position, definition)
    } else if let Some(hero) = &spec.hero {
        let definition = content.hero(hero).ok_or_else(|| ScenarioError::UnknownContent {
            origin: EffectOrigin::Hero,
            id: hero.clone(),
        })?;
        Combatant::from_hero(id, spec.team, spec.position, definition)
    } else {
        let max_hp = spec.max_hp.ok_or(ScenarioError::MissingHealth(spec.id))?;
        Combatant::new(
            id,
            format!("entity{}", spec.id),
            spec.team,
            spec.position,
            Health::new(max_hp, spec.armor.unwrap_or(0.0)),
        )
    };

    if let Some(name) = &spec.name {
        combatant.name = name.clone();
    }
    if let Some(max_hp) = spec.max_hp {
        let armor = spec.armor.unwrap_or(combatant.health.base_armor);
        combatant.health = Health::new(max_hp, armor);
    } else if let Some(armor) = spec.armor {
        combatant.health.base_armor = armor;
    }
    if let Some(speed) = spec.move_speed {
        combatant = combatant.with_mobility(Mobility::new(speed));
    }
    if !spec.colliders.is_empty() {
        combatant = combatant.with_colliders(spec.colliders.clone());
    }
    Ok(combatant)
}

fn place_trap(spec: &TrapSpec, content: &ContentLibrary) -> Result<PlacedTrap, ScenarioError> {
    let definition = content.trap(&spec.trap).ok_or_else(|| ScenarioError::UnknownContent {
        origin: EffectOrigin::Trap,
        id: spec.trap.clone(),
    })?;
    Ok(PlacedTrap {
        name: definition.name.clone(),
        position: spec.position,
        filter: TargetFilter::hostile_to(spec.team),
        trigger_radius: definition.trigger_radius,
        rearm_seconds: definition.rearm_seconds,
        effects: content
            .effects(EffectOrigin::Trap, &spec.trap)
            .unwrap_or_default(),
        ready_at: 0.0,
    })
}

fn check_content_refs(action: &ActionSpec, content: &ContentLibrary) -> Result<(), ScenarioError> {
    let reference = match &action.kind {
        ActionKind::Apply { content: r, .. } | ActionKind::Area { content: r, .. } => r.clone(),
        ActionKind::Fire { tower, .. } => Some(ContentRef {
            origin: EffectOrigin::Tower,
            id: tower.clone(),
        }),
    };
    match reference {
        Some(r) if content.effects(r.origin, &r.id).is_none() => Err(ScenarioError::UnknownContent {
            origin: r.origin,
            id: r.id,
        }),
        _ => Ok(()),
    }
}
