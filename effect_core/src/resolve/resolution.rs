//! Effect resolution - Dispatch an effect list against a combatant

use super::buff::BuffRegistry;
use super::result::{AppliedEffect, RejectReason, ResolveReport};
use crate::config::EngineConfig;
use crate::effect::{Effect, EffectDescriptor};
use crate::entity::Combatant;
use crate::types::EntityId;
use rand::Rng;

/// Applies effect lists to combatants.
///
/// Rejections never abort the list: a malformed or invalid effect is
/// skipped, recorded in the report, and resolution continues with the next.
#[derive(Debug, Clone, Copy)]
pub struct EffectResolver<'a> {
    buffs: &'a BuffRegistry,
    config: &'a EngineConfig,
}

impl<'a> EffectResolver<'a> {
    pub fn new(buffs: &'a BuffRegistry, config: &'a EngineConfig) -> Self {
        EffectResolver { buffs, config }
    }

    /// Resolve `effects` against `target` using the thread RNG for status chance
    pub fn resolve(
        &self,
        source: Option<EntityId>,
        target_id: EntityId,
        target: Option<&mut Combatant>,
        effects: &[EffectDescriptor],
    ) -> ResolveReport {
        let mut rng = rand::thread_rng();
        self.resolve_with_rng(source, target_id, target, effects, &mut rng)
    }

    /// Resolve with a provided RNG (for deterministic testing)
    ///
    /// 1. Reject the whole list when the target is missing or the list is empty
    /// 2. Validate each effect; invalid ones are rejected individually
    /// 3. Dispatch valid effects in list order, each exactly once
    pub fn resolve_with_rng(
        &self,
        source: Option<EntityId>,
        target_id: EntityId,
        target: Option<&mut Combatant>,
        effects: &[EffectDescriptor],
        rng: &mut impl Rng,
    ) -> ResolveReport {
        let mut report = ResolveReport::new(target_id, source);

        let target = match target {
            Some(t) => t,
            None => {
                if effects.is_empty() {
                    report.reject(None, RejectReason::TargetMissing(target_id));
                }
                for index in 0..effects.len() {
                    report.reject(Some(index), RejectReason::TargetMissing(target_id));
                }
                return report;
            }
        };

        if effects.is_empty() {
            report.reject(None, RejectReason::EmptyEffectList);
            return report;
        }

        for (index, descriptor) in effects.iter().enumerate() {
            if !target.is_alive() {
                report.reject(Some(index), RejectReason::TargetDead(target_id));
                continue;
            }

            let effect = match descriptor.validate() {
                Ok(effect) => effect,
                Err(reason) => {
                    report.reject(Some(index), reason);
                    continue;
                }
            };

            let applied = self.dispatch(index, source, target, effect, rng);
            report.applied.push(applied);
        }

        log::debug!("resolved on {}: {}", target_id, report.summary());
        report
    }

    fn dispatch(
        &self,
        index: usize,
        source: Option<EntityId>,
        target: &mut Combatant,
        effect: Effect,
        rng: &mut impl Rng,
    ) -> AppliedEffect {
        match effect {
            Effect::Damage { amount } => {
                let taken = target
                    .health
                    .take_damage(amount, self.config.armor.max_reduction);
                if taken.is_killing_blow {
                    log::info!("{} ({}) was killed", target.name, target.id);
                }
                AppliedEffect::Damage { index, taken }
            }
            Effect::Heal { amount } => {
                let healed = target.health.heal(amount);
                AppliedEffect::Heal {
                    index,
                    amount,
                    healed,
                }
            }
            Effect::Status(mut spec) => {
                if spec.chance < 1.0 && rng.gen::<f64>() >= spec.chance {
                    return AppliedEffect::StatusResisted {
                        index,
                        kind: spec.kind,
                    };
                }
                spec.tick_interval = spec.tick_interval.max(self.config.status.min_tick_interval);
                let change = target.apply_status(&spec, source);
                AppliedEffect::Status {
                    index,
                    kind: spec.kind,
                    change,
                }
            }
            Effect::Buff(buff) => AppliedEffect::Buff {
                index,
                outcome: self.buffs.apply(target, &buff),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::StatusDescriptor;
    use crate::entity::Health;
    use crate::resolve::BuffOutcome;
    use crate::status::StatusChange;
    use crate::types::{StatusKind, Team};
    use glam::DVec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn target(hp: f64, armor: f64) -> Combatant {
        Combatant::new(EntityId(2), "Target", Team::Attacker, DVec3::ZERO, Health::new(hp, armor))
    }

    fn resolve(target: &mut Combatant, effects: &[EffectDescriptor]) -> ResolveReport {
        let buffs = BuffRegistry::new();
        let config = EngineConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        EffectResolver::new(&buffs, &config).resolve_with_rng(
            Some(EntityId(1)),
            target.id,
            Some(target),
            effects,
            &mut rng,
        )
    }

    #[test]
    fn test_effects_apply_in_order() {
        let mut unit = target(100.0, 0.0);
        let report = resolve(
            &mut unit,
            &[
                EffectDescriptor::damage(40.0),
                EffectDescriptor::heal(10.0),
                EffectDescriptor::status(StatusDescriptor::slow(0.5, 2.0)),
            ],
        );

        assert!(report.rejected.is_empty());
        let indices: Vec<usize> = report.applied.iter().map(|a| a.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert!((unit.health.current_hp - 70.0).abs() < f64::EPSILON);
        assert!((unit.mobility.move_multiplier() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_effects_skipped_rest_applied() {
        let mut unit = target(100.0, 0.0);
        let report = resolve(
            &mut unit,
            &[
                EffectDescriptor::damage(0.0),
                EffectDescriptor {
                    value: 5.0,
                    ..Default::default()
                },
                EffectDescriptor {
                    effect_type: Some("summon".to_string()),
                    value: 1.0,
                    ..Default::default()
                },
                EffectDescriptor::damage(25.0),
            ],
        );

        assert_eq!(report.rejected.len(), 3);
        assert_eq!(report.applied.len(), 1);
        assert_eq!(report.applied[0].index(), 3);
        assert!((unit.health.current_hp - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_damage_armor_applied_once() {
        let mut unit = target(100.0, 0.5);
        resolve(&mut unit, &[EffectDescriptor::damage(20.0)]);
        assert!((unit.health.current_hp - 90.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_target() {
        let buffs = BuffRegistry::new();
        let config = EngineConfig::default();
        let report = EffectResolver::new(&buffs, &config).resolve(
            None,
            EntityId(99),
            None,
            &[EffectDescriptor::damage(10.0), EffectDescriptor::heal(1.0)],
        );
        assert!(report.applied.is_empty());
        assert_eq!(report.rejected.len(), 2);
        assert_eq!(report.rejected[0].reason, RejectReason::TargetMissing(EntityId(99)));
    }

    #[test]
    fn test_empty_effect_list() {
        let mut unit = target(100.0, 0.0);
        let report = resolve(&mut unit, &[]);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].index, None);
        assert_eq!(report.rejected[0].reason, RejectReason::EmptyEffectList);
    }

    #[test]
    fn test_effects_after_death_rejected() {
        let mut unit = target(10.0, 0.0);
        let report = resolve(
            &mut unit,
            &[EffectDescriptor::damage(50.0), EffectDescriptor::heal(5.0)],
        );
        assert!(report.is_killing_blow());
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].reason, RejectReason::TargetDead(EntityId(2)));
        assert!(!unit.is_alive());
    }

    #[test]
    fn test_zero_chance_status_resisted() {
        let mut unit = target(100.0, 0.0);
        let report = resolve(
            &mut unit,
            &[EffectDescriptor::status(
                StatusDescriptor::slow(0.5, 2.0).with_chance(0.0),
            )],
        );
        assert_eq!(
            report.applied,
            vec![AppliedEffect::StatusResisted {
                index: 0,
                kind: StatusKind::Slow,
            }]
        );
        assert!(unit.statuses.is_empty());
    }

    #[test]
    fn test_status_on_hit_burn_stacks() {
        let mut unit = target(100.0, 0.0);
        let burn = EffectDescriptor::status_on_hit(StatusDescriptor::burn(3.0, 1.0, 2.0));
        resolve(&mut unit, &[burn.clone()]);
        let report = resolve(&mut unit, &[burn]);
        match &report.applied[0] {
            AppliedEffect::Status { change, .. } => {
                assert_eq!(*change, StatusChange::Stacked { active_burns: 2 })
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_buff_without_handler_is_observed() {
        let mut unit = target(100.0, 0.0);
        let report = resolve(&mut unit, &[EffectDescriptor::buff("damage", "percent", 0.1)]);
        assert!(report.rejected.is_empty());
        assert!(matches!(
            report.applied[0],
            AppliedEffect::Buff {
                outcome: BuffOutcome::Observed { .. },
                ..
            }
        ));
    }
}
