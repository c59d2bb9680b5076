//! Property tests for health, status reversal and area queries

use effect_core::prelude::*;
use effect_core::status::burn_tick_count;
use proptest::prelude::*;

const CAP: f64 = 0.9;

fn dummy(hp: f64, armor: f64) -> Combatant {
    Combatant::new(EntityId(1), "dummy", Team::Attacker, DVec3::ZERO, Health::new(hp, armor))
}

proptest! {
    #[test]
    fn heal_never_exceeds_max(
        max_hp in 1.0f64..1000.0,
        damage in 0.0f64..2000.0,
        heal in -100.0f64..5000.0,
    ) {
        let mut health = Health::new(max_hp, 0.0);
        health.take_damage(damage, CAP);
        health.heal(heal);
        prop_assert!(health.current_hp <= health.max_hp);
        prop_assert!(health.current_hp >= 0.0);
    }

    #[test]
    fn non_positive_damage_never_changes_hp(max_hp in 1.0f64..1000.0, amount in -1000.0f64..=0.0) {
        let mut field = Battlefield::with_seed(EngineConfig::default(), 3);
        field.spawn(dummy(max_hp, 0.2));
        let report = field.resolve(None, EntityId(1), &[EffectDescriptor::damage(amount)]);
        prop_assert!(report.applied.is_empty());
        prop_assert_eq!(field.get(EntityId(1)).unwrap().health.current_hp, max_hp);
    }

    #[test]
    fn dealt_damage_respects_armor_cap(raw in 0.1f64..500.0, armor in -1.0f64..2.0) {
        let mut health = Health::new(10_000.0, armor);
        let taken = health.take_damage(raw, CAP);
        prop_assert!(taken.dealt_amount >= raw * (1.0 - CAP) - 1e-9);
        prop_assert!(taken.dealt_amount <= raw + 1e-9);
    }

    #[test]
    fn shred_sequence_restores_armor(
        amounts in prop::collection::vec((0.0f64..1.0, 0.1f64..5.0), 1..8),
    ) {
        let mut combatant = dummy(100.0, 0.4);
        let mut strongest: f64 = 0.0;
        for (amount, duration) in &amounts {
            let spec = StatusDescriptor::armor_shred(*amount, *duration).validate(0.0).unwrap();
            combatant.apply_status(&spec, None);
            strongest = strongest.max(*amount);
            prop_assert!((combatant.health.armor_modifier() + strongest).abs() < 1e-9);
        }
        combatant.tick_statuses(10.0, CAP);
        prop_assert!(combatant.health.armor_modifier().abs() < 1e-9);
        prop_assert!(!combatant.statuses.has(StatusKind::ArmorShred));
    }

    #[test]
    fn slow_restores_speed_after_any_tick_pattern(
        percent in 0.0f64..1.0,
        duration in 0.1f64..3.0,
        steps in prop::collection::vec(0.01f64..0.5, 1..40),
    ) {
        let mut combatant = dummy(100.0, 0.0);
        let spec = StatusDescriptor::slow(percent, duration).validate(0.0).unwrap();
        combatant.apply_status(&spec, None);
        for dt in steps {
            combatant.tick_statuses(dt, CAP);
        }
        combatant.tick_statuses(duration, CAP);
        prop_assert!((combatant.mobility.move_multiplier() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn burn_total_independent_of_frame_rate(
        tick_damage in 1.0f64..20.0,
        interval in 0.1f64..2.0,
        duration in 0.1f64..6.0,
        dt in 0.01f64..0.5,
    ) {
        let mut combatant = dummy(1_000_000.0, 0.0);
        let spec = StatusDescriptor::burn(tick_damage, interval, duration).validate(0.0).unwrap();
        combatant.apply_status(&spec, None);

        let mut dealt = 0.0;
        let mut elapsed = 0.0;
        while elapsed < duration + interval * 2.0 {
            dealt += combatant.tick_statuses(dt, CAP).burn_damage;
            elapsed += dt;
        }
        let expected = burn_tick_count(duration, interval) as f64 * tick_damage;
        prop_assert!((dealt - expected).abs() < 1e-6);
        prop_assert!(combatant.statuses.burns().is_empty());
    }

    #[test]
    fn area_query_returns_each_entity_once(
        offsets in prop::collection::vec((-1.0f64..1.0, -1.0f64..1.0, -1.0f64..1.0), 1..6),
        radius in 0.1f64..3.0,
    ) {
        let colliders = offsets
            .iter()
            .map(|(x, y, z)| Collider::new(DVec3::new(*x, *y, *z), 0.5))
            .collect();
        let mut field = Battlefield::with_seed(EngineConfig::default(), 9);
        field.spawn(dummy(100.0, 0.0).with_colliders(colliders));

        let hits = field.query_area(DVec3::ZERO, radius, TargetFilter::Any);
        prop_assert!(hits.len() <= 1);
        let effects = [EffectDescriptor::damage(1.0)];
        let reports = field.resolve_area(None, DVec3::ZERO, radius, TargetFilter::Any, &effects);
        prop_assert_eq!(reports.len(), hits.len());
    }
}
