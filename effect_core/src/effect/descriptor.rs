//! EffectDescriptor - The canonical authored effect and its validated form

use crate::resolve::RejectReason;
use crate::types::{normalize_key, StatusKind};
use serde::{Deserialize, Serialize};

/// A single authored effect, as it appears in content JSON.
///
/// Deserialization is lenient: a descriptor with a missing or
/// unknown `effect_type` still loads, and is rejected per-effect when resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectDescriptor {
    /// `damage`, `heal`, `status`, `status_on_hit` or `buff`
    #[serde(default, alias = "effectType", skip_serializing_if = "Option::is_none")]
    pub effect_type: Option<String>,
    /// Damage/heal amount, buff amount, or armor shred fallback
    #[serde(default)]
    pub value: f64,
    /// Buff application mode (e.g. `flat`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Buffed stat name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stat: Option<String>,
    /// Nested status block for `status`/`status_on_hit`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusDescriptor>,
}

/// Authored status block nested inside a status effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusDescriptor {
    /// `slow`, `burn` or `armor_shred`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply: Option<String>,
    #[serde(default, alias = "durationSeconds")]
    pub duration_seconds: f64,
    /// Slow strength, 0 = no slow, 1 = fully stopped
    #[serde(default, alias = "slowPercent")]
    pub slow_percent: f64,
    /// Damage per burn tick
    #[serde(default, alias = "tickDamage")]
    pub tick_damage: f64,
    #[serde(default = "default_tick_interval", alias = "tickIntervalSeconds")]
    pub tick_interval_seconds: f64,
    /// Probability of applying, 0..=1
    #[serde(default = "default_chance")]
    pub chance: f64,
    /// Armor removed by a shred; falls back to the effect's `value`
    #[serde(default, alias = "shredAmount", skip_serializing_if = "Option::is_none")]
    pub shred_amount: Option<f64>,
}

fn default_tick_interval() -> f64 {
    1.0
}

fn default_chance() -> f64 {
    1.0
}

impl Default for StatusDescriptor {
    fn default() -> Self {
        StatusDescriptor {
            apply: None,
            duration_seconds: 0.0,
            slow_percent: 0.0,
            tick_damage: 0.0,
            tick_interval_seconds: default_tick_interval(),
            chance: default_chance(),
            shred_amount: None,
        }
    }
}

impl StatusDescriptor {
    /// Slow by `percent` (0..=1) for `duration` seconds
    pub fn slow(percent: f64, duration: f64) -> Self {
        StatusDescriptor {
            apply: Some("slow".to_string()),
            duration_seconds: duration,
            slow_percent: percent,
            ..Default::default()
        }
    }

    /// Burn for `tick_damage` every `interval` seconds over `duration`
    pub fn burn(tick_damage: f64, interval: f64, duration: f64) -> Self {
        StatusDescriptor {
            apply: Some("burn".to_string()),
            duration_seconds: duration,
            tick_damage,
            tick_interval_seconds: interval,
            ..Default::default()
        }
    }

    /// Remove `amount` (0..=1) armor for `duration` seconds
    pub fn armor_shred(amount: f64, duration: f64) -> Self {
        StatusDescriptor {
            apply: Some("armor_shred".to_string()),
            duration_seconds: duration,
            shred_amount: Some(amount),
            ..Default::default()
        }
    }

    pub fn with_chance(mut self, chance: f64) -> Self {
        self.chance = chance;
        self
    }
}

impl EffectDescriptor {
    pub fn damage(value: f64) -> Self {
        EffectDescriptor {
            effect_type: Some("damage".to_string()),
            value,
            ..Default::default()
        }
    }

    pub fn heal(value: f64) -> Self {
        EffectDescriptor {
            effect_type: Some("heal".to_string()),
            value,
            ..Default::default()
        }
    }

    pub fn status(status: StatusDescriptor) -> Self {
        EffectDescriptor {
            effect_type: Some("status".to_string()),
            status: Some(status),
            ..Default::default()
        }
    }

    /// Status applied when a hit lands; resolved exactly like `status`
    pub fn status_on_hit(status: StatusDescriptor) -> Self {
        EffectDescriptor {
            effect_type: Some("status_on_hit".to_string()),
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn buff(stat: &str, mode: &str, value: f64) -> Self {
        EffectDescriptor {
            effect_type: Some("buff".to_string()),
            value,
            mode: Some(mode.to_string()),
            stat: Some(stat.to_string()),
            status: None,
        }
    }

    /// Validate into a dispatchable [`Effect`]
    pub fn validate(&self) -> Result<Effect, RejectReason> {
        let raw_type = match self.effect_type.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => return Err(RejectReason::MissingEffectType),
        };

        match normalize_key(raw_type).as_str() {
            "damage" => {
                require_positive("damage", self.value)?;
                Ok(Effect::Damage { amount: self.value })
            }
            "heal" => {
                require_positive("heal", self.value)?;
                Ok(Effect::Heal { amount: self.value })
            }
            "status" | "status_on_hit" => {
                let status = self.status.as_ref().ok_or(RejectReason::MissingStatus)?;
                Ok(Effect::Status(status.validate(self.value)?))
            }
            "buff" => Ok(Effect::Buff(BuffSpec {
                stat: self.stat.as_deref().map(normalize_key).unwrap_or_default(),
                mode: self
                    .mode
                    .as_deref()
                    .map(normalize_key)
                    .unwrap_or_else(|| "flat".to_string()),
                value: self.value,
            })),
            other => Err(RejectReason::UnknownEffectType(other.to_string())),
        }
    }
}

impl StatusDescriptor {
    /// Validate into a [`StatusSpec`]; `effect_value` backs the shred amount
    pub fn validate(&self, effect_value: f64) -> Result<StatusSpec, RejectReason> {
        let name = self
            .apply
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(RejectReason::MissingStatusKind)?;
        let kind = StatusKind::from_name(name)
            .ok_or_else(|| RejectReason::UnknownStatusKind(name.to_string()))?;

        if !(self.duration_seconds.is_finite() && self.duration_seconds > 0.0) {
            return Err(RejectReason::InvalidDuration(self.duration_seconds));
        }

        let (magnitude, tick_interval) = match kind {
            StatusKind::Slow => (clamp_unit(self.slow_percent), 0.0),
            StatusKind::ArmorShred => {
                (clamp_unit(self.shred_amount.unwrap_or(effect_value)), 0.0)
            }
            StatusKind::Burn => {
                require_positive("burn tick_damage", self.tick_damage)?;
                if !(self.tick_interval_seconds.is_finite() && self.tick_interval_seconds > 0.0) {
                    return Err(RejectReason::InvalidTickInterval(self.tick_interval_seconds));
                }
                (self.tick_damage, self.tick_interval_seconds)
            }
        };

        Ok(StatusSpec {
            kind,
            duration: self.duration_seconds,
            magnitude,
            tick_interval,
            chance: if self.chance.is_nan() { 0.0 } else { self.chance.clamp(0.0, 1.0) },
        })
    }
}

fn require_positive(effect: &str, value: f64) -> Result<(), RejectReason> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(RejectReason::NonPositiveValue {
            effect: effect.to_string(),
            value,
        })
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// A validated, dispatchable effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    Damage { amount: f64 },
    Heal { amount: f64 },
    /// Covers both `status` and `status_on_hit`
    Status(StatusSpec),
    Buff(BuffSpec),
}

/// A validated status application
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusSpec {
    pub kind: StatusKind,
    pub duration: f64,
    /// Slow percent, shred amount (both 0..=1) or burn tick damage
    pub magnitude: f64,
    /// Burn only; 0 for slow/shred
    pub tick_interval: f64,
    pub chance: f64,
}

/// A validated buff, keyed by normalized stat and mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuffSpec {
    pub stat: String,
    pub mode: String,
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_damage_and_heal() {
        assert_eq!(
            EffectDescriptor::damage(12.0).validate(),
            Ok(Effect::Damage { amount: 12.0 })
        );
        assert_eq!(
            EffectDescriptor::heal(5.0).validate(),
            Ok(Effect::Heal { amount: 5.0 })
        );
    }

    #[test]
    fn test_non_positive_values_rejected() {
        assert!(matches!(
            EffectDescriptor::damage(0.0).validate(),
            Err(RejectReason::NonPositiveValue { .. })
        ));
        assert!(matches!(
            EffectDescriptor::heal(-3.0).validate(),
            Err(RejectReason::NonPositiveValue { .. })
        ));
        assert!(matches!(
            EffectDescriptor::damage(f64::NAN).validate(),
            Err(RejectReason::NonPositiveValue { .. })
        ));
    }

    #[test]
    fn test_missing_and_unknown_type() {
        let missing = EffectDescriptor {
            value: 10.0,
            ..Default::default()
        };
        assert_eq!(missing.validate(), Err(RejectReason::MissingEffectType));

        let unknown = EffectDescriptor {
            effect_type: Some("teleport".to_string()),
            value: 1.0,
            ..Default::default()
        };
        assert_eq!(
            unknown.validate(),
            Err(RejectReason::UnknownEffectType("teleport".to_string()))
        );
    }

    #[test]
    fn test_status_on_hit_same_as_status() {
        let a = EffectDescriptor::status(StatusDescriptor::slow(0.4, 2.0)).validate();
        let b = EffectDescriptor::status_on_hit(StatusDescriptor::slow(0.4, 2.0)).validate();
        assert_eq!(a, b);
    }

    #[test]
    fn test_status_magnitudes_clamped() {
        let slow = StatusDescriptor::slow(1.5, 1.0).validate(0.0).unwrap();
        assert!((slow.magnitude - 1.0).abs() < f64::EPSILON);

        let shred = StatusDescriptor::armor_shred(-0.2, 1.0).validate(0.0).unwrap();
        assert!(shred.magnitude.abs() < f64::EPSILON);
    }

    #[test]
    fn test_shred_falls_back_to_effect_value() {
        let mut status = StatusDescriptor::armor_shred(0.0, 3.0);
        status.shred_amount = None;
        let effect = EffectDescriptor {
            value: 0.25,
            ..EffectDescriptor::status(status)
        };
        match effect.validate().unwrap() {
            Effect::Status(spec) => {
                assert_eq!(spec.kind, StatusKind::ArmorShred);
                assert!((spec.magnitude - 0.25).abs() < f64::EPSILON);
            }
            other => panic!("unexpected effect {:?}", other),
        }
    }

    #[test]
    fn test_status_rejections() {
        let no_block = EffectDescriptor {
            effect_type: Some("status".to_string()),
            ..Default::default()
        };
        assert_eq!(no_block.validate(), Err(RejectReason::MissingStatus));

        let no_apply = EffectDescriptor::status(StatusDescriptor {
            duration_seconds: 1.0,
            ..Default::default()
        });
        assert_eq!(no_apply.validate(), Err(RejectReason::MissingStatusKind));

        let mut freeze = StatusDescriptor::slow(0.5, 1.0);
        freeze.apply = Some("freeze".to_string());
        assert_eq!(
            EffectDescriptor::status(freeze).validate(),
            Err(RejectReason::UnknownStatusKind("freeze".to_string()))
        );

        assert_eq!(
            EffectDescriptor::status(StatusDescriptor::slow(0.5, 0.0)).validate(),
            Err(RejectReason::InvalidDuration(0.0))
        );

        assert_eq!(
            EffectDescriptor::status(StatusDescriptor::burn(5.0, 0.0, 3.0)).validate(),
            Err(RejectReason::InvalidTickInterval(0.0))
        );
    }

    #[test]
    fn test_deserialize_spec_example() {
        let json = r#"{"effect_type": "status", "status": {"apply": "slow", "slow_percent": 0.5, "duration_seconds": 1}}"#;
        let descriptor: EffectDescriptor = serde_json::from_str(json).unwrap();
        let status = descriptor.status.as_ref().unwrap();
        assert!((status.chance - 1.0).abs() < f64::EPSILON);
        assert!((status.tick_interval_seconds - 1.0).abs() < f64::EPSILON);

        match descriptor.validate().unwrap() {
            Effect::Status(spec) => {
                assert_eq!(spec.kind, StatusKind::Slow);
                assert!((spec.magnitude - 0.5).abs() < f64::EPSILON);
                assert!((spec.duration - 1.0).abs() < f64::EPSILON);
            }
            other => panic!("unexpected effect {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{"effectType": "StatusOnHit", "status": {"apply": "Burn", "durationSeconds": 3, "tickDamage": 4, "tickIntervalSeconds": 0.5}}"#;
        let descriptor: EffectDescriptor = serde_json::from_str(json).unwrap();
        match descriptor.validate().unwrap() {
            Effect::Status(spec) => {
                assert_eq!(spec.kind, StatusKind::Burn);
                assert!((spec.magnitude - 4.0).abs() < f64::EPSILON);
                assert!((spec.tick_interval - 0.5).abs() < f64::EPSILON);
            }
            other => panic!("unexpected effect {:?}", other),
        }
    }

    #[test]
    fn test_buff_defaults_mode() {
        let descriptor = EffectDescriptor {
            effect_type: Some("buff".to_string()),
            stat: Some("MoveSpeed".to_string()),
            value: 0.2,
            ..Default::default()
        };
        assert_eq!(
            descriptor.validate(),
            Ok(Effect::Buff(BuffSpec {
                stat: "move_speed".to_string(),
                mode: "flat".to_string(),
                value: 0.2,
            }))
        );
    }
}
