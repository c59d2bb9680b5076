//! Engine constants configuration

use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable engine constants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub armor: ArmorConstants,
    #[serde(default)]
    pub status: StatusConstants,
    #[serde(default)]
    pub projectile: ProjectileConstants,
    #[serde(default)]
    pub battlefield: BattlefieldConstants,
}

impl EngineConfig {
    /// Load and validate constants from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config: EngineConfig = super::load_toml(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate constants from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = super::parse_toml(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.armor.max_reduction) {
            return Err(ConfigError::ValidationError(format!(
                "armor.max_reduction must be within 0..=1, got {}",
                self.armor.max_reduction
            )));
        }
        if self.status.min_tick_interval <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "status.min_tick_interval must be positive, got {}",
                self.status.min_tick_interval
            )));
        }
        if self.projectile.default_speed <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "projectile.default_speed must be positive, got {}",
                self.projectile.default_speed
            )));
        }
        if self.projectile.min_flight_time <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "projectile.min_flight_time must be positive, got {}",
                self.projectile.min_flight_time
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmorConstants {
    /// Highest fraction of damage armor can remove
    #[serde(default = "default_max_reduction")]
    pub max_reduction: f64,
}

impl Default for ArmorConstants {
    fn default() -> Self {
        ArmorConstants {
            max_reduction: default_max_reduction(),
        }
    }
}

fn default_max_reduction() -> f64 {
    0.9
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusConstants {
    /// Floor for burn tick intervals
    #[serde(default = "default_min_tick_interval")]
    pub min_tick_interval: f64,
}

impl Default for StatusConstants {
    fn default() -> Self {
        StatusConstants {
            min_tick_interval: default_min_tick_interval(),
        }
    }
}

fn default_min_tick_interval() -> f64 {
    0.05
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileConstants {
    /// Speed for towers that don't define a projectile
    #[serde(default = "default_projectile_speed")]
    pub default_speed: f64,
    /// Shortest allowed flight, for point-blank shots
    #[serde(default = "default_min_flight_time")]
    pub min_flight_time: f64,
}

impl Default for ProjectileConstants {
    fn default() -> Self {
        ProjectileConstants {
            default_speed: default_projectile_speed(),
            min_flight_time: default_min_flight_time(),
        }
    }
}

fn default_projectile_speed() -> f64 {
    10.0
}
fn default_min_flight_time() -> f64 {
    0.05
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattlefieldConstants {
    /// Remove dead entities (and their timers) at the end of each tick
    #[serde(default = "default_despawn_on_death")]
    pub despawn_on_death: bool,
}

impl Default for BattlefieldConstants {
    fn default() -> Self {
        BattlefieldConstants {
            despawn_on_death: default_despawn_on_death(),
        }
    }
}

fn default_despawn_on_death() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = EngineConfig::parse("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert!((config.armor.max_reduction - 0.9).abs() < f64::EPSILON);
        assert!(config.battlefield.despawn_on_death);
    }

    #[test]
    fn test_partial_override() {
        let toml = r#"
[armor]
max_reduction = 0.75

[projectile]
default_speed = 14.0
"#;
        let config = EngineConfig::parse(toml).unwrap();
        assert!((config.armor.max_reduction - 0.75).abs() < f64::EPSILON);
        assert!((config.projectile.default_speed - 14.0).abs() < f64::EPSILON);
        assert!((config.projectile.min_flight_time - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let err = EngineConfig::parse("[armor]\nmax_reduction = 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        let err = EngineConfig::parse("[status]\nmin_tick_interval = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_malformed_toml() {
        let err = EngineConfig::parse("[armor\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
