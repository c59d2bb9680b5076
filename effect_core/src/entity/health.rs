//! Health, armor and movement state for an entity

use serde::{Deserialize, Serialize};

/// Hit points plus fractional armor.
///
/// Armor is a damage reduction fraction. Temporary changes go through
/// [`Health::adjust_armor`] as additive deltas so that every removal restores
/// exactly what was taken away.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub current_hp: f64,
    pub max_hp: f64,
    /// Armor before temporary modifiers, 0..=1
    pub base_armor: f64,
    /// Sum of all active armor deltas (shreds are negative)
    #[serde(default)]
    armor_modifier: f64,
}

/// Outcome of a single damage application
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageTaken {
    /// Damage before armor
    pub raw_amount: f64,
    /// Amount removed by armor
    pub mitigated_amount: f64,
    /// HP actually lost (capped by remaining HP)
    pub dealt_amount: f64,
    /// Whether this hit took the entity from alive to dead
    pub is_killing_blow: bool,
}

impl Health {
    /// Full health with the given armor
    pub fn new(max_hp: f64, base_armor: f64) -> Self {
        let max_hp = max_hp.max(0.0);
        Health {
            current_hp: max_hp,
            max_hp,
            base_armor,
            armor_modifier: 0.0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0.0
    }

    /// Current additive armor delta
    pub fn armor_modifier(&self) -> f64 {
        self.armor_modifier
    }

    /// Add a delta to the armor modifier; pass the negated delta to undo it
    pub fn adjust_armor(&mut self, delta: f64) {
        self.armor_modifier += delta;
    }

    /// Armor after modifiers, clamped to `[0, max_reduction]`
    pub fn effective_armor(&self, max_reduction: f64) -> f64 {
        (self.base_armor + self.armor_modifier).clamp(0.0, max_reduction.max(0.0))
    }

    /// Percentage of max HP remaining
    pub fn hp_percent(&self) -> f64 {
        if self.max_hp <= 0.0 {
            return 0.0;
        }
        (self.current_hp / self.max_hp * 100.0).clamp(0.0, 100.0)
    }

    /// Apply raw damage, mitigated once by effective armor
    pub fn take_damage(&mut self, raw: f64, max_reduction: f64) -> DamageTaken {
        if raw <= 0.0 || !raw.is_finite() {
            return DamageTaken {
                raw_amount: raw,
                mitigated_amount: 0.0,
                dealt_amount: 0.0,
                is_killing_blow: false,
            };
        }

        let was_alive = self.is_alive();
        let armor = self.effective_armor(max_reduction);
        let after_armor = raw * (1.0 - armor);
        let dealt = after_armor.min(self.current_hp.max(0.0));

        self.current_hp = (self.current_hp - after_armor).max(0.0);

        DamageTaken {
            raw_amount: raw,
            mitigated_amount: raw - after_armor,
            dealt_amount: dealt,
            is_killing_blow: was_alive && !self.is_alive(),
        }
    }

    /// Heal up to max HP; returns the amount actually restored
    pub fn heal(&mut self, amount: f64) -> f64 {
        if amount <= 0.0 || !amount.is_finite() {
            return 0.0;
        }
        let before = self.current_hp;
        self.current_hp = (self.current_hp + amount).min(self.max_hp);
        (self.current_hp - before).max(0.0)
    }
}

/// Movement speed with an additive, reversible multiplier delta
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mobility {
    /// Units per second at multiplier 1.0
    pub base_speed: f64,
    #[serde(default)]
    move_modifier: f64,
}

impl Mobility {
    pub fn new(base_speed: f64) -> Self {
        Mobility {
            base_speed,
            move_modifier: 0.0,
        }
    }

    /// Current additive multiplier delta (slows are negative)
    pub fn move_modifier(&self) -> f64 {
        self.move_modifier
    }

    /// Add a delta to the move multiplier; pass the negated delta to undo it
    pub fn adjust_move(&mut self, delta: f64) {
        self.move_modifier += delta;
    }

    /// Movement multiplier, never below 0
    pub fn move_multiplier(&self) -> f64 {
        (1.0 + self.move_modifier).max(0.0)
    }

    pub fn effective_speed(&self) -> f64 {
        self.base_speed * self.move_multiplier()
    }
}

impl Default for Mobility {
    fn default() -> Self {
        Mobility::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_without_armor() {
        let mut health = Health::new(100.0, 0.0);
        let taken = health.take_damage(30.0, 0.9);
        assert!((taken.dealt_amount - 30.0).abs() < f64::EPSILON);
        assert!((health.current_hp - 70.0).abs() < f64::EPSILON);
        assert!(!taken.is_killing_blow);
    }

    #[test]
    fn test_armor_mitigates_once() {
        let mut health = Health::new(100.0, 0.25);
        let taken = health.take_damage(40.0, 0.9);
        assert!((taken.mitigated_amount - 10.0).abs() < 1e-9);
        assert!((health.current_hp - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_armor_cap() {
        let health = Health::new(100.0, 1.5);
        assert!((health.effective_armor(0.9) - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shredded_armor_floors_at_zero() {
        let mut health = Health::new(100.0, 0.2);
        health.adjust_armor(-0.5);
        assert!(health.effective_armor(0.9).abs() < f64::EPSILON);
        health.adjust_armor(0.5);
        assert!((health.effective_armor(0.9) - 0.2).abs() < f64::EPSILON);
        assert!(health.armor_modifier().abs() < f64::EPSILON);
    }

    #[test]
    fn test_killing_blow() {
        let mut health = Health::new(20.0, 0.0);
        let taken = health.take_damage(50.0, 0.9);
        assert!(taken.is_killing_blow);
        assert!((taken.dealt_amount - 20.0).abs() < f64::EPSILON);
        assert!(!health.is_alive());
        assert!(health.current_hp.abs() < f64::EPSILON);

        let again = health.take_damage(10.0, 0.9);
        assert!(!again.is_killing_blow);
        assert!(again.dealt_amount.abs() < f64::EPSILON);
    }

    #[test]
    fn test_heal_clamps_to_max() {
        let mut health = Health::new(100.0, 0.0);
        health.take_damage(10.0, 0.9);
        let healed = health.heal(50.0);
        assert!((healed - 10.0).abs() < f64::EPSILON);
        assert!((health.current_hp - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_mobility_multiplier() {
        let mut mobility = Mobility::new(4.0);
        mobility.adjust_move(-0.5);
        assert!((mobility.move_multiplier() - 0.5).abs() < f64::EPSILON);
        assert!((mobility.effective_speed() - 2.0).abs() < f64::EPSILON);
        mobility.adjust_move(0.5);
        assert!((mobility.move_multiplier() - 1.0).abs() < f64::EPSILON);
    }
}
