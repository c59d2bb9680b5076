//! Core identifiers and tags shared across the engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a live entity on the battlefield
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u32);

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        EntityId(id)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which side an entity fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    /// Lane units pushing toward the base
    Attacker,
    /// Towers, traps and the base itself
    Defender,
    #[default]
    Neutral,
}

/// Timed status kinds understood by the status engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Slow,
    Burn,
    ArmorShred,
}

impl StatusKind {
    /// Parse an authored status name (`"slow"`, `"ArmorShred"`, `"armor-shred"`, ...)
    pub fn from_name(name: &str) -> Option<StatusKind> {
        match normalize_key(name).as_str() {
            "slow" => Some(StatusKind::Slow),
            "burn" => Some(StatusKind::Burn),
            "armor_shred" | "armour_shred" => Some(StatusKind::ArmorShred),
            _ => None,
        }
    }

    /// Canonical snake_case name
    pub fn name(&self) -> &'static str {
        match self {
            StatusKind::Slow => "slow",
            StatusKind::Burn => "burn",
            StatusKind::ArmorShred => "armor_shred",
        }
    }

    /// Whether reapplication refreshes a single instance in place.
    ///
    /// Burns never refresh: each application runs its own timer.
    pub fn refreshes_in_place(&self) -> bool {
        !matches!(self, StatusKind::Burn)
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Normalize an authored key to snake_case.
///
/// Handles PascalCase/camelCase (`StatusOnHit`), kebab-case and stray
/// whitespace, so every authoring schema lands on the same spelling.
pub fn normalize_key(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    let mut prev_lower = false;

    for c in raw.trim().chars() {
        if c == '-' || c == ' ' || c == '_' {
            if !out.ends_with('_') && !out.is_empty() {
                out.push('_');
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }

    while out.ends_with('_') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("damage"), "damage");
        assert_eq!(normalize_key("  Heal "), "heal");
        assert_eq!(normalize_key("StatusOnHit"), "status_on_hit");
        assert_eq!(normalize_key("status_on_hit"), "status_on_hit");
        assert_eq!(normalize_key("armor-shred"), "armor_shred");
        assert_eq!(normalize_key("ARMOR_SHRED"), "armor_shred");
        assert_eq!(normalize_key("move speed"), "move_speed");
    }

    #[test]
    fn test_status_kind_from_name() {
        assert_eq!(StatusKind::from_name("Slow"), Some(StatusKind::Slow));
        assert_eq!(StatusKind::from_name("burn"), Some(StatusKind::Burn));
        assert_eq!(StatusKind::from_name("ArmorShred"), Some(StatusKind::ArmorShred));
        assert_eq!(StatusKind::from_name("freeze"), None);
    }

    #[test]
    fn test_burn_does_not_refresh() {
        assert!(StatusKind::Slow.refreshes_in_place());
        assert!(StatusKind::ArmorShred.refreshes_in_place());
        assert!(!StatusKind::Burn.refreshes_in_place());
    }

    #[test]
    fn test_entity_id_display() {
        assert_eq!(EntityId(7).to_string(), "#7");
    }
}
