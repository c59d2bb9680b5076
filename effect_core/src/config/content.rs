//! Content library - authored spells, units, towers, traps and heroes

use super::ConfigError;
use crate::effect::{
    EffectDescriptor, EffectOrigin, EffectSchema, HeroDefinition, SpellDefinition,
    TowerDefinition, TrapDefinition, UnitDefinition,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// On-disk layout of a content file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ContentFile {
    #[serde(default)]
    spells: Vec<SpellDefinition>,
    #[serde(default)]
    units: Vec<UnitDefinition>,
    #[serde(default)]
    towers: Vec<TowerDefinition>,
    #[serde(default)]
    traps: Vec<TrapDefinition>,
    #[serde(default)]
    heroes: Vec<HeroDefinition>,
}

/// All authored definitions, indexed by id
#[derive(Debug, Clone, Default)]
pub struct ContentLibrary {
    spells: HashMap<String, SpellDefinition>,
    units: HashMap<String, UnitDefinition>,
    towers: HashMap<String, TowerDefinition>,
    traps: HashMap<String, TrapDefinition>,
    heroes: HashMap<String, HeroDefinition>,
}

impl ContentLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load content from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file: ContentFile = super::load_json(path)?;
        Self::from_file(file)
    }

    /// Load content from a JSON string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let file: ContentFile = super::parse_json(content)?;
        Self::from_file(file)
    }

    fn from_file(file: ContentFile) -> Result<Self, ConfigError> {
        let library = ContentLibrary {
            spells: index(file.spells)?,
            units: index(file.units)?,
            towers: index(file.towers)?,
            traps: index(file.traps)?,
            heroes: index(file.heroes)?,
        };
        log::info!(
            "content loaded: {} spells, {} units, {} towers, {} traps, {} heroes",
            library.spells.len(),
            library.units.len(),
            library.towers.len(),
            library.traps.len(),
            library.heroes.len()
        );
        Ok(library)
    }

    pub fn spell(&self, id: &str) -> Option<&SpellDefinition> {
        self.spells.get(id)
    }

    pub fn unit(&self, id: &str) -> Option<&UnitDefinition> {
        self.units.get(id)
    }

    pub fn tower(&self, id: &str) -> Option<&TowerDefinition> {
        self.towers.get(id)
    }

    pub fn trap(&self, id: &str) -> Option<&TrapDefinition> {
        self.traps.get(id)
    }

    pub fn hero(&self, id: &str) -> Option<&HeroDefinition> {
        self.heroes.get(id)
    }

    /// Normalized effect list for any definition
    pub fn effects(&self, origin: EffectOrigin, id: &str) -> Option<Vec<EffectDescriptor>> {
        match origin {
            EffectOrigin::Spell => self.spell(id).map(EffectSchema::normalized_effects),
            EffectOrigin::Unit => self.unit(id).map(EffectSchema::normalized_effects),
            EffectOrigin::Tower => self.tower(id).map(EffectSchema::normalized_effects),
            EffectOrigin::Trap => self.trap(id).map(EffectSchema::normalized_effects),
            EffectOrigin::Hero => self.hero(id).map(EffectSchema::normalized_effects),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
            && self.units.is_empty()
            && self.towers.is_empty()
            && self.traps.is_empty()
            && self.heroes.is_empty()
    }
}

fn index<T: EffectSchema>(definitions: Vec<T>) -> Result<HashMap<String, T>, ConfigError> {
    let mut seen = HashSet::new();
    let mut map = HashMap::with_capacity(definitions.len());
    for definition in definitions {
        let id = definition.id().to_string();
        if !seen.insert(id.clone()) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate {} id '{}'",
                definition.origin(),
                id
            )));
        }
        map.insert(id, definition);
    }
    Ok(map)
}
