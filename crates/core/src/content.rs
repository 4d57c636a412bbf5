//! Tile, mob, and item definitions validated once at load time.
//! Tile reference chains are flattened here so runtime lookups never walk them.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::types::{BlockingSpec, Combatant};

pub mod keys {
    pub const DEFAULT_TILE: &str = "default";
    pub const FLOOR: &str = "floor";
    pub const CLOSED_DOOR: &str = "closed-door";
    pub const OPEN_DOOR: &str = "open-door";
    pub const STAIRS_MARKERS: [&str; 2] = ["stairs", "ladder"];
    pub const UP: &str = "up";
    pub const DOWN: &str = "down";

    pub const DEFAULT_MOB_HEALTH: i32 = 10;
    pub const DEFAULT_MOB_ATTACK: i32 = 3;
    pub const DEFAULT_MOB_HIT_CHANCE: u8 = 50;
}

pub type Rgb = [u8; 3];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconColor {
    pub lit: Rgb,
    pub unlit: Rgb,
}

impl Default for IconColor {
    fn default() -> Self {
        Self { lit: [200, 200, 200], unlit: [100, 100, 100] }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Icon {
    #[serde(default)]
    pub character: Option<char>,
    #[serde(default)]
    pub color: IconColor,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Display {
    #[serde(default)]
    pub icon: Icon,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
struct MovementRecord {
    #[serde(default)]
    rate: u8,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
struct SightRecord {
    #[serde(default)]
    opaque: u8,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
struct BlockingRecord {
    #[serde(default)]
    movement: MovementRecord,
    #[serde(default)]
    sight: SightRecord,
}

impl From<BlockingRecord> for BlockingSpec {
    fn from(record: BlockingRecord) -> Self {
        BlockingSpec {
            movement_rate: record.movement.rate.min(BlockingSpec::FULL),
            sight_opacity: record.sight.opaque.min(BlockingSpec::FULL),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
struct TileRecord {
    name: String,
    #[serde(default, rename = "ref")]
    reference: Option<String>,
    #[serde(default)]
    blocking: Option<BlockingRecord>,
    #[serde(default)]
    display: Display,
}

/// Shared definition a grid cell's name resolves to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileKind {
    pub name: String,
    pub blocking: Option<BlockingSpec>,
    pub display: Display,
    pub reference: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MobDef {
    pub name: String,
    #[serde(default)]
    pub display: Display,
    #[serde(default)]
    pub health: Option<i32>,
    #[serde(default)]
    pub attack: Option<i32>,
    #[serde(default)]
    pub hit_chance: Option<u8>,
}

impl MobDef {
    /// Combat stats with the documented defaults filled in.
    pub fn spawn_stats(&self) -> Combatant {
        Combatant {
            health: self.health.unwrap_or(keys::DEFAULT_MOB_HEALTH),
            attack_max: self.attack.unwrap_or(keys::DEFAULT_MOB_ATTACK).max(1),
            hit_chance_pct: self.hit_chance.unwrap_or(keys::DEFAULT_MOB_HIT_CHANCE).min(100),
            display_name: self.name.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ItemDef {
    pub name: String,
    #[serde(default)]
    pub display: Display,
}

#[derive(Debug, Default, Deserialize)]
struct DefinitionFile {
    #[serde(default)]
    tile: Vec<TileRecord>,
    #[serde(default)]
    mob: Vec<MobDef>,
    #[serde(default)]
    item: Vec<ItemDef>,
}

pub struct ContentPack {
    kinds: BTreeMap<String, TileKind>,
    // Every defined name mapped to the concrete kind its reference chain ends at.
    resolved: BTreeMap<String, String>,
    symbols: BTreeMap<char, Vec<String>>,
    mobs: Vec<MobDef>,
    items: Vec<ItemDef>,
}

impl ContentPack {
    /// Parses `(file name, TOML text)` pairs holding `[[tile]]`, `[[mob]]`, and `[[item]]`
    /// records, then validates and flattens them.
    pub fn parse<'a, I>(files: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut merged = DefinitionFile::default();
        for (file, text) in files {
            let parsed: DefinitionFile = toml::from_str(text)
                .map_err(|source| SchemaError::Parse { file: file.to_string(), source })?;
            merged.tile.extend(parsed.tile);
            merged.mob.extend(parsed.mob);
            merged.item.extend(parsed.item);
        }
        Self::build(merged)
    }

    fn build(definitions: DefinitionFile) -> Result<Self, SchemaError> {
        let mut kinds = BTreeMap::new();
        let mut symbols: BTreeMap<char, Vec<String>> = BTreeMap::new();
        for record in definitions.tile {
            if kinds.contains_key(&record.name) {
                return Err(SchemaError::Duplicate { kind: "tile", name: record.name });
            }
            if record.name != keys::DEFAULT_TILE
                && let Some(character) = record.display.icon.character
            {
                symbols.entry(character).or_default().push(record.name.clone());
            }
            let kind = TileKind {
                name: record.name.clone(),
                blocking: record.blocking.map(BlockingSpec::from),
                display: record.display,
                reference: record.reference,
            };
            kinds.insert(record.name, kind);
        }

        let mut resolved = BTreeMap::new();
        for name in kinds.keys() {
            resolved.insert(name.clone(), follow_references(&kinds, name)?);
        }

        ensure_unique("mob", definitions.mob.iter().map(|mob| mob.name.as_str()))?;
        ensure_unique("item", definitions.item.iter().map(|item| item.name.as_str()))?;

        Ok(Self { kinds, resolved, symbols, mobs: definitions.mob, items: definitions.item })
    }

    /// The concrete kind `name` resolves to.
    pub fn resolve_kind(&self, name: &str) -> Result<&TileKind, SchemaError> {
        self.resolved
            .get(name)
            .and_then(|concrete| self.kinds.get(concrete))
            .ok_or_else(|| SchemaError::UnknownKind(name.to_string()))
    }

    /// Raw definition of `name`, without following references.
    pub fn kind(&self, name: &str) -> Option<&TileKind> {
        self.kinds.get(name)
    }

    /// Candidate kind names for a map symbol, in definition order.
    pub fn symbol_candidates(&self, symbol: char) -> Option<&[String]> {
        self.symbols.get(&symbol).map(Vec::as_slice).filter(|names| !names.is_empty())
    }

    pub fn mobs(&self) -> &[MobDef] {
        &self.mobs
    }

    pub fn items(&self) -> &[ItemDef] {
        &self.items
    }

    pub fn item(&self, name: &str) -> Result<&ItemDef, SchemaError> {
        self.items
            .iter()
            .find(|item| item.name == name)
            .ok_or_else(|| SchemaError::UnknownItem(name.to_string()))
    }
}

fn follow_references(
    kinds: &BTreeMap<String, TileKind>,
    start: &str,
) -> Result<String, SchemaError> {
    let mut seen = BTreeSet::new();
    let mut current = start;
    loop {
        if !seen.insert(current) {
            return Err(SchemaError::CyclicReference { name: start.to_string() });
        }
        let kind = &kinds[current];
        let Some(reference) = kind.reference.as_deref() else {
            return Ok(current.to_string());
        };
        if !kinds.contains_key(reference) {
            return Err(SchemaError::MissingReference {
                name: current.to_string(),
                reference: reference.to_string(),
            });
        }
        current = reference;
    }
}

fn ensure_unique<'a>(
    kind: &'static str,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), SchemaError> {
    let mut seen = BTreeSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(SchemaError::Duplicate { kind, name: name.to_string() });
        }
    }
    Ok(())
}
