//! Level text parsing, data-directory loading, and the fixed level order.
//! Symbol resolution draws from the game RNG, so the RNG must be seeded before levels load.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::debug;

use crate::content::ContentPack;
use crate::dice::GameRng;
use crate::error::LoadError;
use crate::grid::{Tile, TileGrid};
use crate::types::Pos;

pub const DEFINITION_FILES: [&str; 3] = ["tiles.toml", "mobs.toml", "items.toml"];
pub const MAPS_DIR: &str = "maps";
pub const MAP_EXTENSION: &str = "map";

/// Raw level text keyed by level name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelSource {
    pub name: String,
    pub text: String,
}

impl LevelSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self { name: name.into(), text: text.into() }
    }
}

/// Definitions and level sources read from a data directory.
pub struct DataDir {
    pub content: ContentPack,
    pub levels: Vec<LevelSource>,
}

/// Parses one level. Each character maps through the symbol table; when a symbol has
/// several candidate kinds one is chosen uniformly at random.
pub fn load_level(
    name: &str,
    text: &str,
    content: &Rc<ContentPack>,
    rng: &mut GameRng,
) -> Result<TileGrid, LoadError> {
    let mut grid = TileGrid::new(Rc::clone(content));
    let mut y = 0;
    let mut x = -1;
    for character in text.chars() {
        match character {
            '\r' => continue,
            '\n' => {
                y += 1;
                x = -1;
                continue;
            }
            _ => x += 1,
        }
        let pos = Pos { y, x };
        let Some(candidates) = content.symbol_candidates(character) else {
            return Err(LoadError::UnknownSymbol {
                level: name.to_string(),
                symbol: character,
                pos,
            });
        };
        let kind = if candidates.len() == 1 {
            &candidates[0]
        } else {
            &candidates[rng.index(candidates.len())]
        };
        grid.insert(pos, Tile::named(kind.as_str()));
    }
    debug!(level = name, tiles = grid.len(), "level loaded");
    Ok(grid)
}

/// Reads `tiles.toml`, `mobs.toml`, `items.toml`, and every `maps/*.map` under `root`.
pub fn load_data_dir(root: &Path) -> Result<DataDir, LoadError> {
    if !root.is_dir() {
        return Err(LoadError::NotFound(root.to_path_buf()));
    }
    let mut definitions = Vec::new();
    for file in DEFINITION_FILES {
        let path = root.join(file);
        if path.exists() {
            definitions.push((file, read(&path)?));
        }
    }
    let content =
        ContentPack::parse(definitions.iter().map(|(file, text)| (*file, text.as_str())))?;

    let maps_dir = root.join(MAPS_DIR);
    let entries = fs::read_dir(&maps_dir)
        .map_err(|source| LoadError::Io { path: maps_dir.clone(), source })?;
    let mut map_paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| LoadError::Io { path: maps_dir.clone(), source })?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == MAP_EXTENSION) {
            map_paths.push(path);
        }
    }
    map_paths.sort();

    let mut levels = Vec::with_capacity(map_paths.len());
    for path in map_paths {
        let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        levels.push(LevelSource::new(name, read(&path)?));
    }
    Ok(DataDir { content, levels })
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io { path: path.to_path_buf(), source })
}

/// Pristine level grids plus the fixed transition order: the home level first, then the
/// remaining levels alphabetically.
pub struct World {
    templates: BTreeMap<String, TileGrid>,
    order: Vec<String>,
}

impl World {
    pub fn load(
        content: &Rc<ContentPack>,
        sources: &[LevelSource],
        home: &str,
        rng: &mut GameRng,
    ) -> Result<Self, LoadError> {
        let mut sorted: Vec<&LevelSource> = sources.iter().collect();
        sorted.sort_by(|left, right| left.name.cmp(&right.name));

        let mut templates = BTreeMap::new();
        for source in sorted {
            let grid = load_level(&source.name, &source.text, content, rng)?;
            templates.insert(source.name.clone(), grid);
        }
        if !templates.contains_key(home) {
            return Err(LoadError::MissingHomeLevel(home.to_string()));
        }

        let mut order = vec![home.to_string()];
        order.extend(templates.keys().filter(|name| name.as_str() != home).cloned());
        Ok(Self { templates, order })
    }

    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn home(&self) -> &str {
        &self.order[0]
    }

    /// Fresh copy of a level as it was loaded.
    pub fn instantiate(&self, name: &str) -> Option<TileGrid> {
        self.templates.get(name).cloned()
    }

    /// Name of the level `step` positions away from `current` in the order, falling back
    /// to the home level when the step leaves the order.
    pub fn neighbor_of(&self, current: &str, step: isize) -> &str {
        let index = self
            .order
            .iter()
            .position(|name| name == current)
            .and_then(|index| index.checked_add_signed(step))
            .filter(|index| *index < self.order.len())
            .unwrap_or(0);
        &self.order[index]
    }
}
