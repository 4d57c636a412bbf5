//! Shared fixtures for the unit test suites.
//! This module exists to avoid repeating content and grid setup across modules.
//! It does not own production gameplay logic.

use std::rc::Rc;

use crate::config::GameConfig;
use crate::content::ContentPack;
use crate::game::Game;
use crate::grid::{Tile, TileGrid};
use crate::level::LevelSource;
use crate::types::Pos;

pub(crate) const TILES: &str = include_str!("../../../data/tiles.toml");
pub(crate) const MOBS: &str = include_str!("../../../data/mobs.toml");
pub(crate) const ITEMS: &str = include_str!("../../../data/items.toml");

pub(crate) fn standard_content() -> Rc<ContentPack> {
    let content =
        ContentPack::parse([("tiles.toml", TILES), ("mobs.toml", MOBS), ("items.toml", ITEMS)])
            .expect("bundled definitions should parse");
    Rc::new(content)
}

pub(crate) fn standard_levels() -> Vec<LevelSource> {
    vec![
        LevelSource::new("town", include_str!("../../../data/maps/town.map")),
        LevelSource::new("level1", include_str!("../../../data/maps/level1.map")),
        LevelSource::new("level2", include_str!("../../../data/maps/level2.map")),
    ]
}

/// Grid of `height` by `width` floor tiles with its corner at the origin.
pub(crate) fn open_grid(height: i32, width: i32) -> TileGrid {
    let mut grid = TileGrid::new(standard_content());
    for y in 0..height {
        for x in 0..width {
            grid.insert(Pos::new(y, x), Tile::named("floor"));
        }
    }
    grid
}

/// Level text for a walled room whose interior is `rows`.
pub(crate) fn walled_room(rows: &[&str]) -> String {
    let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0) + 2;
    let mut text = "#".repeat(width);
    text.push('\n');
    for row in rows {
        text.push('#');
        text.push_str(row);
        text.push('#');
        text.push('\n');
    }
    text.push_str(&"#".repeat(width));
    text.push('\n');
    text
}

/// Config that spawns nothing and starts empty-handed, for tests that place entities by hand.
pub(crate) fn quiet_config() -> GameConfig {
    GameConfig {
        max_mobs: 0,
        max_items: 0,
        starting_inventory: Vec::new(),
        ..GameConfig::default()
    }
}

/// Game whose only level is a walled room built from `rows`.
pub(crate) fn room_game(rows: &[&str], config: GameConfig, seed: u64) -> Game {
    let home = config.home_level.clone();
    let sources = vec![LevelSource::new(home, walled_room(rows))];
    Game::new(standard_content(), &sources, config, seed).expect("room should load")
}
