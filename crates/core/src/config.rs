//! Tunables for a run. Every field has a default so a partial TOML file is enough.

use serde::{Deserialize, Serialize};

use crate::content::keys;
use crate::field::Metric;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GameConfig {
    /// Rounds between one-point health regenerations.
    pub health_update: u64,
    pub player_health: i32,
    pub player_max_health: i32,
    pub player_hit_chance: u8,
    pub player_attack: i32,
    /// Mobs farther than this field cost from the player stay asleep.
    pub mob_wake_cost: f64,
    pub distance_metric: Metric,
    pub home_level: String,
    pub start_tile: String,
    pub max_mobs: u32,
    pub max_items: u32,
    pub spawn_tiles: Vec<String>,
    pub starting_inventory: Vec<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            health_update: 32,
            player_health: 10,
            player_max_health: 10,
            player_hit_chance: 60,
            player_attack: 4,
            mob_wake_cost: 64.0,
            distance_metric: Metric::LogOctagonal,
            home_level: "town".to_string(),
            start_tile: keys::FLOOR.to_string(),
            max_mobs: 6,
            max_items: 6,
            spawn_tiles: vec![
                keys::FLOOR.to_string(),
                "water".to_string(),
                keys::OPEN_DOOR.to_string(),
            ],
            starting_inventory: vec![
                "punch-card".to_string(),
                "default-pocket-protector".to_string(),
            ],
        }
    }
}

impl GameConfig {
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
