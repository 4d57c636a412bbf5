use serde::{Deserialize, Serialize};

use crate::grid::TileGrid;
use crate::registry::EntityRegistry;
use crate::types::{Combatant, IntentEffects, Pos, RoundPhase};

#[derive(Clone, Debug)]
pub struct Player {
    pub pos: Pos,
    pub stats: Combatant,
    pub max_health: i32,
    pub inventory: Vec<String>,
}

/// Round bookkeeping owned by the round controller.
#[derive(Clone, Debug)]
pub struct RoundState {
    pub round_number: u64,
    pub player: Player,
    pub effects: IntentEffects,
    pub phase: RoundPhase,
    pub debug: bool,
}

/// The active level: its grid and the entities living on it.
#[derive(Clone)]
pub struct Level {
    pub name: String,
    pub grid: TileGrid,
    pub registry: EntityRegistry,
}

impl Level {
    pub fn new(name: impl Into<String>, grid: TileGrid) -> Self {
        Self { name: name.into(), grid, registry: EntityRegistry::new() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MobView {
    pub name: String,
    pub pos: Pos,
    pub health: i32,
}

/// Serializable picture of the run handed to observers after every round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub round_number: u64,
    pub level: String,
    pub player_position: Pos,
    pub player_health: i32,
    pub player_max_health: i32,
    pub phase: RoundPhase,
    pub debug: bool,
    pub inventory: Vec<String>,
    pub mobs: Vec<MobView>,
}
