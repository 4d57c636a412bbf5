//! Moving between levels by stairs or ladders.
//! This module exists to swap the active level and land the player on the matching marker.
//! It does not own the level order; `World` decides which level is adjacent.

use tracing::{info, warn};

use super::*;
use crate::content::keys;

/// Step through the level order and the marker kind to land on for a stairs tile kind.
fn stairs_route(kind: &str) -> Option<(isize, String)> {
    if kind.contains(keys::DOWN) {
        Some((1, kind.replace(keys::DOWN, keys::UP)))
    } else if kind.contains(keys::UP) {
        Some((-1, kind.replace(keys::UP, keys::DOWN)))
    } else {
        None
    }
}

impl Game {
    pub(super) fn take_stairs(&mut self, kind: &str) {
        let Some((step, landing_kind)) = stairs_route(kind) else {
            warn!(kind, "stairs tile without a direction");
            return;
        };
        let target = self.world.neighbor_of(&self.level.name, step).to_string();
        let Some(grid) = self.world.instantiate(&target) else {
            warn!(level = %target, "transition target was not loaded");
            return;
        };

        let mut landings = grid.positions_of_kind(&landing_kind);
        if landings.is_empty() {
            landings = grid.positions_of_kind(&self.config.start_tile);
        }
        let Some(landing) = self.rng.choose(&landings).copied() else {
            warn!(level = %target, "no landing tile on transition target");
            return;
        };

        info!(from = %self.level.name, to = %target, y = landing.y, x = landing.x, "level transition");
        let verb = if step > 0 { "descend" } else { "climb" };
        self.push_message(format!("You {verb} to {target}."));
        self.level = Level::new(target, grid);
        self.round.player.pos = landing;
        if let Some(tile) = self.level.grid.tile_at_mut(landing) {
            tile.explored = true;
        }
        self.field = None;
        self.populate_level();
    }
}
