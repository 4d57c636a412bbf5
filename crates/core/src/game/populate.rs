//! Item and mob spawning for a freshly entered level.
//! This module exists so every level entry scatters entities the same way.
//! It does not own where the player lands; callers place the player first.

use tracing::debug;

use super::*;
use crate::registry::{Item, Mob};

impl Game {
    /// Spawns items, then mobs, each on a distinct open tile away from the player.
    pub(super) fn populate_level(&mut self) {
        let mut open = self.open_spawn_tiles();

        let item_count = self.spawn_count(self.config.max_items);
        for _ in 0..item_count {
            let Some(pos) = self.take_random(&mut open) else { break };
            let Some(def) = self.rng.choose(self.content.items()).cloned() else { break };
            let item = Item { name: def.name, display: def.display };
            let placed = self.level.registry.spawn_item(&mut self.level.grid, item, pos);
            debug_assert!(placed.is_some(), "open spawn tile should accept an item");
        }

        let mob_count = self.spawn_count(self.config.max_mobs);
        for _ in 0..mob_count {
            let Some(pos) = self.take_random(&mut open) else { break };
            let Some(def) = self.rng.choose(self.content.mobs()).cloned() else { break };
            let mob = Mob { kind: def.name.clone(), stats: def.spawn_stats(), display: def.display };
            let placed = self.level.registry.spawn_mob(&mut self.level.grid, mob, pos);
            debug_assert!(placed.is_some(), "open spawn tile should accept a mob");
        }

        debug!(
            level = %self.level.name,
            mobs = self.level.registry.mob_count(),
            items = self.level.registry.item_count(),
            "level populated"
        );
    }

    /// Places a mob of definition `name` at `pos`. Returns `None` for an unknown name or a
    /// position without a tile.
    pub fn spawn_mob(&mut self, name: &str, pos: Pos) -> Option<MobId> {
        let def = self.content.mobs().iter().find(|def| def.name == name)?.clone();
        let mob = Mob { kind: def.name.clone(), stats: def.spawn_stats(), display: def.display };
        self.level.registry.spawn_mob(&mut self.level.grid, mob, pos)
    }

    fn spawn_count(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        let max = i32::try_from(max).unwrap_or(i32::MAX);
        self.rng.roll_inclusive(1, max) as u32
    }

    fn open_spawn_tiles(&self) -> Vec<Pos> {
        let grid = &self.level.grid;
        grid.tiles()
            .filter(|(pos, tile)| {
                *pos != self.round.player.pos
                    && tile.occupant_mobs.is_none()
                    && tile.occupant_items.is_none()
                    && grid
                        .kind_at(*pos)
                        .is_some_and(|kind| self.config.spawn_tiles.contains(&kind.name))
            })
            .map(|(pos, _)| pos)
            .collect()
    }

    fn take_random(&mut self, open: &mut Vec<Pos>) -> Option<Pos> {
        if open.is_empty() {
            return None;
        }
        let index = self.rng.index(open.len());
        Some(open.swap_remove(index))
    }
}
