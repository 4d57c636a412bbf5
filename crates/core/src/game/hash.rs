//! Stable snapshot hashing for deterministic verification.
//! This module exists to keep hashing concerns separate from round resolution.
//! It does not own replay execution or journal bookkeeping.

use std::hash::Hasher;

use xxhash_rust::xxh3::Xxh3;

use super::*;

impl Game {
    /// Hash of the round state, the active level's tiles, and every entity on it.
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.seed);
        hasher.write_u64(self.round.round_number);
        hasher.write_u8(match self.round.phase {
            RoundPhase::AwaitingIntent => 0,
            RoundPhase::Resolving => 1,
            RoundPhase::RoundComplete => 2,
            RoundPhase::PlayerDead => 3,
            RoundPhase::Quit => 4,
        });
        hasher.write_u8(u8::from(self.round.debug));

        let player = &self.round.player;
        hasher.write_i32(player.pos.y);
        hasher.write_i32(player.pos.x);
        hasher.write_i32(player.stats.health);
        hasher.write_i32(player.max_health);
        for item in &player.inventory {
            hasher.write(item.as_bytes());
            hasher.write_u8(0xff);
        }

        hasher.write(self.level.name.as_bytes());
        for (pos, tile) in self.level.grid.tiles() {
            hasher.write_i32(pos.y);
            hasher.write_i32(pos.x);
            hasher.write(tile.name.as_bytes());
            hasher.write_u8(u8::from(tile.explored));
            for mob_id in tile.mobs() {
                if let Some(mob) = self.level.registry.mob(*mob_id) {
                    hasher.write(mob.kind.as_bytes());
                    hasher.write_i32(mob.stats.health);
                }
            }
            for item_id in tile.items() {
                if let Some(item) = self.level.registry.item(*item_id) {
                    hasher.write(item.name.as_bytes());
                }
            }
        }
        hasher.finish()
    }
}
