//! Player movement and melee.
//! This module exists to apply one player intent against the active level.
//! It does not own round bookkeeping or what mobs do afterwards.

use tracing::{debug, info};

use super::*;
use crate::combat::{self, StrikeOutcome};
use crate::content::keys;

impl Game {
    /// Steps the player one tile. Terrain blocking is ignored in debug mode; a tile holding a
    /// mob is never entered.
    pub(super) fn move_player(&mut self, direction: Direction) -> PlayerAction {
        let target = self.round.player.pos.step(direction);
        let Some(tile) = self.level.grid.tile_at(target) else {
            debug!(y = target.y, x = target.x, "move rejected: no tile");
            return PlayerAction::None;
        };
        if tile.has_mob() {
            debug!(y = target.y, x = target.x, "move rejected: occupied");
            return PlayerAction::None;
        }
        if !self.round.debug && self.level.grid.is_movement_blocked(target) {
            debug!(y = target.y, x = target.x, "move rejected: blocked");
            return PlayerAction::None;
        }

        self.round.player.pos = target;
        if let Some(tile) = self.level.grid.tile_at_mut(target) {
            tile.explored = true;
        }
        self.open_door_at(target);
        self.pick_up_items(target);

        if let Some(kind) = self.level.grid.kind_at(target)
            && keys::STAIRS_MARKERS.iter().any(|marker| kind.name.contains(marker))
        {
            let stairs = kind.name.clone();
            self.take_stairs(&stairs);
        }
        PlayerAction::Moved
    }

    fn open_door_at(&mut self, pos: Pos) {
        let is_closed_door =
            self.level.grid.kind_at(pos).is_some_and(|kind| kind.name == keys::CLOSED_DOOR);
        if is_closed_door {
            self.level.grid.set_kind(pos, keys::OPEN_DOOR);
            self.push_message("You open the door.");
        }
    }

    fn pick_up_items(&mut self, pos: Pos) {
        let items = self.level.registry.take_items(&mut self.level.grid, pos);
        for item in items {
            info!(item = %item.name, "item picked up");
            self.push_message(format!("You pick up the {}.", item.name));
            self.round.player.inventory.push(item.name);
        }
    }

    /// Strikes the first mob on the neighbouring tile. An empty tile is a no-op.
    pub(super) fn player_attack(&mut self, direction: Direction) -> PlayerAction {
        let target = self.round.player.pos.step(direction);
        let Some(&mob_id) = self.level.registry.occupants_at(&self.level.grid, target).mobs.first()
        else {
            debug!(y = target.y, x = target.x, "attack into empty tile");
            return PlayerAction::None;
        };

        let attacker = &self.round.player.stats;
        let strike = combat::resolve(&mut self.rng, attacker.hit_chance_pct, attacker.attack_max);
        let mob = self
            .level
            .registry
            .mob_mut(mob_id)
            .expect("mob listed on a tile should exist in the registry");
        let name = mob.stats.display_name.clone();
        match combat::apply(&mut mob.stats, strike) {
            StrikeOutcome::Missed => self.push_message(format!("You miss the {name}.")),
            StrikeOutcome::Wounded { damage } => {
                self.push_message(format!("You hit the {name} for {damage} damage."));
            }
            StrikeOutcome::Killed { .. } => {
                self.level.registry.despawn_mob(&mut self.level.grid, mob_id);
                info!(mob = %name, y = target.y, x = target.x, "mob killed");
                self.push_message(format!("You killed the {name}."));
            }
        }
        PlayerAction::Attacked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{quiet_config, room_game};

    fn game_at(rows: &[&str], start: Pos) -> Game {
        let mut game = room_game(rows, quiet_config(), 17);
        assert!(game.teleport_player(start));
        game
    }

    #[test]
    fn walls_and_missing_tiles_reject_moves() {
        let mut game = game_at(&["..."], Pos::new(1, 1));
        assert_eq!(game.move_player(Direction::Up), PlayerAction::None);
        assert_eq!(game.move_player(Direction::Left), PlayerAction::None);
        assert_eq!(game.player().pos, Pos::new(1, 1));
        assert_eq!(game.move_player(Direction::Right), PlayerAction::Moved);
        assert_eq!(game.player().pos, Pos::new(1, 2));
    }

    #[test]
    fn debug_mode_walks_through_walls_but_not_mobs() {
        let mut game = game_at(&["..."], Pos::new(1, 1));
        game.round.debug = true;
        assert_eq!(game.move_player(Direction::Up), PlayerAction::Moved);
        assert_eq!(game.player().pos, Pos::new(0, 1));
        assert_eq!(game.move_player(Direction::Up), PlayerAction::None);

        game.spawn_mob("bug", Pos::new(1, 2)).unwrap();
        assert_eq!(game.move_player(Direction::DownRight), PlayerAction::None);
    }

    #[test]
    fn closed_doors_open_when_entered() {
        let mut game = game_at(&[".+."], Pos::new(1, 1));
        assert_eq!(game.move_player(Direction::Right), PlayerAction::Moved);
        assert_eq!(game.level().grid.tile_at(Pos::new(1, 2)).unwrap().name, "open-door");
        assert!(game.messages.iter().any(|message| message == "You open the door."));
    }

    #[test]
    fn items_are_collected_and_cleared() {
        let mut game = game_at(&["..."], Pos::new(1, 1));
        let item = crate::registry::Item {
            name: "coffee".to_string(),
            display: crate::content::Display::default(),
        };
        game.level.registry.spawn_item(&mut game.level.grid, item, Pos::new(1, 2)).unwrap();
        game.move_player(Direction::Right);
        assert_eq!(game.player().inventory, ["coffee"]);
        assert_eq!(game.level().grid.tile_at(Pos::new(1, 2)).unwrap().occupant_items, None);
    }

    #[test]
    fn attacking_empty_tile_is_a_no_op() {
        let mut game = game_at(&["..."], Pos::new(1, 1));
        assert_eq!(game.player_attack(Direction::Right), PlayerAction::None);
        assert!(game.messages.is_empty());
    }

    #[test]
    fn certain_hits_eventually_kill_and_remove_the_mob() {
        let config = GameConfig { player_hit_chance: 100, ..quiet_config() };
        let mut game = room_game(&["..."], config, 5);
        game.teleport_player(Pos::new(1, 1));
        let id = game.spawn_mob("bug", Pos::new(1, 2)).unwrap();
        for _ in 0..4 {
            if game.level().registry.mob(id).is_none() {
                break;
            }
            assert_eq!(game.player_attack(Direction::Right), PlayerAction::Attacked);
        }
        assert!(game.level().registry.mob(id).is_none());
        assert!(!game.level().grid.tile_at(Pos::new(1, 2)).unwrap().has_mob());
        assert_eq!(game.messages.last().map(String::as_str), Some("You killed the bug."));
    }
}
