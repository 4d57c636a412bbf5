//! Mob turns: greedy descent on the distance field, then melee against the player.
//! This module exists to keep mob behaviour in one place, run only after a player action.
//! It does not own field construction; the round controller refreshes the field first.

use std::collections::BTreeSet;

use tracing::{debug, info};

use super::*;
use crate::combat::{self, StrikeOutcome};
use crate::registry::Entity;

impl Game {
    /// Walks field positions in ascending cost up to the wake threshold and steps each mob
    /// found there to its cheapest free neighbour. Mobs next to the player hold their ground.
    pub(super) fn relocate_mobs(&mut self) {
        let Some(field) = self.field.take() else {
            return;
        };
        let player_pos = self.round.player.pos;
        let mut moved: BTreeSet<MobId> = BTreeSet::new();

        for (pos, cost) in field.within(self.config.mob_wake_cost) {
            let residents = self.level.registry.occupants_at(&self.level.grid, pos).mobs.to_vec();
            for mob_id in residents {
                if !moved.insert(mob_id) || pos.is_adjacent(player_pos) {
                    continue;
                }
                let Some(next) = self.descent_step(&field, pos, player_pos) else {
                    continue;
                };
                self.level.registry.move_entity(&mut self.level.grid, Entity::Mob(mob_id), pos, next);
                debug!(
                    cost,
                    from_y = pos.y,
                    from_x = pos.x,
                    to_y = next.y,
                    to_x = next.x,
                    "mob moved"
                );
            }
        }

        self.field = Some(field);
    }

    /// Lowest-cost eligible neighbour of `pos`, ties broken at random. A neighbour is eligible
    /// when the field reached it, terrain lets a mob stand there, and neither the player nor
    /// another mob holds it. The step may climb when nothing cheaper is free.
    fn descent_step(&mut self, field: &DistanceField, pos: Pos, player_pos: Pos) -> Option<Pos> {
        let grid = &self.level.grid;
        let mut best_cost = f64::INFINITY;
        let mut best: Vec<Pos> = Vec::new();
        for neighbor in grid.neighbors(pos, true) {
            let Some(cost) = field.cost(neighbor) else { continue };
            if neighbor == player_pos
                || grid.is_movement_blocked(neighbor)
                || grid.tile_at(neighbor).is_some_and(|tile| tile.has_mob())
            {
                continue;
            }
            if cost < best_cost {
                best_cost = cost;
                best.clear();
                best.push(neighbor);
            } else if cost == best_cost {
                best.push(neighbor);
            }
        }
        self.rng.choose(&best).copied()
    }

    /// Every mob around the player swings once, cardinals first. Returns true if the player died.
    pub(super) fn mobs_attack(&mut self) -> bool {
        let player_pos = self.round.player.pos;
        let attackers: Vec<MobId> = self
            .level
            .grid
            .neighbors(player_pos, true)
            .flat_map(|pos| self.level.registry.occupants_at(&self.level.grid, pos).mobs.to_vec())
            .collect();

        for mob_id in attackers {
            let Some(mob) = self.level.registry.mob(mob_id) else { continue };
            let name = mob.stats.display_name.clone();
            let strike = combat::resolve(&mut self.rng, mob.stats.hit_chance_pct, mob.stats.attack_max);
            match combat::apply(&mut self.round.player.stats, strike) {
                StrikeOutcome::Missed => self.push_message(format!("The {name} misses you.")),
                StrikeOutcome::Wounded { damage } => {
                    self.push_message(format!("The {name} hits you for {damage} damage."));
                }
                StrikeOutcome::Killed { damage } => {
                    self.push_message(format!("The {name} hits you for {damage} damage."));
                    self.push_message("You died.");
                    info!(killer = %name, round = self.round.round_number, "player died");
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Metric;
    use crate::test_support::{quiet_config, room_game};

    fn prepared(rows: &[&str], start: Pos, config: GameConfig) -> Game {
        seeded(rows, start, config, 21)
    }

    fn seeded(rows: &[&str], start: Pos, config: GameConfig, seed: u64) -> Game {
        let mut game = room_game(rows, config, seed);
        assert!(game.teleport_player(start));
        game.rebuild_field();
        game
    }

    #[test]
    fn distant_mob_steps_toward_the_player() {
        let mut game = prepared(&["......."], Pos::new(1, 1), quiet_config());
        let id = game.spawn_mob("bug", Pos::new(1, 6)).unwrap();
        game.relocate_mobs();
        assert_eq!(game.level().registry.mob_position(id), Some(Pos::new(1, 5)));
    }

    #[test]
    fn adjacent_mob_stays_put() {
        let mut game = prepared(&["...", "..."], Pos::new(1, 1), quiet_config());
        let id = game.spawn_mob("bug", Pos::new(2, 2)).unwrap();
        game.relocate_mobs();
        assert_eq!(game.level().registry.mob_position(id), Some(Pos::new(2, 2)));
    }

    #[test]
    fn mobs_beyond_wake_cost_sleep() {
        let config = GameConfig { mob_wake_cost: 0.5, ..quiet_config() };
        let mut game = prepared(&["......."], Pos::new(1, 1), config);
        let id = game.spawn_mob("bug", Pos::new(1, 6)).unwrap();
        game.relocate_mobs();
        assert_eq!(game.level().registry.mob_position(id), Some(Pos::new(1, 6)));
    }

    #[test]
    fn mobs_never_share_a_tile_or_move_twice() {
        let mut game = prepared(&["........", "........"], Pos::new(1, 1), quiet_config());
        let first = game.spawn_mob("bug", Pos::new(1, 8)).unwrap();
        let second = game.spawn_mob("intern", Pos::new(2, 8)).unwrap();
        game.relocate_mobs();
        let a = game.level().registry.mob_position(first).unwrap();
        let b = game.level().registry.mob_position(second).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.x, 7);
        assert_eq!(b.x, 7);
    }

    fn manhattan() -> GameConfig {
        GameConfig { distance_metric: Metric::Manhattan, ..quiet_config() }
    }

    #[test]
    fn blocked_mob_climbs_to_its_only_free_neighbour() {
        let mut game = prepared(&["....."], Pos::new(1, 1), manhattan());
        let front = game.spawn_mob("bug", Pos::new(1, 2)).unwrap();
        let back = game.spawn_mob("bug", Pos::new(1, 3)).unwrap();
        let field = game.field().unwrap();
        assert_eq!(field.cost(Pos::new(1, 3)), Some(3.0));
        assert_eq!(field.cost(Pos::new(1, 4)), Some(6.0));

        game.relocate_mobs();
        assert_eq!(game.level().registry.mob_position(front), Some(Pos::new(1, 2)));
        assert_eq!(game.level().registry.mob_position(back), Some(Pos::new(1, 4)));
    }

    #[test]
    fn descent_takes_a_cheapest_free_neighbour() {
        let rows = ["......", ".##...", "...#..", "......"];
        let player = Pos::new(1, 1);
        let mut game = prepared(&rows, player, manhattan());
        game.spawn_mob("bug", Pos::new(3, 4)).unwrap();
        game.spawn_mob("intern", Pos::new(4, 2)).unwrap();
        let field = game.field().unwrap().clone();

        for (pos, cost) in field.ascending() {
            if pos == player {
                continue;
            }
            let grid = &game.level().grid;
            let free: Vec<f64> = grid
                .neighbors(pos, true)
                .filter(|next| {
                    *next != player
                        && !grid.is_movement_blocked(*next)
                        && !grid.tile_at(*next).is_some_and(|tile| tile.has_mob())
                })
                .filter_map(|next| field.cost(next))
                .collect();
            let cheapest = free.iter().copied().fold(f64::INFINITY, f64::min);

            let step = game.descent_step(&field, pos, player);
            if free.is_empty() {
                assert_eq!(step, None, "{pos:?}");
                continue;
            }
            let step_cost = step.and_then(|next| field.cost(next)).expect("step inside field");
            assert_eq!(step_cost, cheapest, "{pos:?}");
            if cheapest <= cost {
                assert!(step_cost <= cost, "{pos:?} climbed from {cost} to {step_cost}");
            }
        }
    }

    #[test]
    fn equal_cost_ties_are_seeded() {
        let rows = ["...", ".#.", "..."];
        let landing = |seed| {
            let mut game = seeded(&rows, Pos::new(1, 1), manhattan(), seed);
            let id = game.spawn_mob("bug", Pos::new(3, 3)).unwrap();
            game.relocate_mobs();
            game.level().registry.mob_position(id).unwrap()
        };

        let mut seen = BTreeSet::new();
        for seed in 0..32 {
            let pos = landing(seed);
            assert!(pos == Pos::new(2, 3) || pos == Pos::new(3, 2), "seed {seed}: {pos:?}");
            assert_eq!(landing(seed), pos, "seed {seed} is not repeatable");
            seen.insert(pos);
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn certain_hits_kill_a_fragile_player() {
        let config = GameConfig { player_health: 3, ..quiet_config() };
        let mut game = prepared(&["..."], Pos::new(1, 1), config);
        let id = game.spawn_mob("legacy-code", Pos::new(1, 2)).unwrap();
        let mob = game.level.registry.mob_mut(id).unwrap();
        mob.stats.hit_chance_pct = 100;
        mob.stats.attack_max = 5;

        let mut died = false;
        for _ in 0..3 {
            let before = game.player().stats.health;
            died = game.mobs_attack();
            let dealt = before - game.player().stats.health;
            assert!((1..=5).contains(&dealt));
            if died {
                break;
            }
        }
        assert!(died);
        assert!(game.player().stats.health <= 0);
        assert_eq!(game.messages.last().map(String::as_str), Some("You died."));
    }
}
