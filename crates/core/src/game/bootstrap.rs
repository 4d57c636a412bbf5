//! Starting world construction for a new run.
//! This module exists to pin the initialization order: seed, levels, start tile, population.
//! It does not own round resolution once the run has started.

use tracing::info;

use super::*;
use crate::error::LoadError;
use crate::level::LevelSource;

impl Game {
    /// Seeds the RNG, loads every level (ambiguous symbols consume draws), picks a random
    /// start tile on the home level, and populates it.
    pub fn new(
        content: Rc<ContentPack>,
        sources: &[LevelSource],
        config: GameConfig,
        seed: u64,
    ) -> Result<Self, LoadError> {
        let mut rng = GameRng::seeded(seed);
        let world = World::load(&content, sources, &config.home_level, &mut rng)?;

        let mut inventory = Vec::with_capacity(config.starting_inventory.len());
        for name in &config.starting_inventory {
            inventory.push(content.item(name)?.name.clone());
        }

        let home = world.home().to_string();
        let grid = world.instantiate(&home).ok_or_else(|| LoadError::MissingHomeLevel(home.clone()))?;
        let starts = grid.positions_of_kind(&config.start_tile);
        let Some(start) = rng.choose(&starts).copied() else {
            return Err(LoadError::NoStartTile { level: home, tile: config.start_tile.clone() });
        };

        let player = Player {
            pos: start,
            stats: Combatant {
                health: config.player_health,
                attack_max: config.player_attack,
                hit_chance_pct: config.player_hit_chance,
                display_name: "you".to_string(),
            },
            max_health: config.player_max_health,
            inventory,
        };
        let round = RoundState {
            round_number: 0,
            player,
            effects: IntentEffects::default(),
            phase: RoundPhase::AwaitingIntent,
            debug: false,
        };

        let mut game = Self {
            seed,
            level: Level::new(home, grid),
            config,
            content,
            world,
            round,
            field: None,
            rng,
            journal: InputJournal::new(seed),
            messages: Vec::new(),
        };
        game.populate_level();
        info!(
            seed,
            level = %game.level.name,
            y = start.y,
            x = start.x,
            mobs = game.level.registry.mob_count(),
            items = game.level.registry.item_count(),
            "game initialized"
        );
        Ok(game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::keys;
    use crate::test_support::{quiet_config, standard_content, standard_levels};

    #[test]
    fn player_starts_on_a_floor_tile_of_the_home_level() {
        let game =
            Game::new(standard_content(), &standard_levels(), GameConfig::default(), 42).unwrap();
        assert_eq!(game.level().name, "town");
        let kind = game.level().grid.kind_at(game.player().pos).unwrap();
        assert_eq!(kind.name, keys::FLOOR);
        assert_eq!(game.round_number(), 0);
        assert_eq!(game.phase(), RoundPhase::AwaitingIntent);
        assert_eq!(game.player().inventory, ["punch-card", "default-pocket-protector"]);
    }

    #[test]
    fn same_seed_builds_the_same_start() {
        let first = Game::new(standard_content(), &standard_levels(), GameConfig::default(), 9)
            .unwrap();
        let second = Game::new(standard_content(), &standard_levels(), GameConfig::default(), 9)
            .unwrap();
        assert_eq!(first.snapshot(), second.snapshot());
    }

    #[test]
    fn starting_inventory_must_name_known_items() {
        let config = GameConfig {
            starting_inventory: vec!["punch-card".to_string(), "laptop".to_string()],
            ..quiet_config()
        };
        let err = Game::new(standard_content(), &standard_levels(), config, 1).err().unwrap();
        assert!(matches!(err, LoadError::Schema(_)), "{err}");

        let config = GameConfig {
            starting_inventory: vec!["punch-card".to_string()],
            ..quiet_config()
        };
        let game = Game::new(standard_content(), &standard_levels(), config, 1).unwrap();
        assert_eq!(game.player().inventory, ["punch-card"]);
    }

    #[test]
    fn missing_start_tile_is_a_load_error() {
        let config = GameConfig { start_tile: "lava".to_string(), ..quiet_config() };
        let err = Game::new(standard_content(), &standard_levels(), config, 1).err().unwrap();
        assert!(matches!(err, LoadError::NoStartTile { .. }));
    }
}
