//! The round controller: one intent in, one fully resolved round out.
//! Submodules split the round into player actions, level transitions, mob turns, and
//! population. All mutable run state lives on `Game` and changes only inside a round.

use std::rc::Rc;

use tracing::debug;

use crate::config::GameConfig;
use crate::content::ContentPack;
use crate::dice::GameRng;
use crate::field::DistanceField;
use crate::journal::InputJournal;
use crate::level::World;
use crate::state::{Level, MobView, Player, RoundSnapshot, RoundState};
use crate::types::*;

mod bootstrap;
mod hash;
mod mobs;
mod player;
mod populate;
mod round;
mod transition;

pub use round::{RoundResult, RoundSink};

/// What the player's intent amounted to once resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PlayerAction {
    None,
    Moved,
    Attacked,
    Rested,
}

impl PlayerAction {
    fn advances_round(self) -> bool {
        matches!(self, PlayerAction::Moved | PlayerAction::Attacked)
    }

    fn effects(self) -> IntentEffects {
        IntentEffects {
            moved: self == PlayerAction::Moved,
            acted: self != PlayerAction::None,
        }
    }
}

pub struct Game {
    seed: u64,
    config: GameConfig,
    content: Rc<ContentPack>,
    world: World,
    level: Level,
    round: RoundState,
    field: Option<DistanceField>,
    rng: GameRng,
    journal: InputJournal,
    messages: Vec<String>,
}

impl Game {
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn content(&self) -> &ContentPack {
        &self.content
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn round_state(&self) -> &RoundState {
        &self.round
    }

    pub fn round_number(&self) -> u64 {
        self.round.round_number
    }

    pub fn player(&self) -> &Player {
        &self.round.player
    }

    pub fn phase(&self) -> RoundPhase {
        self.round.phase
    }

    /// The cached field for the current player position, if one has been built.
    pub fn field(&self) -> Option<&DistanceField> {
        self.field.as_ref()
    }

    pub fn journal(&self) -> &InputJournal {
        &self.journal
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        let level = &self.level;
        let mobs = level
            .registry
            .placed_mobs(&level.grid)
            .map(|(pos, _, mob)| MobView {
                name: mob.stats.display_name.clone(),
                pos,
                health: mob.stats.health,
            })
            .collect();
        RoundSnapshot {
            round_number: self.round.round_number,
            level: level.name.clone(),
            player_position: self.round.player.pos,
            player_health: self.round.player.stats.health,
            player_max_health: self.round.player.max_health,
            phase: self.round.phase,
            debug: self.round.debug,
            inventory: self.round.player.inventory.clone(),
            mobs,
        }
    }

    /// Moves the player to `pos` without spending a round, dropping the cached field.
    /// Returns false when `pos` has no tile or holds a mob.
    pub fn teleport_player(&mut self, pos: Pos) -> bool {
        let Some(tile) = self.level.grid.tile_at(pos) else {
            return false;
        };
        if tile.has_mob() {
            return false;
        }
        debug!(y = pos.y, x = pos.x, "player teleported");
        self.round.player.pos = pos;
        self.field = None;
        true
    }

    fn push_message(&mut self, text: impl Into<String>) {
        self.messages.push(text.into());
    }

    fn rebuild_field(&mut self) {
        let source = self.round.player.pos;
        let metric = self.config.distance_metric;
        let field = DistanceField::with_metric(&self.level.grid, source, metric, true);
        debug!(y = source.y, x = source.x, settled = field.len(), "distance field rebuilt");
        self.field = Some(field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_moves_and_attacks_advance_the_round() {
        assert!(PlayerAction::Moved.advances_round());
        assert!(PlayerAction::Attacked.advances_round());
        assert!(!PlayerAction::Rested.advances_round());
        assert!(!PlayerAction::None.advances_round());
    }

    #[test]
    fn rest_acts_without_moving() {
        assert_eq!(PlayerAction::Rested.effects(), IntentEffects { moved: false, acted: true });
        assert_eq!(PlayerAction::None.effects(), IntentEffects::default());
        assert_eq!(PlayerAction::Moved.effects(), IntentEffects { moved: true, acted: true });
    }
}
