//! The per-round pipeline: player action, bookkeeping, field refresh, mob turns.
//! This module exists to fix the order those steps run in.
//! It does not own the individual steps; sibling modules implement them.

use std::mem;

use tracing::{debug, info};

use super::*;
use crate::error::GameError;

/// Observer for round results, supplied by the presentation layer.
pub trait RoundSink {
    fn on_state_changed(&mut self, snapshot: &RoundSnapshot);
    fn append_message(&mut self, text: &str);
}

#[derive(Clone, Debug, PartialEq)]
pub struct RoundResult {
    pub snapshot: RoundSnapshot,
    pub messages: Vec<String>,
    pub terminal: bool,
}

impl Game {
    /// Resolves exactly one intent. Fails only when the run has already ended.
    pub fn submit_intent(&mut self, intent: Intent) -> Result<RoundResult, GameError> {
        if self.round.phase.is_terminal() {
            return Err(GameError::Terminated);
        }
        self.journal.append_intent(intent);
        self.messages.clear();
        self.round.phase = RoundPhase::Resolving;
        debug!(?intent, round = self.round.round_number, "resolving intent");

        let action = match intent {
            Intent::Quit => {
                info!(round = self.round.round_number, "run quit");
                self.round.phase = RoundPhase::Quit;
                return Ok(self.finish_round());
            }
            Intent::ToggleDebug => {
                self.round.debug = !self.round.debug;
                let state = if self.round.debug { "on" } else { "off" };
                self.push_message(format!("Debug mode {state}."));
                PlayerAction::None
            }
            Intent::Rest => PlayerAction::Rested,
            Intent::Move(direction) => self.move_player(direction),
            Intent::Attack(direction) => self.player_attack(direction),
        };
        self.round.effects = action.effects();

        if action.advances_round() {
            self.round.round_number += 1;
            self.regenerate();
        }

        if self.round.effects.moved || self.round.round_number == 0 || self.field.is_none() {
            self.rebuild_field();
        }

        if self.round.effects.acted {
            self.relocate_mobs();
            if self.mobs_attack() {
                self.round.phase = RoundPhase::PlayerDead;
                return Ok(self.finish_round());
            }
        }

        self.round.phase = RoundPhase::RoundComplete;
        let result = self.finish_round();
        self.round.phase = RoundPhase::AwaitingIntent;
        Ok(result)
    }

    /// Like [`Game::submit_intent`], also forwarding messages and the new state to `sink`.
    pub fn submit_intent_to(
        &mut self,
        intent: Intent,
        sink: &mut dyn RoundSink,
    ) -> Result<RoundResult, GameError> {
        let result = self.submit_intent(intent)?;
        for message in &result.messages {
            sink.append_message(message);
        }
        sink.on_state_changed(&result.snapshot);
        Ok(result)
    }

    fn regenerate(&mut self) {
        let interval = self.config.health_update;
        if interval == 0 || self.round.round_number % interval != 0 {
            return;
        }
        let player = &mut self.round.player;
        if player.stats.health < player.max_health {
            player.stats.health += 1;
            debug!(health = player.stats.health, "player regenerated");
        }
    }

    fn finish_round(&mut self) -> RoundResult {
        RoundResult {
            snapshot: self.snapshot(),
            messages: mem::take(&mut self.messages),
            terminal: self.round.phase.is_terminal(),
        }
    }
}
