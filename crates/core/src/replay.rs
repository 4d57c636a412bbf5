use std::rc::Rc;

use tracing::debug;

use crate::config::GameConfig;
use crate::content::ContentPack;
use crate::error::{GameError, LoadError};
use crate::game::Game;
use crate::journal::{InputJournal, JOURNAL_FORMAT_VERSION};
use crate::level::LevelSource;

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("journal format {found} is not supported (expected {expected})")]
    UnsupportedFormat { found: u16, expected: u16 },
    #[error("failed to rebuild the run: {0}")]
    Load(#[from] LoadError),
    #[error("intent #{seq} was recorded after the run ended")]
    IntentAfterEnd {
        seq: u64,
        #[source]
        source: GameError,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplayResult {
    pub final_round: u64,
    pub final_snapshot_hash: u64,
    pub terminal: bool,
}

/// Rebuilds a run from its seed and feeds it every journaled intent in order.
pub fn replay_to_end(
    content: Rc<ContentPack>,
    sources: &[LevelSource],
    config: GameConfig,
    journal: &InputJournal,
) -> Result<ReplayResult, ReplayError> {
    if journal.format_version != JOURNAL_FORMAT_VERSION {
        return Err(ReplayError::UnsupportedFormat {
            found: journal.format_version,
            expected: JOURNAL_FORMAT_VERSION,
        });
    }
    let mut game = Game::new(content, sources, config, journal.seed)?;
    let mut terminal = false;
    for record in &journal.intents {
        let result = game
            .submit_intent(record.intent)
            .map_err(|source| ReplayError::IntentAfterEnd { seq: record.seq, source })?;
        terminal = result.terminal;
    }
    debug!(intents = journal.intents.len(), round = game.round_number(), "replay finished");
    Ok(ReplayResult {
        final_round: game.round_number(),
        final_snapshot_hash: game.snapshot_hash(),
        terminal,
    })
}
