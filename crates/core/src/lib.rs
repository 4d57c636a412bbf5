pub mod combat;
pub mod config;
pub mod content;
pub mod dice;
pub mod error;
pub mod field;
pub mod game;
pub mod grid;
pub mod journal;
pub mod level;
pub mod registry;
pub mod replay;
pub mod state;
pub mod types;

#[cfg(test)]
mod test_support;

pub use config::GameConfig;
pub use content::ContentPack;
pub use dice::GameRng;
pub use error::{GameError, LoadError, SchemaError};
pub use field::{DistanceField, Metric};
pub use game::{Game, RoundResult, RoundSink};
pub use grid::{Tile, TileGrid};
pub use journal::{InputJournal, IntentRecord};
pub use level::{DataDir, LevelSource, World, load_data_dir, load_level};
pub use registry::{EntityRegistry, Occupants};
pub use replay::{ReplayError, ReplayResult, replay_to_end};
pub use state::{Level, RoundSnapshot, RoundState};
pub use types::*;
