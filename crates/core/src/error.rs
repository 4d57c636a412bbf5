//! Error types for content loading and the round API.
//! Load-time errors are fatal to startup; round errors report API misuse only.

use std::io;
use std::path::PathBuf;

use crate::types::Pos;

/// Problems in tile, mob, or item definitions.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("failed to parse {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("duplicate {kind} definition \"{name}\"")]
    Duplicate { kind: &'static str, name: String },
    #[error("tile kind \"{name}\" references unknown kind \"{reference}\"")]
    MissingReference { name: String, reference: String },
    #[error("tile kind reference chain starting at \"{name}\" is cyclic")]
    CyclicReference { name: String },
    #[error("unknown tile kind \"{0}\"")]
    UnknownKind(String),
    #[error("unknown item \"{0}\"")]
    UnknownItem(String),
}

/// Problems while turning level text into grids.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("no tile found for symbol {symbol:?} at ({}, {}) in level \"{level}\"", .pos.y, .pos.x)]
    UnknownSymbol { level: String, symbol: char, pos: Pos },
    #[error("could not find {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("home level \"{0}\" was not loaded")]
    MissingHomeLevel(String),
    #[error("level \"{level}\" has no \"{tile}\" tile to start on")]
    NoStartTile { level: String, tile: String },
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("the run has ended; no further intents are accepted")]
    Terminated,
}
