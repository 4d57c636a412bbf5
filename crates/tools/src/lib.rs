//! Shared plumbing for the command-line tools: logging setup, data loading, intent parsing.

use std::env;
use std::fs;
use std::io;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result, bail};
use tactics_core::{ContentPack, Direction, GameConfig, Intent, LevelSource, load_data_dir};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Installs a stderr subscriber. A non-empty `RUST_LOG` is used as is; otherwise `-v` selects
/// DEBUG and `-vv` TRACE over the INFO default.
pub fn init_tracing(verbosity: u8) {
    let rust_log = env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbosity, rust_log.as_deref()))
        .with_writer(io::stderr)
        .init();
}

fn log_filter(verbosity: u8, rust_log: Option<&str>) -> EnvFilter {
    if let Some(directives) = rust_log
        && !directives.trim().is_empty()
    {
        return EnvFilter::new(directives);
    }
    let default_level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    EnvFilter::default().add_directive(default_level.into())
}

pub struct RunData {
    pub content: Rc<ContentPack>,
    pub levels: Vec<LevelSource>,
    pub config: GameConfig,
}

pub fn load_run(data: &Path, config: Option<&Path>) -> Result<RunData> {
    let loaded = load_data_dir(data)
        .with_context(|| format!("failed to load game data from {}", data.display()))?;
    let config = match config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            GameConfig::from_toml(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => GameConfig::default(),
    };
    Ok(RunData { content: Rc::new(loaded.content), levels: loaded.levels, config })
}

/// Direction for a vi-style key (`hjklyubn`).
fn key_direction(key: char) -> Option<Direction> {
    Some(match key {
        'h' => Direction::Left,
        'j' => Direction::Down,
        'k' => Direction::Up,
        'l' => Direction::Right,
        'y' => Direction::UpLeft,
        'u' => Direction::UpRight,
        'b' => Direction::DownLeft,
        'n' => Direction::DownRight,
        _ => return None,
    })
}

fn named_direction(name: &str) -> Option<Direction> {
    Some(match name {
        "up" | "n" | "north" => Direction::Up,
        "down" | "s" | "south" => Direction::Down,
        "left" | "w" | "west" => Direction::Left,
        "right" | "e" | "east" => Direction::Right,
        "up-left" | "nw" => Direction::UpLeft,
        "up-right" | "ne" => Direction::UpRight,
        "down-left" | "sw" => Direction::DownLeft,
        "down-right" | "se" => Direction::DownRight,
        _ => return None,
    })
}

/// Parses one line of play input. Blank lines and `#` comments yield `None`.
///
/// Accepted forms: `move <dir>`, `attack <dir>`, `rest`, `debug`, `quit`, a single vi key
/// (lowercase moves, uppercase attacks), or `.` to rest.
pub fn parse_intent(line: &str) -> Result<Option<Intent>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let mut words = line.split_whitespace();
    let command = words.next().unwrap_or_default();
    let argument = words.next();

    let mut chars = command.chars();
    if let (Some(key), None, None) = (chars.next(), chars.next(), argument) {
        if key == '.' {
            return Ok(Some(Intent::Rest));
        }
        if let Some(direction) = key_direction(key.to_ascii_lowercase()) {
            let intent = if key.is_ascii_uppercase() {
                Intent::Attack(direction)
            } else {
                Intent::Move(direction)
            };
            return Ok(Some(intent));
        }
    }

    let intent = match (command, argument) {
        ("rest" | "wait", None) => Intent::Rest,
        ("debug", None) => Intent::ToggleDebug,
        ("quit" | "q", None) => Intent::Quit,
        ("move" | "attack", Some(name)) => {
            let Some(direction) = named_direction(name) else {
                bail!("unknown direction \"{name}\"");
            };
            if command == "move" { Intent::Move(direction) } else { Intent::Attack(direction) }
        }
        _ => bail!("unrecognised intent \"{line}\""),
    };
    Ok(Some(intent))
}
