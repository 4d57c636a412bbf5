use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Args, Parser, Subcommand};
use tactics_core::{DistanceField, Game, InputJournal, Intent, RoundSink, RoundSnapshot, replay_to_end};
use tactics_tools::{init_tracing, load_run, parse_intent};
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about = "Headless driver for the tactics simulation core", long_about = None)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct DataArgs {
    /// Directory holding tiles.toml, mobs.toml, items.toml and maps/
    #[arg(short, long, default_value = "data")]
    data: PathBuf,
    /// Optional TOML file overriding game settings
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Play a run from a script file or stdin, one intent per line
    Play {
        #[command(flatten)]
        data: DataArgs,
        #[arg(short, long, default_value_t = 10)]
        seed: u64,
        /// Start with debug mode on (terrain does not block movement)
        #[arg(long)]
        debug: bool,
        /// Read intents from this file instead of stdin
        #[arg(long)]
        script: Option<PathBuf>,
        /// Write the intent journal here when the run ends
        #[arg(long)]
        record: Option<PathBuf>,
    },
    /// Replay a recorded journal and print its final hash
    Replay {
        #[command(flatten)]
        data: DataArgs,
        #[arg(short, long)]
        journal: PathBuf,
    },
    /// Print the distance field around the start position
    Field {
        #[command(flatten)]
        data: DataArgs,
        #[arg(short, long, default_value_t = 10)]
        seed: u64,
    },
}

/// Prints round output as plain text.
struct ConsoleSink<W: Write> {
    out: W,
}

impl<W: Write> RoundSink for ConsoleSink<W> {
    fn on_state_changed(&mut self, snapshot: &RoundSnapshot) {
        let _ = writeln!(
            self.out,
            "[round {} | {} | ({}, {}) | hp {}/{} | {:?}]",
            snapshot.round_number,
            snapshot.level,
            snapshot.player_position.y,
            snapshot.player_position.x,
            snapshot.player_health,
            snapshot.player_max_health,
            snapshot.phase,
        );
    }

    fn append_message(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Play { data, seed, debug, script, record } => play(&data, seed, debug, script, record),
        Command::Replay { data, journal } => replay(&data, &journal),
        Command::Field { data, seed } => field(&data, seed),
    }
}

fn new_game(data: &DataArgs, seed: u64) -> Result<Game> {
    let run = load_run(&data.data, data.config.as_deref())?;
    Game::new(run.content, &run.levels, run.config, seed).context("failed to start the run")
}

fn play(
    data: &DataArgs,
    seed: u64,
    debug: bool,
    script: Option<PathBuf>,
    record: Option<PathBuf>,
) -> Result<()> {
    let mut game = new_game(data, seed)?;
    let mut sink = ConsoleSink { out: io::stdout().lock() };
    if debug {
        game.submit_intent_to(Intent::ToggleDebug, &mut sink)?;
    }

    let input: Box<dyn BufRead> = match &script {
        Some(path) => {
            let file = fs::File::open(path)
                .with_context(|| format!("failed to open script {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };

    for (number, line) in input.lines().enumerate() {
        let line = line.context("failed to read intent")?;
        let intent = match parse_intent(&line) {
            Ok(Some(intent)) => intent,
            Ok(None) => continue,
            Err(err) if script.is_some() => bail!("line {}: {err}", number + 1),
            Err(err) => {
                warn!("{err}");
                continue;
            }
        };
        let result = game.submit_intent_to(intent, &mut sink)?;
        if result.terminal {
            break;
        }
    }

    drop(sink);
    info!(round = game.round_number(), hash = game.snapshot_hash(), "run finished");
    if let Some(path) = record {
        let json = game.journal().to_json().context("failed to encode journal")?;
        fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
        println!("Journal written to {}", path.display());
    }
    Ok(())
}

fn replay(data: &DataArgs, journal_path: &Path) -> Result<()> {
    let text = fs::read_to_string(journal_path)
        .with_context(|| format!("failed to read journal file {}", journal_path.display()))?;
    let journal = InputJournal::from_json(&text).context("failed to deserialize journal JSON")?;
    let run = load_run(&data.data, data.config.as_deref())?;

    let result = replay_to_end(run.content, &run.levels, run.config, &journal)
        .context("replay failed")?;

    println!("Replay complete.");
    println!("Final round: {}", result.final_round);
    println!("Terminal: {}", result.terminal);
    println!("Snapshot hash: {}", result.final_snapshot_hash);
    Ok(())
}

/// One character per tile: `@` for the source, `#` for unreached, otherwise the cost
/// bucketed into `0-9` then `a-z`.
fn field(data: &DataArgs, seed: u64) -> Result<()> {
    let game = new_game(data, seed)?;
    let grid = &game.level().grid;
    let source = game.player().pos;
    let field = DistanceField::with_metric(grid, source, game.config().distance_metric, true);
    let symbols: Vec<char> = ('0'..='9').chain('a'..='z').collect();
    let max_cost = field.iter().map(|(_, cost)| cost).fold(0.0_f64, f64::max).max(1.0);

    let mut rows: Vec<String> = Vec::new();
    for (pos, _) in grid.tiles() {
        let row = usize::try_from(pos.y).unwrap_or_default();
        while rows.len() <= row {
            rows.push(String::new());
        }
        let symbol = match field.cost(pos) {
            _ if pos == source => '@',
            Some(cost) => {
                let bucket = (cost / max_cost * (symbols.len() - 1) as f64).round() as usize;
                symbols[bucket.min(symbols.len() - 1)]
            }
            None => '#',
        };
        rows[row].push(symbol);
    }

    println!("{} from ({}, {}), {} tiles settled", game.level().name, source.y, source.x, field.len());
    for row in rows {
        println!("{row}");
    }
    Ok(())
}
