use std::path::PathBuf;

use anyhow::{Result, ensure};
use clap::{ArgAction, Parser};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use tactics_core::{Direction, Game, Intent};
use tactics_tools::{init_tracing, load_run};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "data")]
    data: PathBuf,
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1000)]
    rounds: u32,
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn check_invariants(game: &Game) -> Result<()> {
    let player = game.player();
    ensure!(player.stats.health <= player.max_health, "Invariant failed: health above maximum");
    let grid = &game.level().grid;
    for (pos, tile) in grid.tiles() {
        if !tile.has_mob() {
            continue;
        }
        ensure!(pos != player.pos, "Invariant failed: mob on the player tile at {pos:?}");
        ensure!(!grid.is_movement_blocked(pos), "Invariant failed: mob inside terrain at {pos:?}");
        ensure!(tile.mobs().len() == 1, "Invariant failed: mobs share {pos:?}");
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    println!("Starting fuzz harness on seed {} for at most {} rounds...", args.seed, args.rounds);
    let run = load_run(&args.data, None)?;
    let mut game = Game::new(run.content, &run.levels, run.config, args.seed)?;
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    let mut submitted = 0;
    while submitted < args.rounds {
        let direction = choose(&mut rng, &Direction::ALL);
        // Bias towards movement so runs actually explore
        let intent = choose(
            &mut rng,
            &[
                Intent::Move(direction),
                Intent::Move(direction),
                Intent::Move(direction),
                Intent::Attack(direction),
                Intent::Rest,
            ],
        );
        let result = game.submit_intent(intent)?;
        submitted += 1;
        check_invariants(&game)?;
        if result.terminal {
            println!("Run ended in {:?} after {} intents", result.snapshot.phase, submitted);
            break;
        }
    }

    info!(round = game.round_number(), level = %game.level().name, "fuzz finished");
    println!("Fuzzing completed successfully. Snapshot hash: {}", game.snapshot_hash());
    Ok(())
}
