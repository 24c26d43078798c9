use anyhow::{Result, bail, ensure};
use clap::Parser;
use race_core::state::AGENT_PLAYER_ID;
use race_core::sync::MemoryChannel;
use race_core::{Direction, GameState, Session, SessionConfig};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use std::io;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short = 'n', long, default_value_t = 5000)]
    steps: u32,
    #[arg(long, default_value_t = 12)]
    width: usize,
    #[arg(long, default_value_t = 12)]
    height: usize,
}

fn choose<T: Copy>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p]
}

fn check_state(label: &str, state: &GameState) -> Result<()> {
    let maze = state.maze();
    for cell in maze.cells() {
        for direction in Direction::ALL {
            let neighbor = cell.pos.step(direction);
            if maze.in_bounds(neighbor) {
                ensure!(
                    maze.has_wall(cell.pos, direction)
                        == maze.has_wall(neighbor, direction.opposite()),
                    "{label}: wall between {} and {neighbor} is one-sided",
                    cell.pos
                );
            }
        }
    }
    for player in state.players() {
        ensure!(maze.in_bounds(player.pos), "{label}: player {} left the grid", player.id);
    }
    if let Some(winner) = state.winner() {
        let pos = state.player(winner).map(|player| player.pos);
        ensure!(state.is_finished(), "{label}: winner recorded while still playing");
        ensure!(
            pos.is_some_and(|pos| maze.is_exit(pos)),
            "{label}: winner {winner} is not on the exit"
        );
    }
    Ok(())
}

fn check_step(before: &GameState, host: &GameState, guest: &GameState) -> Result<()> {
    check_state("host", host)?;
    check_state("guest", guest)?;
    ensure!(host.maze() == before.maze(), "host maze changed mid-race");
    ensure!(host.revision() >= before.revision(), "host revision went backwards");
    if before.is_finished() {
        ensure!(host == before, "host state changed after the race finished");
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    println!("Starting Fuzz harness on seed {} for max {} steps...", args.seed, args.steps);
    let host_config = SessionConfig {
        width: args.width,
        height: args.height,
        agent_tick_ms: 50,
        ..SessionConfig::default()
    };
    let guest_config = SessionConfig {
        local_player: AGENT_PLAYER_ID.to_string(),
        agent_enabled: false,
        ..host_config.clone()
    };
    host_config.validate()?;

    let (host_end, guest_end) = MemoryChannel::pair();
    let mut host = Session::new(&host_config, args.seed, host_end)?;
    let mut guest = Session::new(&guest_config, args.seed, guest_end)?;
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let frame_times = [0, 10, 16, 33, 50, 120];

    let mut step = 0;
    while step < args.steps {
        let before = host.state().clone();

        host.press(choose(&mut rng, &Direction::ALL));
        guest.press(choose(&mut rng, &Direction::ALL));
        host.advance_time(Duration::from_millis(choose(&mut rng, &frame_times)));
        if rng.next_u64() % 50 == 0 {
            host.publish_snapshot();
        }
        host.pump();
        guest.pump();
        step += 1;

        // Assert invariants
        if let Err(err) = check_step(&before, host.state(), guest.state()) {
            error!(seed = args.seed, step, error = %err, "invariant violated");
            return Err(err);
        }
        if before.is_finished() && host.clock().is_running() {
            error!(seed = args.seed, step, "agent clock still running after finish");
            bail!("agent clock still running after finish");
        }

        if host.state().is_finished() && guest.state().is_finished() {
            break;
        }
    }

    match host.state().winner() {
        Some(winner) => println!("Player {winner} won after {step} steps"),
        None => println!("No winner after {step} steps"),
    }
    println!("Snapshot Hash: 0x{:016x}", host.state().snapshot_hash());
    info!(seed = args.seed, steps = step, revision = host.state().revision(), "fuzz run clean");
    println!("Fuzzing completed successfully.");
    Ok(())
}
