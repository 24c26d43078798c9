use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use race_core::game::legal_directions;
use race_core::seed::{RandomSource, stream_rng};
use race_core::sync::OfflineChannel;
use race_core::{Direction, GameState, Pos, Session, SessionConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const HUMAN_WALK_STREAM: u64 = 3;

#[derive(Parser)]
#[command(author, version, about = "Run a headless maze race", long_about = None)]
struct Args {
    /// TOML session config; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long)]
    width: Option<usize>,
    #[arg(long)]
    height: Option<usize>,
    #[arg(short, long)]
    seed: Option<u64>,
    /// Agent ticks to simulate before giving up
    #[arg(short, long, default_value_t = 100_000)]
    ticks: u32,
    /// Print the carved maze before racing
    #[arg(short, long)]
    print: bool,
    /// Let the human racer random-walk alongside the agent
    #[arg(long)]
    human_walk: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => SessionConfig::default(),
    };
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    config.validate().context("Invalid session config")?;

    let seed = args.seed.or(config.seed).unwrap_or(42);
    let mut session = Session::new(&config, seed, OfflineChannel)
        .with_context(|| format!("Failed to start session for seed {seed}"))?;

    if args.print {
        println!("{}", render_ascii(session.state()));
    }

    let mut walker = stream_rng(seed, HUMAN_WALK_STREAM);
    let mut ticks = 0;
    while ticks < args.ticks && !session.state().is_finished() {
        if args.human_walk {
            let choices = legal_directions(session.state(), session.local_player());
            if !choices.is_empty() {
                session.press(choices[walker.pick(choices.len())]);
            }
        }
        session.advance_time(config.agent_tick());
        session.pump();
        ticks += 1;
    }

    let state = session.state();
    match state.winner() {
        Some(winner) => info!(seed, ticks, %winner, revision = state.revision(), "race finished"),
        None => warn!(seed, ticks, "tick limit reached without a winner"),
    }
    println!("Seed: {seed}");
    println!("Maze: {}x{}", state.maze().width(), state.maze().height());
    println!("Ticks: {ticks}");
    println!("Revision: {}", state.revision());
    match state.winner() {
        Some(winner) => println!("Winner: Player {winner}"),
        None => println!("Winner: none within {} ticks", args.ticks),
    }
    println!("Snapshot Hash: 0x{:016x}", state.snapshot_hash());

    Ok(())
}

/// Draws the maze with `+---+` walls, `E` on the exit and player ids on their cells.
fn render_ascii(state: &GameState) -> String {
    let maze = state.maze();
    let mut out = String::new();

    for (y, row) in maze.rows().enumerate() {
        for cell in row {
            out.push('+');
            out.push_str(if cell.walls.top { "---" } else { "   " });
        }
        out.push_str("+\n");

        for cell in row {
            out.push(if cell.walls.left { '|' } else { ' ' });
            out.push(' ');
            out.push(cell_glyph(state, cell.pos));
            out.push(' ');
        }
        let right_edge = row.last().is_some_and(|cell| cell.walls.has(Direction::Right));
        out.push(if right_edge { '|' } else { ' ' });
        out.push('\n');

        if y + 1 == maze.height() {
            for cell in row {
                out.push('+');
                out.push_str(if cell.walls.bottom { "---" } else { "   " });
            }
            out.push('+');
        }
    }
    out
}

fn cell_glyph(state: &GameState, pos: Pos) -> char {
    if let Some(player) = state.players().iter().find(|player| player.pos == pos) {
        return player.id.as_str().chars().next().unwrap_or('?');
    }
    if state.maze().is_exit(pos) { 'E' } else { ' ' }
}
