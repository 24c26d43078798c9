pub mod app_loop;
pub mod config_file;
pub mod seed;

use std::ops::Range;

use race_core::{GameState, GameStatus, PlayerId, PlayerRole};

pub const APP_NAME: &str = "Maze Race";

/// Format a seed as an exact decimal string with no prefix or suffix.
pub fn format_seed(seed: u64) -> String {
    seed.to_string()
}

/// Format a snapshot hash as `0x` followed by exactly 16 lowercase hex digits.
pub fn format_snapshot_hash(hash: u64) -> String {
    format!("0x{hash:016x}")
}

pub fn status_text(state: &GameState, local_player: &PlayerId) -> String {
    match (state.status(), state.winner()) {
        (GameStatus::Finished, Some(winner)) => format!("Player {winner} wins!"),
        (GameStatus::Finished, None) => "Race over".to_string(),
        (GameStatus::Waiting, _) => "Waiting for players...".to_string(),
        (GameStatus::Playing, _) => {
            format!("Race to the exit! Arrow keys move Player {local_player}")
        }
    }
}

/// One line per racer: id, role and current cell.
pub fn position_lines(state: &GameState) -> Vec<String> {
    state
        .players()
        .iter()
        .map(|player| {
            let role = match player.role {
                PlayerRole::Human => "human",
                PlayerRole::Autonomous => "agent",
            };
            format!("Player {} ({role}): {}", player.id, player.pos)
        })
        .collect()
}

/// Parses `#RRGGBB` into its channels.
pub fn parse_hex_color(raw: &str) -> Option<[u8; 3]> {
    let hex = raw.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}
