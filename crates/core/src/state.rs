//! The authoritative race model: maze, roster, status and winner.

use std::hash::Hasher;

use serde::{Deserialize, Serialize};
use tracing::info;
use xxhash_rust::xxh3::Xxh3;

use crate::error::StateError;
use crate::mapgen::Maze;
use crate::types::*;

pub const HUMAN_PLAYER_ID: &str = "1";
pub const AGENT_PLAYER_ID: &str = "2";
pub const HUMAN_COLOR: &str = "#FF6B6B";
pub const AGENT_COLOR: &str = "#4ECDC4";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    #[serde(flatten)]
    pub pos: Pos,
    pub color: String,
    pub role: PlayerRole,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawGameState")]
pub struct GameState {
    maze: Maze,
    players: Vec<Player>,
    game_status: GameStatus,
    winner: Option<PlayerId>,
    revision: u64,
}

/// Wire shape of a snapshot before roster validation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGameState {
    maze: Maze,
    players: Vec<Player>,
    game_status: GameStatus,
    winner: Option<PlayerId>,
    #[serde(default)]
    revision: u64,
}

impl TryFrom<RawGameState> for GameState {
    type Error = StateError;

    fn try_from(raw: RawGameState) -> Result<Self, Self::Error> {
        for (index, player) in raw.players.iter().enumerate() {
            if !raw.maze.in_bounds(player.pos) {
                return Err(StateError::PlayerOutOfBounds {
                    id: player.id.clone(),
                    pos: player.pos,
                });
            }
            if raw.players[..index].iter().any(|other| other.id == player.id) {
                return Err(StateError::DuplicatePlayer(player.id.clone()));
            }
        }
        Ok(Self {
            maze: raw.maze,
            players: raw.players,
            game_status: raw.game_status,
            winner: raw.winner,
            revision: raw.revision,
        })
    }
}

impl GameState {
    /// Seeds the human at the top-left corner and the agent at the bottom-left corner.
    pub fn new(maze: Maze) -> Self {
        let agent_start = Pos::new(0, maze.height() as i32 - 1);
        let players = vec![
            Player {
                id: PlayerId::from(HUMAN_PLAYER_ID),
                pos: Pos::new(0, 0),
                color: HUMAN_COLOR.to_string(),
                role: PlayerRole::Human,
            },
            Player {
                id: PlayerId::from(AGENT_PLAYER_ID),
                pos: agent_start,
                color: AGENT_COLOR.to_string(),
                role: PlayerRole::Autonomous,
            },
        ];
        Self { maze, players, game_status: GameStatus::Playing, winner: None, revision: 0 }
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|player| &player.id == id)
    }

    pub fn autonomous_player(&self) -> Option<&Player> {
        self.players.iter().find(|player| player.role == PlayerRole::Autonomous)
    }

    pub fn status(&self) -> GameStatus {
        self.game_status
    }

    pub fn is_finished(&self) -> bool {
        self.game_status == GameStatus::Finished
    }

    pub fn winner(&self) -> Option<&PlayerId> {
        self.winner.as_ref()
    }

    /// Logical clock of this peer's view. It never decreases, even across snapshots.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn raise_revision(&mut self, floor: u64) {
        self.revision = self.revision.max(floor);
    }

    /// Moves `player_id` to `to` and settles the win condition in the same step.
    ///
    /// Callers gate every request through the movement policy first; no legality
    /// check happens here. Once finished, every call is ignored.
    pub fn apply_move(&mut self, player_id: &PlayerId, to: Pos) -> MoveOutcome {
        if self.is_finished() {
            return MoveOutcome::Ignored;
        }
        debug_assert!(self.maze.in_bounds(to), "unvalidated move to {to}");

        let Some(player) = self.players.iter_mut().find(|player| &player.id == player_id) else {
            return MoveOutcome::Ignored;
        };
        player.pos = to;
        self.revision += 1;

        if self.maze.is_exit(to) {
            self.game_status = GameStatus::Finished;
            self.winner = Some(player_id.clone());
            info!(winner = %player_id, revision = self.revision, "race finished");
            return MoveOutcome::Won;
        }
        MoveOutcome::Moved
    }

    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.maze.width() as u64);
        hasher.write_u64(self.maze.height() as u64);
        for cell in self.maze.cells() {
            let walls = cell.walls;
            let bits = u8::from(walls.top)
                | (u8::from(walls.right) << 1)
                | (u8::from(walls.bottom) << 2)
                | (u8::from(walls.left) << 3)
                | (u8::from(cell.is_exit) << 4);
            hasher.write_u8(bits);
        }
        for player in &self.players {
            hasher.write(player.id.as_str().as_bytes());
            hasher.write_i32(player.pos.x);
            hasher.write_i32(player.pos.y);
        }
        hasher.write_u8(self.game_status as u8);
        if let Some(winner) = &self.winner {
            hasher.write(winner.as_str().as_bytes());
        }
        hasher.write_u64(self.revision);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::generate_seeded;

    fn fresh(width: usize, height: usize) -> GameState {
        GameState::new(generate_seeded(width, height, 9).expect("maze"))
    }

    #[test]
    fn players_start_in_the_left_corners() {
        let state = fresh(6, 4);
        let human = state.player(&PlayerId::from(HUMAN_PLAYER_ID)).expect("human");
        let agent = state.autonomous_player().expect("agent");
        assert_eq!(human.pos, Pos::new(0, 0));
        assert_eq!(human.role, PlayerRole::Human);
        assert_eq!(agent.pos, Pos::new(0, 3));
        assert_eq!(agent.id, PlayerId::from(AGENT_PLAYER_ID));
        assert_eq!(state.status(), GameStatus::Playing);
        assert_eq!(state.winner(), None);
    }

    #[test]
    fn reaching_the_exit_finishes_in_the_same_step() {
        let mut state = fresh(3, 3);
        let human = PlayerId::from(HUMAN_PLAYER_ID);

        assert_eq!(state.apply_move(&human, Pos::new(1, 0)), MoveOutcome::Moved);
        assert_eq!(state.status(), GameStatus::Playing);

        assert_eq!(state.apply_move(&human, Pos::new(2, 2)), MoveOutcome::Won);
        assert_eq!(state.status(), GameStatus::Finished);
        assert_eq!(state.winner(), Some(&human));
        assert_eq!(state.player(&human).map(|p| p.pos), Some(Pos::new(2, 2)));
    }

    #[test]
    fn finished_state_ignores_every_later_move() {
        let mut state = fresh(3, 3);
        let agent = PlayerId::from(AGENT_PLAYER_ID);
        state.apply_move(&agent, Pos::new(2, 2));
        let frozen = state.clone();

        for id in [HUMAN_PLAYER_ID, AGENT_PLAYER_ID, "ghost"] {
            for x in 0..3 {
                let outcome = state.apply_move(&PlayerId::from(id), Pos::new(x, 1));
                assert_eq!(outcome, MoveOutcome::Ignored);
            }
        }
        assert_eq!(state, frozen);
    }

    #[test]
    fn single_cell_race_finishes_on_first_application() {
        let mut state = fresh(1, 1);
        let human = PlayerId::from(HUMAN_PLAYER_ID);
        assert_eq!(state.apply_move(&human, Pos::new(0, 0)), MoveOutcome::Won);
        assert_eq!(state.winner(), Some(&human));
    }

    #[test]
    fn unknown_player_leaves_state_untouched() {
        let mut state = fresh(3, 3);
        let before = state.clone();
        assert_eq!(state.apply_move(&PlayerId::from("9"), Pos::new(1, 1)), MoveOutcome::Ignored);
        assert_eq!(state, before);
    }

    #[test]
    fn snapshot_json_uses_wire_field_names() {
        let state = fresh(2, 2);
        let value = serde_json::to_value(&state).expect("serialize");
        assert_eq!(value["gameStatus"], "playing");
        assert!(value["winner"].is_null());
        assert_eq!(value["players"][0]["id"], "1");
        assert_eq!(value["players"][0]["color"], HUMAN_COLOR);
        assert_eq!(value["players"][1]["y"], 1);
        assert_eq!(value["players"][1]["role"], "autonomous");
        assert_eq!(value["revision"], 0);
    }

    #[test]
    fn snapshot_with_player_off_the_grid_is_rejected() {
        let state = fresh(2, 2);
        let mut value = serde_json::to_value(&state).expect("serialize");
        value["players"][0]["x"] = serde_json::json!(7);
        assert!(serde_json::from_value::<GameState>(value).is_err());
    }

    #[test]
    fn snapshot_hash_tracks_positions() {
        let mut state = fresh(4, 4);
        let before = state.snapshot_hash();
        assert_eq!(before, state.clone().snapshot_hash());
        state.apply_move(&PlayerId::from(HUMAN_PLAYER_ID), Pos::new(0, 1));
        assert_ne!(before, state.snapshot_hash());
    }
}
