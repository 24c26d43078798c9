//! Wire frames exchanged between peers. One JSON object per frame.

use serde::{Deserialize, Serialize};

use crate::error::SyncError;
use crate::state::GameState;
use crate::types::{PlayerId, Pos};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl From<Pos> for Position {
    fn from(pos: Pos) -> Self {
        Self { x: pos.x, y: pos.y }
    }
}

impl From<Position> for Pos {
    fn from(position: Position) -> Self {
        Pos::new(position.x, position.y)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerMove {
    pub player_id: PlayerId,
    pub position: Position,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum SyncEvent {
    PlayerMove(PlayerMove),
    GameStateUpdate(Box<GameState>),
}

impl SyncEvent {
    pub fn player_move(player_id: PlayerId, to: Pos) -> Self {
        Self::PlayerMove(PlayerMove { player_id, position: to.into() })
    }

    pub fn snapshot(state: &GameState) -> Self {
        Self::GameStateUpdate(Box::new(state.clone()))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::PlayerMove(_) => "playerMove",
            Self::GameStateUpdate(_) => "gameStateUpdate",
        }
    }

    pub fn encode(&self) -> Result<String, SyncError> {
        serde_json::to_string(self).map_err(SyncError::Encode)
    }

    pub fn decode(frame: &str) -> Result<Self, SyncError> {
        serde_json::from_str(frame).map_err(SyncError::Decode)
    }
}
