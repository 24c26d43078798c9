//! Error types surfaced by the race core.
//!
//! Illegal moves and moves after the race has finished are not errors: they are
//! dropped where they arrive. The types here cover caller contract violations
//! (bad dimensions, bad config) and malformed data crossing the sync boundary.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::{PlayerId, Pos};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MazeError {
    #[error("maze dimensions must be non-zero, got {width}x{height}")]
    EmptyDimensions { width: usize, height: usize },
    #[error("maze of {width}x{height} cells exceeds the addressable grid")]
    TooLarge { width: usize, height: usize },
    #[error("maze rows have inconsistent lengths")]
    RaggedGrid,
    #[error("cell at row {row}, column {column} reports position {reported}")]
    CellOutOfPlace { row: usize, column: usize, reported: Pos },
    #[error("wall between {a} and {b} is open on one side only")]
    AsymmetricWall { a: Pos, b: Pos },
    #[error("maze must have exactly one exit cell, found {0}")]
    ExitCount(usize),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error(transparent)]
    Maze(#[from] MazeError),
    #[error("player {id} is outside the maze at {pos}")]
    PlayerOutOfBounds { id: PlayerId, pos: Pos },
    #[error("player {0} appears more than once in the roster")]
    DuplicatePlayer(PlayerId),
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to decode sync frame: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("failed to encode sync frame: {0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Maze(#[from] MazeError),
}
