pub mod config;
pub mod error;
pub mod game;
pub mod mapgen;
pub mod seed;
pub mod state;
pub mod sync;
pub mod types;

pub use config::SessionConfig;
pub use error::{ConfigError, MazeError, SessionError, StateError, SyncError};
pub use game::{Session, SessionEvent};
pub use mapgen::{Maze, MazeGenerator, generate_maze, generate_seeded};
pub use state::{GameState, Player};
pub use types::*;
