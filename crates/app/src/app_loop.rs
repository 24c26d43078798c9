use std::time::Duration;

use macroquad::prelude::KeyCode;
use race_core::sync::SyncChannel;
use race_core::{Direction, PlayerId, Session};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppMode {
    #[default]
    Racing,
    Finished {
        winner: Option<PlayerId>,
    },
}

#[derive(Default)]
pub struct AppState {
    pub mode: AppMode,
    /// Arrow presses forwarded to the session during the last `tick()`.
    pub forwarded_presses: usize,
}

pub fn direction_for_key(key: KeyCode) -> Option<Direction> {
    match key {
        KeyCode::Up => Some(Direction::Up),
        KeyCode::Right => Some(Direction::Right),
        KeyCode::Down => Some(Direction::Down),
        KeyCode::Left => Some(Direction::Left),
        _ => None,
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward one frame of key presses and elapsed time to the session, then apply them.
    pub fn tick<C: SyncChannel>(
        &mut self,
        session: &mut Session<C>,
        keys_pressed: &[KeyCode],
        frame_time: Duration,
    ) {
        self.forwarded_presses = 0;

        if matches!(self.mode, AppMode::Racing) {
            for direction in keys_pressed.iter().copied().filter_map(direction_for_key) {
                session.press(direction);
                self.forwarded_presses += 1;
            }
        }

        // Snapshots can still arrive after we finish, so always pump.
        session.advance_time(frame_time);
        session.pump();

        let state = session.state();
        self.mode = if state.is_finished() {
            AppMode::Finished { winner: state.winner().cloned() }
        } else {
            AppMode::Racing
        };
    }
}
