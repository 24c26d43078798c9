//! Autonomous racer: a uniform random walk over legal moves, paced by a session clock.

use std::time::Duration;

use tracing::warn;

use crate::seed::RandomSource;
use crate::state::GameState;
use crate::types::{Direction, GameStatus, PlayerId, Pos};

use super::movement::{destination, legal_directions};

pub const DEFAULT_TICK: Duration = Duration::from_millis(500);

pub struct AgentController<R> {
    player_id: PlayerId,
    rng: R,
}

impl<R: RandomSource> AgentController<R> {
    pub fn new(player_id: PlayerId, rng: R) -> Self {
        Self { player_id, rng }
    }

    pub fn player_id(&self) -> &PlayerId {
        &self.player_id
    }

    /// Picks the next step, or `None` when the race is over or the agent is boxed in.
    pub fn choose_move(&mut self, state: &GameState) -> Option<(Direction, Pos)> {
        if state.status() != GameStatus::Playing {
            return None;
        }
        let options = legal_directions(state, &self.player_id);
        if options.is_empty() {
            // Only a single-cell maze leaves a rostered agent boxed in; anything else is corrupt.
            let single_cell = state.maze().cells().len() == 1;
            if state.player(&self.player_id).is_some() && !single_cell {
                warn!(player = %self.player_id, "agent has no legal move");
            }
            return None;
        }
        let direction = options[self.rng.pick(options.len())];
        destination(state, &self.player_id, direction).map(|to| (direction, to))
    }
}

/// Fixed-period tick source owned by the session. Stopping it is permanent.
#[derive(Clone, Debug)]
pub struct AgentClock {
    period: Duration,
    pending: Duration,
    running: bool,
}

impl AgentClock {
    pub fn new(period: Duration) -> Self {
        Self { period, pending: Duration::ZERO, running: !period.is_zero() }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Accumulates `elapsed` and returns how many whole periods completed.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if !self.running {
            return 0;
        }
        self.pending += elapsed;
        let mut ticks = 0_u32;
        while self.pending >= self.period {
            self.pending -= self.period;
            ticks = ticks.saturating_add(1);
        }
        ticks
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.pending = Duration::ZERO;
    }
}
