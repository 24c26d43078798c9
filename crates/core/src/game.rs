//! A race session: the one place game state changes.
//!
//! Key input, agent ticks and peer traffic all land on a single FIFO queue and
//! are applied one at a time by [`Session::pump`], so moves never interleave.
//! The maze is fixed for the lifetime of a [`GameState`]; only a full snapshot
//! from a peer swaps it.

pub mod agent;
pub mod movement;

use std::collections::VecDeque;
use std::time::Duration;

use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::error::{ConfigError, SessionError};
use crate::mapgen::generate_seeded;
use crate::seed::{AGENT_STREAM, stream_rng};
use crate::state::GameState;
use crate::sync::{Inbound, OfflineChannel, PlayerMove, SyncChannel, SyncEvent};
use crate::types::*;

pub use agent::{AgentClock, AgentController};
pub use movement::{can_move, destination, is_legal_step, legal_directions};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    HumanInput(Direction),
    AgentTick,
    Remote(SyncEvent),
}

pub struct Session<C: SyncChannel = OfflineChannel> {
    seed: u64,
    state: GameState,
    local_player: PlayerId,
    agent: Option<AgentController<ChaCha8Rng>>,
    clock: AgentClock,
    channel: C,
    queue: VecDeque<SessionEvent>,
    connected: bool,
    torn_down: bool,
    /// Sender revision of the last snapshot applied from the peer.
    last_snapshot: Option<u64>,
}

impl<C: SyncChannel> Session<C> {
    /// Generates the maze from `seed` and seats both racers.
    pub fn new(config: &SessionConfig, seed: u64, channel: C) -> Result<Self, SessionError> {
        config.validate()?;
        let maze = generate_seeded(config.width, config.height, seed)?;
        Self::with_state(GameState::new(maze), config, seed, channel).map_err(SessionError::from)
    }

    pub fn with_state(
        state: GameState,
        config: &SessionConfig,
        seed: u64,
        channel: C,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let local_player = config.local_player_id();
        let agent = state
            .autonomous_player()
            .filter(|player| config.agent_enabled && player.id != local_player)
            .map(|player| AgentController::new(player.id.clone(), stream_rng(seed, AGENT_STREAM)));

        let mut clock = AgentClock::new(config.agent_tick());
        if agent.is_none() || state.is_finished() {
            clock.stop();
        }

        info!(
            seed,
            width = state.maze().width(),
            height = state.maze().height(),
            local = %local_player,
            agent = agent.is_some(),
            "session started"
        );

        Ok(Self {
            seed,
            state,
            local_player,
            agent,
            clock,
            channel,
            queue: VecDeque::new(),
            connected: false,
            torn_down: false,
            last_snapshot: None,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn local_player(&self) -> &PlayerId {
        &self.local_player
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn clock(&self) -> &AgentClock {
        &self.clock
    }

    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    pub fn submit(&mut self, event: SessionEvent) {
        if self.torn_down {
            return;
        }
        self.queue.push_back(event);
    }

    pub fn press(&mut self, direction: Direction) {
        self.submit(SessionEvent::HumanInput(direction));
    }

    /// Feeds wall-clock time to the agent timer, queueing one tick per elapsed period.
    pub fn advance_time(&mut self, elapsed: Duration) {
        for _ in 0..self.clock.advance(elapsed) {
            self.submit(SessionEvent::AgentTick);
        }
    }

    /// Pulls peer traffic onto the queue, then applies everything queued in order.
    pub fn pump(&mut self) -> usize {
        if self.torn_down {
            return 0;
        }

        for inbound in self.channel.poll() {
            match inbound {
                Inbound::Connected => {
                    info!("peer channel connected");
                    self.connected = true;
                }
                Inbound::Disconnected => {
                    info!("peer channel disconnected");
                    self.connected = false;
                }
                Inbound::Event(event) => self.queue.push_back(SessionEvent::Remote(event)),
                Inbound::Malformed(err) => warn!(%err, "dropping malformed peer frame"),
            }
        }

        let mut handled = 0;
        while let Some(event) = self.queue.pop_front() {
            self.handle(event);
            handled += 1;
        }

        if self.state.is_finished() && self.clock.is_running() {
            self.clock.stop();
        }
        handled
    }

    /// Broadcasts the full local state, for late joiners or authoritative correction.
    pub fn publish_snapshot(&mut self) {
        if self.torn_down {
            return;
        }
        self.channel.publish(&SyncEvent::snapshot(&self.state));
    }

    /// Stops the agent timer and releases the channel. Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.clock.stop();
        self.queue.clear();
        self.channel.teardown();
        self.connected = false;
        self.torn_down = true;
        debug!(seed = self.seed, "session torn down");
    }

    fn handle(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::HumanInput(direction) => self.handle_human_input(direction),
            SessionEvent::AgentTick => self.handle_agent_tick(),
            SessionEvent::Remote(SyncEvent::PlayerMove(player_move)) => {
                self.handle_remote_move(player_move);
            }
            SessionEvent::Remote(SyncEvent::GameStateUpdate(snapshot)) => {
                self.handle_snapshot(*snapshot);
            }
        }
    }

    fn handle_human_input(&mut self, direction: Direction) {
        if self.state.is_finished() {
            return;
        }
        let Some(to) = destination(&self.state, &self.local_player, direction) else {
            debug!(player = %self.local_player, ?direction, "blocked move dropped");
            return;
        };
        self.state.apply_move(&self.local_player, to);
        self.channel.publish(&SyncEvent::player_move(self.local_player.clone(), to));
    }

    fn handle_agent_tick(&mut self) {
        let Some(agent) = self.agent.as_mut() else {
            return;
        };
        if let Some((_, to)) = agent.choose_move(&self.state) {
            let agent_id = agent.player_id().clone();
            self.state.apply_move(&agent_id, to);
        }
    }

    fn handle_remote_move(&mut self, player_move: PlayerMove) {
        if player_move.player_id == self.local_player || self.state.is_finished() {
            return;
        }
        let to = Pos::from(player_move.position);
        if !is_legal_step(&self.state, &player_move.player_id, to) {
            debug!(player = %player_move.player_id, %to, "remote move fails local check");
            return;
        }
        self.state.apply_move(&player_move.player_id, to);
    }

    /// Snapshots are ordered against earlier snapshots from the peer, not against local moves.
    fn handle_snapshot(&mut self, snapshot: GameState) {
        let sent = snapshot.revision();
        if let Some(last) = self.last_snapshot
            && sent < last
        {
            warn!(incoming = sent, last_applied = last, "out-of-order snapshot dropped");
            return;
        }
        info!(revision = sent, status = ?snapshot.status(), "snapshot applied");

        let local = self.state.revision();
        self.state = snapshot;
        self.state.raise_revision(local);
        self.last_snapshot = Some(sent);

        if self.agent.is_some() && !self.state.is_finished() && !self.clock.is_running() {
            debug!("race reopened by snapshot, restarting agent clock");
            self.clock = AgentClock::new(self.clock.period());
        }
    }
}

impl<C: SyncChannel> Drop for Session<C> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests;
