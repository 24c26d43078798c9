//! Movement legality. Every position change, from any source, passes through here first.

use crate::state::GameState;
use crate::types::{Direction, PlayerId, Pos};

/// True iff the mover's current cell has no wall on `direction` and the step stays on the grid.
pub fn can_move(state: &GameState, player_id: &PlayerId, direction: Direction) -> bool {
    let Some(player) = state.player(player_id) else {
        return false;
    };
    let maze = state.maze();
    !maze.has_wall(player.pos, direction) && maze.in_bounds(player.pos.step(direction))
}

pub fn legal_directions(state: &GameState, player_id: &PlayerId) -> Vec<Direction> {
    Direction::ALL
        .into_iter()
        .filter(|direction| can_move(state, player_id, *direction))
        .collect()
}

/// Destination of a legal step, or `None` when the step is blocked.
pub fn destination(state: &GameState, player_id: &PlayerId, direction: Direction) -> Option<Pos> {
    if !can_move(state, player_id, direction) {
        return None;
    }
    state.player(player_id).map(|player| player.pos.step(direction))
}

/// Accepts `to` only if it is exactly one legal step from where this state has the player.
pub fn is_legal_step(state: &GameState, player_id: &PlayerId, to: Pos) -> bool {
    let Some(player) = state.player(player_id) else {
        return false;
    };
    Direction::between(player.pos, to)
        .is_some_and(|direction| can_move(state, player_id, direction))
}
