//! Session queue, reconciliation and lifetime tests.

use super::*;
use crate::error::MazeError;
use crate::state::{AGENT_PLAYER_ID, HUMAN_PLAYER_ID};
use crate::sync::MemoryChannel;

fn small_config() -> SessionConfig {
    SessionConfig { width: 6, height: 6, agent_tick_ms: 100, ..SessionConfig::default() }
}

fn human() -> PlayerId {
    PlayerId::from(HUMAN_PLAYER_ID)
}

fn agent() -> PlayerId {
    PlayerId::from(AGENT_PLAYER_ID)
}

fn published_moves(peer: &mut MemoryChannel) -> Vec<PlayerMove> {
    peer.poll()
        .into_iter()
        .filter_map(|inbound| match inbound {
            Inbound::Event(SyncEvent::PlayerMove(player_move)) => Some(player_move),
            _ => None,
        })
        .collect()
}

#[test]
fn accepted_human_move_is_applied_then_published() {
    let (local, mut peer) = MemoryChannel::pair();
    let mut session = Session::new(&small_config(), 11, local).expect("session");
    let direction = legal_directions(session.state(), &human())[0];
    let expected = Pos::new(0, 0).step(direction);

    session.press(direction);
    assert_eq!(session.pump(), 1);

    assert_eq!(session.state().player(&human()).map(|p| p.pos), Some(expected));
    let moves = published_moves(&mut peer);
    assert_eq!(moves.len(), 1);
    assert_eq!(moves[0].player_id, human());
    assert_eq!(Pos::from(moves[0].position), expected);
}

#[test]
fn blocked_human_move_changes_nothing_and_publishes_nothing() {
    let (local, mut peer) = MemoryChannel::pair();
    let mut session = Session::new(&small_config(), 11, local).expect("session");
    let before = session.state().clone();

    let mut blocked = vec![Direction::Up, Direction::Left];
    blocked.extend(
        [Direction::Right, Direction::Down]
            .into_iter()
            .filter(|direction| !can_move(session.state(), &human(), *direction)),
    );
    for direction in blocked {
        session.press(direction);
    }
    session.pump();

    assert_eq!(session.state(), &before);
    assert!(published_moves(&mut peer).is_empty());
}

#[test]
fn agent_ticks_follow_the_clock() {
    let mut session = Session::new(&small_config(), 3, OfflineChannel).expect("session");
    let start = session.state().player(&agent()).expect("agent").pos;

    session.advance_time(Duration::from_millis(99));
    assert_eq!(session.pending_events(), 0);

    session.advance_time(Duration::from_millis(1));
    assert_eq!(session.pending_events(), 1);
    session.pump();

    let moved_to = session.state().player(&agent()).expect("agent").pos;
    assert!(Direction::between(start, moved_to).is_some(), "{start} -> {moved_to}");
}

#[test]
fn remote_move_for_another_player_is_checked_against_the_local_maze() {
    let (local, mut peer) = MemoryChannel::pair();
    let config = SessionConfig { agent_enabled: false, ..small_config() };
    let mut session = Session::new(&config, 21, local).expect("session");
    let start = session.state().player(&agent()).expect("agent").pos;

    let through_wall = Direction::ALL
        .into_iter()
        .find(|direction| !can_move(session.state(), &agent(), *direction))
        .expect("corner cell has a walled side");
    peer.publish(&SyncEvent::player_move(agent(), start.step(through_wall)));
    peer.publish(&SyncEvent::player_move(agent(), Pos::new(start.x + 3, start.y)));
    session.pump();
    assert_eq!(session.state().player(&agent()).map(|p| p.pos), Some(start));

    let legal = legal_directions(session.state(), &agent())[0];
    peer.publish(&SyncEvent::player_move(agent(), start.step(legal)));
    session.pump();
    assert_eq!(session.state().player(&agent()).map(|p| p.pos), Some(start.step(legal)));
    assert!(session.is_connected());
}

#[test]
fn remote_move_naming_the_local_player_is_ignored() {
    let (local, mut peer) = MemoryChannel::pair();
    let mut session = Session::new(&small_config(), 21, local).expect("session");
    let direction = legal_directions(session.state(), &human())[0];

    peer.publish(&SyncEvent::player_move(human(), Pos::new(0, 0).step(direction)));
    session.pump();

    assert_eq!(session.state().player(&human()).map(|p| p.pos), Some(Pos::new(0, 0)));
}

#[test]
fn finished_snapshot_replaces_state_and_freezes_local_input() {
    let (local, mut peer) = MemoryChannel::pair();
    let mut session = Session::new(&small_config(), 5, local).expect("session");

    let mut remote_view = session.state().clone();
    remote_view.apply_move(&agent(), Pos::new(5, 5));
    assert_eq!(remote_view.winner(), Some(&agent()));
    peer.publish(&SyncEvent::snapshot(&remote_view));
    session.pump();

    assert_eq!(session.state(), &remote_view);
    assert_eq!(session.state().status(), GameStatus::Finished);
    assert!(!session.clock().is_running());

    for direction in Direction::ALL {
        session.press(direction);
    }
    session.advance_time(Duration::from_secs(5));
    session.pump();
    assert_eq!(session.state(), &remote_view);
    assert!(published_moves(&mut peer).is_empty());
}

#[test]
fn snapshot_applies_even_when_local_peer_counted_more_moves() {
    let (local, mut peer) = MemoryChannel::pair();
    let config = SessionConfig {
        local_player: AGENT_PLAYER_ID.to_string(),
        agent_enabled: false,
        ..small_config()
    };
    let mut session = Session::new(&config, 5, local).expect("session");
    let host_view = session.state().clone();

    for _ in 0..3 {
        let direction = legal_directions(session.state(), &agent())[0];
        session.press(direction);
        session.pump();
    }
    assert_eq!(session.state().revision(), 3);

    let mut finished = host_view;
    finished.apply_move(&agent(), Pos::new(5, 5));
    assert_eq!(finished.revision(), 1);
    peer.publish(&SyncEvent::snapshot(&finished));
    session.pump();

    assert_eq!(session.state().status(), GameStatus::Finished);
    assert_eq!(session.state().winner(), Some(&agent()));
    assert_eq!(session.state().players(), finished.players());
    assert_eq!(session.state().revision(), 3, "local clock never runs backwards");
}

#[test]
fn out_of_order_snapshot_does_not_roll_back_a_newer_one() {
    let (local, mut peer) = MemoryChannel::pair();
    let mut session = Session::new(&small_config(), 5, local).expect("session");

    let mut older = session.state().clone();
    older.apply_move(&human(), Pos::new(1, 0));
    older.apply_move(&human(), Pos::new(2, 0));
    let mut newer = older.clone();
    newer.apply_move(&human(), Pos::new(3, 0));
    newer.apply_move(&human(), Pos::new(4, 0));

    peer.publish(&SyncEvent::snapshot(&newer));
    peer.publish(&SyncEvent::snapshot(&older));
    session.pump();

    assert_eq!(session.state(), &newer);
}

#[test]
fn reopened_race_restarts_the_agent_clock() {
    let (local, mut peer) = MemoryChannel::pair();
    let mut session = Session::new(&small_config(), 5, local).expect("session");
    let start = session.state().player(&agent()).expect("agent").pos;

    let mut finished = session.state().clone();
    finished.apply_move(&agent(), Pos::new(5, 5));
    peer.publish(&SyncEvent::snapshot(&finished));
    session.pump();
    assert!(!session.clock().is_running());

    let mut correction = GameState::new(session.state().maze().clone());
    for _ in 0..3 {
        correction.apply_move(&human(), Pos::new(0, 0));
    }
    peer.publish(&SyncEvent::snapshot(&correction));
    session.pump();
    assert_eq!(session.state().status(), GameStatus::Playing);
    assert!(session.clock().is_running());

    session.advance_time(Duration::from_millis(100));
    session.pump();
    let moved_to = session.state().player(&agent()).expect("agent").pos;
    assert!(Direction::between(start, moved_to).is_some(), "{start} -> {moved_to}");
}

#[test]
fn malformed_frames_are_dropped() {
    let (local, mut peer) = MemoryChannel::pair();
    let mut session = Session::new(&small_config(), 5, local).expect("session");
    let before = session.state().clone();

    peer.send_raw("{\"event\":\"playerMove\",\"payload\":{\"playerId\":2}}");
    peer.send_raw("garbage");
    assert_eq!(session.pump(), 0);
    assert_eq!(session.state(), &before);
}

#[test]
fn teardown_stops_ticks_and_drops_input() {
    let (local, mut peer) = MemoryChannel::pair();
    let mut session = Session::new(&small_config(), 8, local).expect("session");
    session.press(Direction::Down);
    session.teardown();

    assert!(session.is_torn_down());
    assert!(!session.clock().is_running());
    session.advance_time(Duration::from_secs(60));
    session.press(Direction::Right);
    assert_eq!(session.pending_events(), 0);
    assert_eq!(session.pump(), 0);

    let received = peer.poll();
    assert!(matches!(received.last(), Some(Inbound::Disconnected)));
}

#[test]
fn dropping_a_session_disconnects_its_peer() {
    let (local, mut peer) = MemoryChannel::pair();
    let session = Session::new(&small_config(), 8, local).expect("session");
    drop(session);
    assert!(matches!(peer.poll().last(), Some(Inbound::Disconnected)));
}

#[test]
fn local_agent_is_skipped_when_disabled_or_driven_by_the_local_peer() {
    let disabled = SessionConfig { agent_enabled: false, ..small_config() };
    let session = Session::new(&disabled, 1, OfflineChannel).expect("session");
    assert!(!session.clock().is_running());

    let as_agent = SessionConfig { local_player: AGENT_PLAYER_ID.to_string(), ..small_config() };
    let session = Session::new(&as_agent, 1, OfflineChannel).expect("session");
    assert!(!session.clock().is_running());
    assert_eq!(session.local_player(), &agent());
}

#[test]
fn invalid_config_fails_fast() {
    let zero_width = SessionConfig { width: 0, ..small_config() };
    assert!(matches!(
        Session::new(&zero_width, 1, OfflineChannel),
        Err(SessionError::Config(ConfigError::Invalid(_)))
    ));

    let zero_tick = SessionConfig { agent_tick_ms: 0, ..small_config() };
    assert!(matches!(
        Session::new(&zero_tick, 1, OfflineChannel),
        Err(SessionError::Config(ConfigError::Invalid(_)))
    ));
}

#[test]
fn oversized_maze_surfaces_as_a_maze_error() {
    let config = SessionConfig { width: usize::MAX, height: 2, ..small_config() };
    assert!(matches!(
        Session::new(&config, 1, OfflineChannel),
        Err(SessionError::Maze(MazeError::TooLarge { .. }))
    ));
}
