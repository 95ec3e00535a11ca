//! Integration tests for the room lifecycle.
//!
//! Every test runs on paused tokio time: whenever all tasks are idle the
//! runtime jumps straight to the next timer, so a 30s matchmaking countdown
//! or a 60s round finishes instantly and deterministically.
//!
//! Clients are plain unbounded channels registered with a `ClientRegistry`;
//! the receiver side is what a socket writer would drain.

use std::sync::Arc;
use std::time::Duration;

use glyphfall_protocol::{
    LobbyEntry, PlayerId, Role, RoomId, RoomStatus, ServerEvent, StartSignal,
};
use glyphfall_room::{LobbyBoard, Phase, RoomConfig, RoomError, RoomPool};
use glyphfall_session::ClientRegistry;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::Instant;

// =========================================================================
// Helpers
// =========================================================================

struct Harness {
    pool: RoomPool,
    registry: Arc<ClientRegistry>,
}

async fn harness() -> Harness {
    harness_with(RoomConfig::default()).await
}

async fn harness_with(config: RoomConfig) -> Harness {
    let registry = Arc::new(ClientRegistry::new());
    let board = Arc::new(LobbyBoard::new(Arc::clone(&registry)));
    let pool = RoomPool::spawn(10, config, Arc::clone(&registry), board).await;
    Harness { pool, registry }
}

impl Harness {
    async fn connect(&self, id: u64) -> UnboundedReceiver<ServerEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.registry.register(pid(id), tx).await.unwrap();
        rx
    }
}

fn pid(id: u64) -> PlayerId {
    PlayerId(id)
}

/// Next event, skipping lobby broadcasts.
async fn next_room_event(rx: &mut UnboundedReceiver<ServerEvent>) -> ServerEvent {
    loop {
        match rx.recv().await.expect("client channel closed") {
            ServerEvent::UpdateLobby(_) => continue,
            event => return event,
        }
    }
}

/// Next event, skipping lobby broadcasts, spawns and round clock updates.
async fn next_game_event(rx: &mut UnboundedReceiver<ServerEvent>) -> ServerEvent {
    loop {
        match rx.recv().await.expect("client channel closed") {
            ServerEvent::UpdateLobby(_)
            | ServerEvent::SpawnEnemy(_)
            | ServerEvent::GametimeUpdate(_) => continue,
            event => return event,
        }
    }
}

/// Next lobby broadcast.
async fn next_lobby(rx: &mut UnboundedReceiver<ServerEvent>) -> Vec<LobbyEntry> {
    loop {
        if let ServerEvent::UpdateLobby(entries) = rx.recv().await.expect("client channel closed") {
            return entries;
        }
    }
}

/// Everything already queued for a client.
fn drain(rx: &mut UnboundedReceiver<ServerEvent>) -> Vec<ServerEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Reads events until the countdown finished and the round started.
async fn expect_start_sequence(rx: &mut UnboundedReceiver<ServerEvent>, players: usize) {
    for expected in [
        StartSignal::Count(3),
        StartSignal::Count(2),
        StartSignal::Count(1),
        StartSignal::Go,
    ] {
        assert_eq!(
            next_room_event(rx).await,
            ServerEvent::StartSequence(expected)
        );
    }
    match next_room_event(rx).await {
        ServerEvent::GameStart(list) => assert_eq!(list.len(), players),
        other => panic!("expected game-start, got {other:?}"),
    }
}

/// Seats four players in `room` so the round starts right away. Returns
/// player 1's receiver positioned right after `game-start`.
async fn full_room_in_round(h: &Harness, room: RoomId) -> UnboundedReceiver<ServerEvent> {
    let mut first = h.connect(1).await;
    let mut others = Vec::new();
    for id in 2..=4 {
        others.push(h.connect(id).await);
    }
    for id in 1..=4 {
        h.pool.join(pid(id), room).await.unwrap();
    }
    for _ in 0..4 {
        assert!(matches!(next_room_event(&mut first).await, ServerEvent::RoomState(_)));
    }
    expect_start_sequence(&mut first, 4).await;
    first
}

// =========================================================================
// Pool basics
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_pool_starts_ten_open_rooms() {
    let h = harness().await;

    assert_eq!(h.pool.len(), 10);
    assert_eq!(h.pool.room_ids().first(), Some(&RoomId(1)));
    assert_eq!(h.pool.room_ids().last(), Some(&RoomId(10)));

    let lobby = h.pool.lobby().await;
    assert_eq!(lobby.len(), 10);
    assert!(lobby
        .iter()
        .all(|e| e.count == 0 && e.status == RoomStatus::Open && e.time_left == 30));
}

#[tokio::test(start_paused = true)]
async fn test_join_unknown_room_returns_not_found() {
    let h = harness().await;
    let _rx = h.connect(1).await;

    let result = h.pool.join(pid(1), RoomId(11)).await;
    assert!(matches!(result, Err(RoomError::NotFound(RoomId(11)))));
    let result = h.pool.join(pid(1), RoomId(0)).await;
    assert!(matches!(result, Err(RoomError::NotFound(_))));
}

#[tokio::test(start_paused = true)]
async fn test_join_unregistered_client_is_rejected() {
    let h = harness().await;

    let result = h.pool.join(pid(42), RoomId(1)).await;
    assert!(matches!(result, Err(RoomError::Session(_))));
    assert_eq!(h.pool.info(RoomId(1)).await.unwrap().player_count, 0);
}

// =========================================================================
// Joining
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_first_join_starts_matchmaking() {
    let h = harness().await;
    let mut rx = h.connect(1).await;

    h.pool.join(pid(1), RoomId(3)).await.unwrap();

    let lobby = next_lobby(&mut rx).await;
    let entry = lobby.iter().find(|e| e.id == RoomId(3)).unwrap();
    assert_eq!(entry.count, 1);
    assert_eq!(entry.status, RoomStatus::Waiting);

    match next_room_event(&mut rx).await {
        ServerEvent::RoomState(snapshot) => {
            assert_eq!(snapshot.id, RoomId(3));
            assert_eq!(snapshot.status, RoomStatus::Waiting);
            assert_eq!(snapshot.timer, 30);
            assert_eq!(snapshot.players.len(), 1);
            assert_eq!(snapshot.players[0].role, Role::Fire);
            assert_eq!(snapshot.players[0].color, "#ff4444");
        }
        other => panic!("expected room-state, got {other:?}"),
    }

    let info = h.pool.info(RoomId(3)).await.unwrap();
    assert_eq!(info.phase, Phase::Matchmaking);
    assert_eq!(info.armed_timers, 1);
}

#[tokio::test(start_paused = true)]
async fn test_duplicate_join_is_rejected() {
    let h = harness().await;
    let _rx = h.connect(1).await;

    h.pool.join(pid(1), RoomId(2)).await.unwrap();
    let result = h.pool.join(pid(1), RoomId(2)).await;

    assert!(matches!(result, Err(RoomError::AlreadyInRoom(..))));
    assert_eq!(h.pool.info(RoomId(2)).await.unwrap().player_count, 1);
}

#[tokio::test(start_paused = true)]
async fn test_join_second_room_while_seated_is_rejected() {
    let h = harness().await;
    let _rx = h.connect(1).await;

    h.pool.join(pid(1), RoomId(2)).await.unwrap();
    let result = h.pool.join(pid(1), RoomId(6)).await;

    assert!(matches!(result, Err(RoomError::AlreadySeated(_, RoomId(2)))));
    assert_eq!(h.pool.info(RoomId(6)).await.unwrap().player_count, 0);
}

#[tokio::test(start_paused = true)]
async fn test_four_joins_start_the_game() {
    let h = harness().await;
    let mut a = h.connect(1).await;
    let mut rest = Vec::new();
    for id in 2..=4 {
        rest.push(h.connect(id).await);
    }

    for id in 1..=4 {
        h.pool.join(pid(id), RoomId(3)).await.unwrap();
    }

    let mut roles = Vec::new();
    for expected_count in 1..=4 {
        match next_room_event(&mut a).await {
            ServerEvent::RoomState(snapshot) => {
                assert_eq!(snapshot.players.len(), expected_count);
                roles = snapshot.players.iter().map(|p| p.role).collect();
            }
            other => panic!("expected room-state, got {other:?}"),
        }
    }
    assert_eq!(roles, Role::ALL.to_vec());

    let started = Instant::now();
    expect_start_sequence(&mut a, 4).await;
    assert_eq!(started.elapsed(), Duration::from_secs(3));

    let info = h.pool.info(RoomId(3)).await.unwrap();
    assert_eq!(info.phase, Phase::Round);
    assert_eq!(info.player_count, 4);
}

#[tokio::test(start_paused = true)]
async fn test_join_playing_room_is_rejected() {
    let h = harness().await;
    let _a = full_room_in_round(&h, RoomId(1)).await;
    let _late = h.connect(5).await;

    let result = h.pool.join(pid(5), RoomId(1)).await;

    assert!(matches!(result, Err(RoomError::InvalidState { .. })));
    assert_eq!(h.pool.info(RoomId(1)).await.unwrap().player_count, 4);
}

#[tokio::test(start_paused = true)]
async fn test_full_room_rejects_extra_player() {
    let h = harness_with(RoomConfig {
        max_players: 2,
        ..RoomConfig::default()
    })
    .await;
    for id in 1..=3 {
        let _ = h.connect(id).await;
    }

    h.pool.join(pid(1), RoomId(1)).await.unwrap();
    h.pool.join(pid(2), RoomId(1)).await.unwrap();
    let result = h.pool.join(pid(3), RoomId(1)).await;

    assert!(result.is_err());
    let info = h.pool.info(RoomId(1)).await.unwrap();
    assert_eq!(info.player_count, 2);
    assert_eq!(info.phase, Phase::Countdown);
}

// =========================================================================
// Matchmaking countdown
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_single_player_counts_down_to_a_round() {
    let h = harness().await;
    let mut rx = h.connect(1).await;
    let joined = Instant::now();

    h.pool.join(pid(1), RoomId(5)).await.unwrap();
    assert!(matches!(next_room_event(&mut rx).await, ServerEvent::RoomState(_)));

    for expected in (0..30).rev() {
        assert_eq!(next_room_event(&mut rx).await, ServerEvent::TimerUpdate(expected));
    }
    assert_eq!(joined.elapsed(), Duration::from_secs(30));

    expect_start_sequence(&mut rx, 1).await;
    assert_eq!(joined.elapsed(), Duration::from_secs(33));

    let info = h.pool.info(RoomId(5)).await.unwrap();
    assert_eq!(info.phase, Phase::Round);
    assert_eq!(info.player_count, 1);
}

#[tokio::test(start_paused = true)]
async fn test_lobby_heartbeat_every_fifth_tick() {
    let h = harness().await;
    let _player = h.connect(1).await;
    let mut watcher = h.connect(2).await;

    h.pool.join(pid(1), RoomId(1)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(10_500)).await;

    let lobbies: Vec<Vec<LobbyEntry>> = drain(&mut watcher)
        .into_iter()
        .map(|event| match event {
            ServerEvent::UpdateLobby(entries) => entries,
            other => panic!("watcher only sees the lobby, got {other:?}"),
        })
        .collect();

    // One for the join, then ticks 25 and 20.
    assert_eq!(lobbies.len(), 3);
    let times: Vec<u32> = lobbies.iter().map(|l| l[0].time_left).collect();
    assert_eq!(times, vec![30, 25, 20]);
}

#[tokio::test(start_paused = true)]
async fn test_player_leaving_matchmaking_keeps_countdown() {
    let h = harness().await;
    let mut a = h.connect(1).await;
    let _b = h.connect(2).await;

    h.pool.join(pid(1), RoomId(7)).await.unwrap();
    h.pool.join(pid(2), RoomId(7)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(2_500)).await;
    drain(&mut a);

    h.pool.leave(pid(2), RoomId(7)).await.unwrap();

    match next_room_event(&mut a).await {
        ServerEvent::RoomState(snapshot) => {
            assert_eq!(snapshot.players.len(), 1);
            assert_eq!(snapshot.timer, 28);
        }
        other => panic!("expected room-state, got {other:?}"),
    }
    assert_eq!(next_room_event(&mut a).await, ServerEvent::TimerUpdate(27));
}

#[tokio::test(start_paused = true)]
async fn test_last_player_leaving_matchmaking_disarms_room() {
    let h = harness().await;
    let mut watcher = h.connect(2).await;
    let _a = h.connect(1).await;

    h.pool.join(pid(1), RoomId(6)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(4_500)).await;
    assert_eq!(h.pool.info(RoomId(6)).await.unwrap().armed_timers, 1);

    h.pool.leave(pid(1), RoomId(6)).await.unwrap();

    let info = h.pool.info(RoomId(6)).await.unwrap();
    assert_eq!(info.phase, Phase::Idle);
    assert_eq!(info.player_count, 0);
    assert_eq!(info.armed_timers, 0);

    let entry = h.pool.lobby().await[5].clone();
    assert_eq!(entry.status, RoomStatus::Open);
    assert_eq!(entry.time_left, 30);

    // The countdown really stopped: no heartbeat for room 6 shows up.
    drain(&mut watcher);
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert!(drain(&mut watcher).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_room_filling_as_timer_expires_goes_to_countdown_once() {
    let h = harness().await;
    let mut a = h.connect(1).await;
    let mut others = Vec::new();
    for id in 2..=4 {
        others.push(h.connect(id).await);
    }

    let t0 = Instant::now();
    for id in 1..=3 {
        h.pool.join(pid(id), RoomId(2)).await.unwrap();
    }

    // The fourth join lands on the same instant as the final matchmaking
    // tick. Commands are served first, so the join wins.
    tokio::time::sleep_until(t0 + Duration::from_secs(30)).await;
    h.pool.join(pid(4), RoomId(2)).await.unwrap();

    let info = h.pool.info(RoomId(2)).await.unwrap();
    assert_eq!(info.player_count, 4);
    assert_eq!(info.phase, Phase::Countdown);

    let mut last_timer = None;
    let mut room_states = 0;
    loop {
        match next_room_event(&mut a).await {
            ServerEvent::TimerUpdate(left) => last_timer = Some(left),
            ServerEvent::RoomState(_) => room_states += 1,
            ServerEvent::StartSequence(StartSignal::Count(3)) => break,
            other => panic!("unexpected event before countdown: {other:?}"),
        }
    }
    assert_eq!(room_states, 4);
    assert_eq!(last_timer, Some(1));

    // One countdown, not two.
    for expected in [StartSignal::Count(2), StartSignal::Count(1), StartSignal::Go] {
        assert_eq!(
            next_room_event(&mut a).await,
            ServerEvent::StartSequence(expected)
        );
    }
    assert!(matches!(
        next_room_event(&mut a).await,
        ServerEvent::GameStart(list) if list.len() == 4
    ));
}

// =========================================================================
// Round
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_round_runs_sixty_ticks_then_game_over() {
    let h = harness().await;
    let mut a = full_room_in_round(&h, RoomId(4)).await;
    let round_started = Instant::now();

    let mut clock = Vec::new();
    let mut spawns = 0;
    let final_players = loop {
        match next_room_event(&mut a).await {
            ServerEvent::GametimeUpdate(left) => clock.push(left),
            ServerEvent::SpawnEnemy(enemy) => {
                assert_eq!(enemy.id.len(), 9);
                spawns += 1;
            }
            ServerEvent::GameOver(players) => break players,
            other => panic!("unexpected event during round: {other:?}"),
        }
    };

    assert_eq!(clock, (0..60).rev().collect::<Vec<u32>>());
    assert_eq!(spawns, 66);
    assert_eq!(final_players.len(), 4);
    assert_eq!(round_started.elapsed(), Duration::from_secs(60));

    let info = h.pool.info(RoomId(4)).await.unwrap();
    assert_eq!(info.phase, Phase::Finale);
    assert_eq!(info.armed_timers, 1);
}

#[tokio::test(start_paused = true)]
async fn test_scores_accumulate_and_broadcast() {
    let h = harness().await;
    let mut a = full_room_in_round(&h, RoomId(2)).await;

    h.pool.report_score(pid(1), RoomId(2), 10).await.unwrap();
    h.pool.report_score(pid(3), RoomId(2), 4).await.unwrap();
    h.pool.report_score(pid(1), RoomId(2), 5).await.unwrap();

    let mut last = Vec::new();
    for _ in 0..3 {
        match next_game_event(&mut a).await {
            ServerEvent::ScoreUpdate(players) => last = players,
            other => panic!("expected score-update, got {other:?}"),
        }
    }
    let score = |id: u64| last.iter().find(|p| p.id == pid(id)).unwrap().score;
    assert_eq!(score(1), 15);
    assert_eq!(score(3), 4);
    assert_eq!(score(2), 0);
}

#[tokio::test(start_paused = true)]
async fn test_non_member_score_is_ignored() {
    let h = harness().await;
    let mut a = full_room_in_round(&h, RoomId(2)).await;
    let _outsider = h.connect(9).await;

    h.pool.report_score(pid(9), RoomId(2), 50).await.unwrap();
    h.pool.report_score(pid(1), RoomId(2), 10).await.unwrap();

    match next_game_event(&mut a).await {
        ServerEvent::ScoreUpdate(players) => {
            assert!(players.iter().all(|p| p.id != pid(9)));
            assert_eq!(players.iter().map(|p| p.score).sum::<u32>(), 10);
        }
        other => panic!("expected score-update, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_score_during_matchmaking_is_ignored() {
    let h = harness().await;
    let mut a = h.connect(1).await;
    h.pool.join(pid(1), RoomId(1)).await.unwrap();

    h.pool.report_score(pid(1), RoomId(1), 10).await.unwrap();

    let snapshot = h.pool.snapshot(RoomId(1)).await.unwrap();
    assert_eq!(snapshot.players[0].score, 0);
    assert!(drain(&mut a)
        .iter()
        .all(|e| !matches!(e, ServerEvent::ScoreUpdate(_))));
}

#[tokio::test(start_paused = true)]
async fn test_enemy_killed_is_relayed_to_room() {
    let h = harness().await;
    let mut a = full_room_in_round(&h, RoomId(8)).await;
    let mut outsider = h.connect(9).await;

    h.pool
        .enemy_killed(pid(2), RoomId(8), "q1w2e3r4t".into())
        .await
        .unwrap();

    assert_eq!(
        next_game_event(&mut a).await,
        ServerEvent::EnemyDestroyed {
            enemy_id: "q1w2e3r4t".into(),
            killer_id: pid(2),
        }
    );
    assert!(drain(&mut outsider)
        .iter()
        .all(|e| matches!(e, ServerEvent::UpdateLobby(_))));
}

// =========================================================================
// Leaving and reset
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_everyone_leaving_mid_round_resets_room() {
    let h = harness().await;
    let mut a = full_room_in_round(&h, RoomId(4)).await;
    tokio::time::sleep(Duration::from_millis(5_500)).await;

    for id in 1..=4 {
        h.pool.leave(pid(id), RoomId(4)).await.unwrap();
    }

    let info = h.pool.info(RoomId(4)).await.unwrap();
    assert_eq!(info.phase, Phase::Idle);
    assert_eq!(info.player_count, 0);
    assert_eq!(info.armed_timers, 0);

    let snapshot = h.pool.snapshot(RoomId(4)).await.unwrap();
    assert_eq!(snapshot.status, RoomStatus::Open);
    assert_eq!(snapshot.timer, 30);

    let entry = h.pool.lobby().await[3].clone();
    assert_eq!(entry.status, RoomStatus::Open);
    assert_eq!(entry.count, 0);

    // Nothing from the old round shows up later.
    drain(&mut a);
    tokio::time::sleep(Duration::from_secs(120)).await;
    assert!(drain(&mut a)
        .iter()
        .all(|e| matches!(e, ServerEvent::UpdateLobby(_))));
}

#[tokio::test(start_paused = true)]
async fn test_leaving_during_countdown_cancels_it() {
    let h = harness().await;
    let mut rxs = Vec::new();
    for id in 1..=4 {
        rxs.push(h.connect(id).await);
    }
    for id in 1..=4 {
        h.pool.join(pid(id), RoomId(9)).await.unwrap();
    }
    assert_eq!(h.pool.info(RoomId(9)).await.unwrap().phase, Phase::Countdown);

    for id in 1..=4 {
        h.pool.leave(pid(id), RoomId(9)).await.unwrap();
    }

    let info = h.pool.info(RoomId(9)).await.unwrap();
    assert_eq!(info.phase, Phase::Idle);
    assert_eq!(info.armed_timers, 0);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(h.pool.info(RoomId(9)).await.unwrap().phase, Phase::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_leave_from_non_member_is_rejected() {
    let h = harness().await;
    let _rx = h.connect(1).await;

    let result = h.pool.leave(pid(1), RoomId(1)).await;
    assert!(matches!(result, Err(RoomError::NotInRoom(..))));
}

#[tokio::test(start_paused = true)]
async fn test_disconnect_unseats_player() {
    let h = harness().await;
    let _a = h.connect(1).await;
    let mut b = h.connect(2).await;
    h.pool.join(pid(1), RoomId(6)).await.unwrap();
    h.pool.join(pid(2), RoomId(6)).await.unwrap();
    drain(&mut b);

    assert_eq!(h.pool.disconnect(pid(1)).await, Some(RoomId(6)));
    assert_eq!(h.pool.disconnect(pid(1)).await, None);

    match next_room_event(&mut b).await {
        ServerEvent::RoomState(snapshot) => {
            assert_eq!(snapshot.players.len(), 1);
            assert_eq!(snapshot.players[0].id, pid(2));
        }
        other => panic!("expected room-state, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_roles_stay_unique_after_rejoin() {
    let h = harness().await;
    for id in 1..=4 {
        let _ = h.connect(id).await;
    }
    h.pool.join(pid(1), RoomId(1)).await.unwrap();
    h.pool.join(pid(2), RoomId(1)).await.unwrap();
    h.pool.join(pid(3), RoomId(1)).await.unwrap();
    h.pool.leave(pid(1), RoomId(1)).await.unwrap();
    h.pool.join(pid(4), RoomId(1)).await.unwrap();

    let snapshot = h.pool.snapshot(RoomId(1)).await.unwrap();
    let roles: Vec<Role> = snapshot.players.iter().map(|p| p.role).collect();
    assert_eq!(roles, vec![Role::Earth, Role::Air, Role::Fire]);
}

#[tokio::test(start_paused = true)]
async fn test_grace_period_resets_room() {
    let h = harness().await;
    let mut a = full_room_in_round(&h, RoomId(10)).await;
    loop {
        if let ServerEvent::GameOver(_) = next_room_event(&mut a).await {
            break;
        }
    }
    assert_eq!(h.pool.lobby().await[9].status, RoomStatus::Playing);

    let finished = Instant::now();
    let lobby = loop {
        let lobby = next_lobby(&mut a).await;
        if lobby[9].status == RoomStatus::Open {
            break lobby;
        }
    };
    assert_eq!(finished.elapsed(), Duration::from_secs(10));
    assert_eq!(lobby[9].count, 0);
    assert_eq!(lobby[9].time_left, 30);

    assert_eq!(h.registry.seat_of(pid(1)).await, None);
    let info = h.pool.info(RoomId(10)).await.unwrap();
    assert_eq!(info.phase, Phase::Idle);
    assert_eq!(info.armed_timers, 0);

    // The room can be played again.
    h.pool.join(pid(1), RoomId(10)).await.unwrap();
    assert_eq!(h.pool.info(RoomId(10)).await.unwrap().phase, Phase::Matchmaking);
}

#[tokio::test(start_paused = true)]
async fn test_leaving_during_finale_cancels_grace() {
    let h = harness().await;
    let mut a = full_room_in_round(&h, RoomId(3)).await;
    loop {
        if let ServerEvent::GameOver(_) = next_room_event(&mut a).await {
            break;
        }
    }

    for id in 1..=4 {
        h.pool.leave(pid(id), RoomId(3)).await.unwrap();
    }

    let info = h.pool.info(RoomId(3)).await.unwrap();
    assert_eq!(info.phase, Phase::Idle);
    assert_eq!(info.armed_timers, 0);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_stops_rooms() {
    let h = harness().await;
    h.pool.shutdown().await;
    tokio::task::yield_now().await;

    let result = h.pool.info(RoomId(1)).await;
    assert!(matches!(result, Err(RoomError::Unavailable(RoomId(1)))));
}
