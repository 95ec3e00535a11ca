//! Room actor: an isolated Tokio task that runs one room's lifecycle.
//!
//! Each room runs in its own task, communicating with the outside world
//! through an mpsc channel. The task owns the [`Room`] model and all five of
//! the room's timers, and handles commands and timer ticks one at a time in
//! a single `select!` loop, so nothing else ever observes a half-applied
//! transition.
//!
//! ```text
//!            join (first)         room full / timer 0       GO!
//!   Idle ─────────────────→ Matchmaking ─────────────→ Countdown ───→ Round
//!    ↑                          │                                       │
//!    │   last player leaves     │                          60 ticks     │
//!    ├──────────────────────────┴───────────── (any phase)              ▼
//!    └────────────────────────────── grace delay ────────────────── Finale
//! ```

use std::sync::Arc;

use glyphfall_protocol::{PlayerId, RoomId, RoomSnapshot, ServerEvent, StartSignal};
use glyphfall_session::ClientRegistry;
use glyphfall_tick::Ticker;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, trace, warn};

use crate::{LobbyBoard, Phase, Room, RoomConfig, RoomError, Spawner};

/// Commands sent to a room actor through its channel.
///
/// The `oneshot::Sender` in some variants is a reply channel: the caller
/// sends the command and waits for the answer on it.
pub(crate) enum RoomCommand {
    Join {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    Leave {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    Score {
        player_id: PlayerId,
        points: u32,
    },
    EnemyKilled {
        player_id: PlayerId,
        enemy_id: String,
    },
    GetSnapshot {
        reply: oneshot::Sender<RoomSnapshot>,
    },
    GetInfo {
        reply: oneshot::Sender<RoomInfo>,
    },
    Shutdown,
}

/// Diagnostic view of a room (not sent to clients).
#[derive(Debug, Clone)]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub phase: Phase,
    pub player_count: usize,
    pub max_players: usize,
    /// How many of the room's timers are currently running.
    pub armed_timers: usize,
}

// ---------------------------------------------------------------------------
// RoomHandle
// ---------------------------------------------------------------------------

/// Handle to a running room actor. Used to send commands to it.
///
/// Cheap to clone: it's just an `mpsc::Sender` wrapper.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// Asks the room to seat a player.
    pub async fn join(&self, player_id: PlayerId) -> Result<(), RoomError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::Join { player_id, reply }).await?;
        rx.await.map_err(|_| RoomError::Unavailable(self.room_id))?
    }

    /// Asks the room to unseat a player.
    pub async fn leave(&self, player_id: PlayerId) -> Result<(), RoomError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::Leave { player_id, reply }).await?;
        rx.await.map_err(|_| RoomError::Unavailable(self.room_id))?
    }

    /// Reports points scored by a player (fire-and-forget).
    pub async fn report_score(&self, player_id: PlayerId, points: u32) -> Result<(), RoomError> {
        self.send(RoomCommand::Score { player_id, points }).await
    }

    /// Reports that a player destroyed an enemy (fire-and-forget).
    pub async fn enemy_killed(&self, player_id: PlayerId, enemy_id: String) -> Result<(), RoomError> {
        self.send(RoomCommand::EnemyKilled { player_id, enemy_id })
            .await
    }

    /// The member view of the room.
    pub async fn snapshot(&self) -> Result<RoomSnapshot, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::GetSnapshot { reply }).await?;
        rx.await.map_err(|_| RoomError::Unavailable(self.room_id))
    }

    /// Diagnostic info about the room.
    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::GetInfo { reply }).await?;
        rx.await.map_err(|_| RoomError::Unavailable(self.room_id))
    }

    /// Tells the room to cancel its timers and stop.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.send(RoomCommand::Shutdown).await
    }

    async fn send(&self, cmd: RoomCommand) -> Result<(), RoomError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }
}

// ---------------------------------------------------------------------------
// Timers
// ---------------------------------------------------------------------------

struct Timers {
    matchmaking: Ticker,
    countdown: Ticker,
    round: Ticker,
    spawn: Ticker,
    grace: Ticker,
}

impl Timers {
    fn new(config: &RoomConfig) -> Self {
        let tick = config.tick_period();
        let policy = config.tick_policy;
        Self {
            matchmaking: Ticker::every(tick).named("matchmaking").with_policy(policy),
            countdown: Ticker::every(tick).named("countdown").with_policy(policy),
            round: Ticker::every(tick).named("round").with_policy(policy),
            spawn: Ticker::every(config.spawn_interval())
                .named("spawn")
                .with_policy(policy),
            grace: Ticker::once(config.finale_grace()).named("grace"),
        }
    }

    /// Cancels every timer. Idempotent.
    fn cancel_all(&mut self) {
        self.matchmaking.cancel();
        self.countdown.cancel();
        self.round.cancel();
        self.spawn.cancel();
        self.grace.cancel();
    }

    fn armed(&self) -> usize {
        [
            &self.matchmaking,
            &self.countdown,
            &self.round,
            &self.spawn,
            &self.grace,
        ]
        .into_iter()
        .filter(|t| t.is_armed())
        .count()
    }
}

/// What woke the actor up.
enum Wake {
    Command(RoomCommand),
    Closed,
    Matchmaking,
    Countdown,
    Round,
    Spawn,
    Grace,
}

// ---------------------------------------------------------------------------
// RoomActor
// ---------------------------------------------------------------------------

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    room: Room,
    config: RoomConfig,
    timers: Timers,
    /// Next number of the pre-game sequence.
    countdown_left: u32,
    /// Round seconds left.
    game_time: u32,
    spawner: Spawner,
    rng: StdRng,
    registry: Arc<ClientRegistry>,
    lobby: Arc<LobbyBoard>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    /// Runs the actor loop until shutdown or until every handle is dropped.
    async fn run(mut self) {
        info!(room_id = %self.room.id(), "room actor started");

        loop {
            // Commands win ties, so a join that fills the room is seen
            // before a matchmaking tick due at the same instant.
            let wake = tokio::select! {
                biased;
                cmd = self.receiver.recv() => match cmd {
                    Some(cmd) => Wake::Command(cmd),
                    None => Wake::Closed,
                },
                _ = self.timers.matchmaking.wait_for_tick() => Wake::Matchmaking,
                _ = self.timers.countdown.wait_for_tick() => Wake::Countdown,
                _ = self.timers.round.wait_for_tick() => Wake::Round,
                _ = self.timers.spawn.wait_for_tick() => Wake::Spawn,
                _ = self.timers.grace.wait_for_tick() => Wake::Grace,
            };

            match wake {
                Wake::Command(RoomCommand::Join { player_id, reply }) => {
                    let result = self.handle_join(player_id).await;
                    let _ = reply.send(result);
                }
                Wake::Command(RoomCommand::Leave { player_id, reply }) => {
                    let result = self.handle_leave(player_id).await;
                    let _ = reply.send(result);
                }
                Wake::Command(RoomCommand::Score { player_id, points }) => {
                    if let Err(err) = self.handle_score(player_id, points).await {
                        debug!(room_id = %self.room.id(), %player_id, %err, "score ignored");
                    }
                }
                Wake::Command(RoomCommand::EnemyKilled { player_id, enemy_id }) => {
                    self.handle_enemy_killed(player_id, enemy_id).await;
                }
                Wake::Command(RoomCommand::GetSnapshot { reply }) => {
                    let _ = reply.send(self.room.snapshot());
                }
                Wake::Command(RoomCommand::GetInfo { reply }) => {
                    let _ = reply.send(self.info());
                }
                Wake::Command(RoomCommand::Shutdown) | Wake::Closed => {
                    info!(room_id = %self.room.id(), "room shutting down");
                    self.reset().await;
                    break;
                }
                Wake::Matchmaking => self.on_matchmaking_tick().await,
                Wake::Countdown => self.on_countdown_tick().await,
                Wake::Round => self.on_round_tick().await,
                Wake::Spawn => self.on_spawn_tick().await,
                Wake::Grace => self.on_grace_elapsed().await,
            }
        }

        info!(room_id = %self.room.id(), "room actor stopped");
    }

    // -- Commands ---------------------------------------------------------

    async fn handle_join(&mut self, player_id: PlayerId) -> Result<(), RoomError> {
        let room_id = self.room.id();
        let role = self.room.seat(player_id)?;
        if let Err(err) = self.registry.join_group(player_id, room_id).await {
            let _ = self.room.unseat(player_id);
            return Err(err.into());
        }

        info!(
            %room_id,
            %player_id,
            %role,
            players = self.room.len(),
            "player joined"
        );

        if self.room.phase() == Phase::Idle {
            self.room.restart_timer();
            self.enter(Phase::Matchmaking);
            self.timers.matchmaking.start();
            info!(%room_id, secs = self.room.timer(), "matchmaking started");
        }

        self.sync_lobby(true).await;
        self.emit(ServerEvent::RoomState(self.room.snapshot())).await;

        if self.room.is_full() {
            self.begin_countdown().await;
        }
        Ok(())
    }

    async fn handle_leave(&mut self, player_id: PlayerId) -> Result<(), RoomError> {
        let room_id = self.room.id();
        self.room.unseat(player_id)?;
        self.registry.leave_group(player_id, room_id).await;

        info!(
            %room_id,
            %player_id,
            players = self.room.len(),
            phase = %self.room.phase(),
            "player left"
        );

        if self.room.is_empty() {
            self.reset().await;
        }

        self.sync_lobby(true).await;
        if !self.room.is_empty() {
            self.emit(ServerEvent::RoomState(self.room.snapshot())).await;
        }
        Ok(())
    }

    async fn handle_score(&mut self, player_id: PlayerId, points: u32) -> Result<(), RoomError> {
        let total = self.room.add_score(player_id, points)?;
        trace!(room_id = %self.room.id(), %player_id, points, total, "score");
        self.emit(ServerEvent::ScoreUpdate(self.room.players().to_vec()))
            .await;
        Ok(())
    }

    async fn handle_enemy_killed(&self, player_id: PlayerId, enemy_id: String) {
        trace!(room_id = %self.room.id(), %player_id, %enemy_id, "enemy killed");
        self.emit(ServerEvent::EnemyDestroyed {
            enemy_id,
            killer_id: player_id,
        })
        .await;
    }

    // -- Timers -----------------------------------------------------------

    async fn on_matchmaking_tick(&mut self) {
        if self.room.phase() != Phase::Matchmaking {
            self.timers.matchmaking.cancel();
            return;
        }
        if self.room.is_full() {
            self.begin_countdown().await;
            return;
        }

        let left = self.room.tick_timer();
        trace!(room_id = %self.room.id(), left, "matchmaking tick");
        self.emit(ServerEvent::TimerUpdate(left)).await;
        self.sync_lobby(left % self.config.lobby_heartbeat_every == 0)
            .await;

        if left == 0 {
            self.begin_countdown().await;
        }
    }

    async fn begin_countdown(&mut self) {
        self.timers.matchmaking.cancel();
        if !self.enter(Phase::Countdown) {
            return;
        }
        info!(
            room_id = %self.room.id(),
            players = self.room.len(),
            "countdown started"
        );

        self.sync_lobby(true).await;
        self.countdown_left = self.config.countdown_from;
        self.emit(ServerEvent::StartSequence(StartSignal::Count(self.countdown_left)))
            .await;
        self.timers.countdown.start();
    }

    async fn on_countdown_tick(&mut self) {
        self.countdown_left = self.countdown_left.saturating_sub(1);
        if self.countdown_left > 0 {
            self.emit(ServerEvent::StartSequence(StartSignal::Count(self.countdown_left)))
                .await;
            return;
        }

        self.timers.countdown.cancel();
        self.emit(ServerEvent::StartSequence(StartSignal::Go)).await;
        self.start_round().await;
    }

    async fn start_round(&mut self) {
        if !self.enter(Phase::Round) {
            return;
        }
        info!(
            room_id = %self.room.id(),
            players = self.room.len(),
            secs = self.config.round_secs,
            "round started"
        );

        self.emit(ServerEvent::GameStart(self.room.players().to_vec()))
            .await;
        self.game_time = self.config.round_secs;
        self.timers.round.start();
        self.timers.spawn.start();
    }

    async fn on_round_tick(&mut self) {
        self.game_time = self.game_time.saturating_sub(1);
        self.emit(ServerEvent::GametimeUpdate(self.game_time)).await;
        if self.game_time == 0 {
            self.end_round().await;
        }
    }

    async fn on_spawn_tick(&mut self) {
        let enemy = self.spawner.spawn(&mut self.rng);
        trace!(room_id = %self.room.id(), enemy_id = %enemy.id, "spawn");
        self.emit(ServerEvent::SpawnEnemy(enemy)).await;
    }

    async fn end_round(&mut self) {
        self.timers.round.cancel();
        self.timers.spawn.cancel();
        self.emit(ServerEvent::GameOver(self.room.players().to_vec()))
            .await;
        if !self.enter(Phase::Finale) {
            return;
        }
        self.timers.grace.start();

        let top = self.room.players().iter().map(|p| p.score).max();
        info!(room_id = %self.room.id(), top_score = ?top, "game over");
    }

    async fn on_grace_elapsed(&mut self) {
        self.reset().await;
        self.sync_lobby(true).await;
    }

    // -- Helpers ----------------------------------------------------------

    /// Cancels every timer, unseats everyone and returns to `Idle`.
    async fn reset(&mut self) {
        self.timers.cancel_all();
        let room_id = self.room.id();
        for player in self.room.reset() {
            self.registry.leave_group(player.id, room_id).await;
        }
        self.countdown_left = 0;
        self.game_time = 0;
        info!(%room_id, "room reset");
    }

    /// Moves the room to `phase`. Returns `false` (and logs) on an invalid
    /// transition.
    fn enter(&mut self, phase: Phase) -> bool {
        let from = self.room.phase();
        match self.room.advance(phase) {
            Ok(()) => {
                debug!(room_id = %self.room.id(), %from, to = %phase, "phase changed");
                true
            }
            Err(err) => {
                warn!(room_id = %self.room.id(), %err, "phase change refused");
                false
            }
        }
    }

    async fn emit(&self, event: ServerEvent) {
        self.registry.emit_to_group(self.room.id(), event).await;
    }

    /// Records this room on the lobby board, and pushes the board to every
    /// client if `publish` is set.
    async fn sync_lobby(&self, publish: bool) {
        self.lobby.record(self.room.lobby_entry()).await;
        if publish {
            self.lobby.publish().await;
        }
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            room_id: self.room.id(),
            phase: self.room.phase(),
            player_count: self.room.len(),
            max_players: self.room.max_players(),
            armed_timers: self.timers.armed(),
        }
    }
}

/// Spawns a room actor task and returns a handle to it.
///
/// `channel_size` bounds the command queue; callers wait when it is full.
pub(crate) fn spawn_room(
    room_id: RoomId,
    config: RoomConfig,
    registry: Arc<ClientRegistry>,
    lobby: Arc<LobbyBoard>,
    channel_size: usize,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = RoomActor {
        room: Room::new(room_id, &config),
        timers: Timers::new(&config),
        config,
        countdown_left: 0,
        game_time: 0,
        spawner: Spawner::new(),
        rng: StdRng::from_os_rng(),
        registry,
        lobby,
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle {
        room_id,
        sender: tx,
    }
}
