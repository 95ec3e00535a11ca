//! The room model: seats, phase, timer and scores, with no I/O.
//!
//! The actor owns one [`Room`] and drives it from commands and timers; all
//! rules about who may sit where live here so they can be tested without a
//! runtime.

use glyphfall_protocol::{LobbyEntry, Player, PlayerId, Role, RoomId, RoomSnapshot};

use crate::{Phase, RoomConfig, RoomError};

/// One room of the pool.
#[derive(Debug, Clone)]
pub struct Room {
    id: RoomId,
    phase: Phase,
    /// Join order. A player's role is fixed when they sit down.
    players: Vec<Player>,
    /// Matchmaking seconds left. Stale outside matchmaking.
    timer: u32,
    max_players: usize,
    matchmaking_secs: u32,
}

impl Room {
    /// An empty, idle room.
    pub fn new(id: RoomId, config: &RoomConfig) -> Self {
        Self {
            id,
            phase: Phase::Idle,
            players: Vec::with_capacity(config.max_players),
            timer: config.matchmaking_secs,
            max_players: config.max_players,
            matchmaking_secs: config.matchmaking_secs,
        }
    }

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn timer(&self) -> u32 {
        self.timer
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= self.max_players
    }

    pub fn max_players(&self) -> usize {
        self.max_players
    }

    pub fn contains(&self, player_id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == player_id)
    }

    /// Seats a player and returns the role they got.
    ///
    /// The role is the first one no current member holds, so roles stay
    /// unique even when someone left before the room filled.
    ///
    /// # Errors
    /// - [`RoomError::InvalidState`] if the room is past matchmaking.
    /// - [`RoomError::AlreadyInRoom`] if the player is already seated.
    /// - [`RoomError::RoomFull`] if every seat is taken.
    pub fn seat(&mut self, player_id: PlayerId) -> Result<Role, RoomError> {
        if !self.phase.is_joinable() {
            return Err(self.invalid_state("join"));
        }
        if self.contains(player_id) {
            return Err(RoomError::AlreadyInRoom(player_id, self.id));
        }
        if self.is_full() {
            return Err(RoomError::RoomFull(self.id));
        }

        let role = Role::ALL
            .into_iter()
            .find(|role| self.players.iter().all(|p| p.role != *role))
            .ok_or(RoomError::RoomFull(self.id))?;
        self.players.push(Player::new(player_id, role));
        Ok(role)
    }

    /// Removes a player from their seat.
    ///
    /// # Errors
    /// Returns [`RoomError::NotInRoom`] if the player is not seated here.
    pub fn unseat(&mut self, player_id: PlayerId) -> Result<Player, RoomError> {
        let index = self
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or(RoomError::NotInRoom(player_id, self.id))?;
        Ok(self.players.remove(index))
    }

    /// Adds `points` to a member's score.
    ///
    /// # Errors
    /// - [`RoomError::InvalidState`] outside a round.
    /// - [`RoomError::NotInRoom`] if the player is not seated here.
    pub fn add_score(&mut self, player_id: PlayerId, points: u32) -> Result<u32, RoomError> {
        if !self.phase.accepts_scores() {
            return Err(self.invalid_state("score"));
        }
        let room_id = self.id;
        let player = self
            .players
            .iter_mut()
            .find(|p| p.id == player_id)
            .ok_or(RoomError::NotInRoom(player_id, room_id))?;
        player.score = player.score.saturating_add(points);
        Ok(player.score)
    }

    /// Moves to `target`.
    ///
    /// # Errors
    /// Returns [`RoomError::InvalidState`] if the move skips a phase.
    pub fn advance(&mut self, target: Phase) -> Result<(), RoomError> {
        if !self.phase.can_transition_to(target) {
            return Err(self.invalid_state("advance"));
        }
        self.phase = target;
        Ok(())
    }

    /// Starts a fresh matchmaking countdown.
    pub fn restart_timer(&mut self) {
        self.timer = self.matchmaking_secs;
    }

    /// Counts the matchmaking timer down by one and returns what is left.
    pub fn tick_timer(&mut self) -> u32 {
        self.timer = self.timer.saturating_sub(1);
        self.timer
    }

    /// Clears every seat and returns the room to `Idle` with a full timer.
    /// Returns the players that were seated.
    pub fn reset(&mut self) -> Vec<Player> {
        self.phase = Phase::Idle;
        self.timer = self.matchmaking_secs;
        std::mem::take(&mut self.players)
    }

    /// The lobby view of this room.
    pub fn lobby_entry(&self) -> LobbyEntry {
        LobbyEntry {
            id: self.id,
            count: self.players.len(),
            status: self.phase.status(),
            time_left: self.timer,
        }
    }

    /// The member view of this room.
    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            id: self.id,
            players: self.players.clone(),
            status: self.phase.status(),
            timer: self.timer,
        }
    }

    fn invalid_state(&self, action: &'static str) -> RoomError {
        RoomError::InvalidState {
            room_id: self.id,
            phase: self.phase,
            action,
        }
    }
}
