//! The room pool: a fixed set of rooms, routed to by id.

use std::collections::BTreeMap;
use std::sync::Arc;

use glyphfall_protocol::{LobbyEntry, PlayerId, RoomId, RoomSnapshot};
use glyphfall_session::ClientRegistry;

use crate::actor::spawn_room;
use crate::{LobbyBoard, Room, RoomConfig, RoomError, RoomHandle, RoomInfo};

/// Default command channel size for room actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// All rooms of the server, numbered `1..=room_count`.
///
/// The set of rooms is fixed when the pool is spawned, so the pool itself is
/// immutable and can be shared behind a plain `Arc`. Which player sits
/// where is tracked by the [`ClientRegistry`]; the pool only validates ids
/// and forwards to the right actor.
pub struct RoomPool {
    rooms: BTreeMap<RoomId, RoomHandle>,
    registry: Arc<ClientRegistry>,
    lobby: Arc<LobbyBoard>,
}

impl RoomPool {
    /// Starts one actor per room and records every room on the lobby board.
    pub async fn spawn(
        room_count: u32,
        config: RoomConfig,
        registry: Arc<ClientRegistry>,
        lobby: Arc<LobbyBoard>,
    ) -> Self {
        let config = config.validated();
        let mut rooms = BTreeMap::new();

        for n in 1..=room_count {
            let room_id = RoomId(n);
            lobby.record(Room::new(room_id, &config).lobby_entry()).await;
            let handle = spawn_room(
                room_id,
                config.clone(),
                Arc::clone(&registry),
                Arc::clone(&lobby),
                DEFAULT_CHANNEL_SIZE,
            );
            rooms.insert(room_id, handle);
        }

        tracing::info!(rooms = rooms.len(), max_players = config.max_players, "room pool started");

        Self {
            rooms,
            registry,
            lobby,
        }
    }

    fn room(&self, room_id: RoomId) -> Result<&RoomHandle, RoomError> {
        self.rooms.get(&room_id).ok_or(RoomError::NotFound(room_id))
    }

    /// Seats a player in a room.
    ///
    /// A player can sit in at most one room at a time.
    pub async fn join(&self, player_id: PlayerId, room_id: RoomId) -> Result<(), RoomError> {
        let handle = self.room(room_id)?;
        if let Some(current) = self.registry.seat_of(player_id).await {
            if current != room_id {
                return Err(RoomError::AlreadySeated(player_id, current));
            }
        }
        handle.join(player_id).await
    }

    /// Unseats a player from a room.
    pub async fn leave(&self, player_id: PlayerId, room_id: RoomId) -> Result<(), RoomError> {
        self.room(room_id)?.leave(player_id).await
    }

    /// Unseats a player from whatever room they sit in. Returns the room
    /// they left, if any.
    pub async fn disconnect(&self, player_id: PlayerId) -> Option<RoomId> {
        let room_id = self.registry.seat_of(player_id).await?;
        match self.leave(player_id, room_id).await {
            Ok(()) => Some(room_id),
            Err(err) => {
                tracing::debug!(%player_id, %room_id, %err, "disconnect cleanup skipped");
                None
            }
        }
    }

    /// Forwards a score report to a room.
    pub async fn report_score(
        &self,
        player_id: PlayerId,
        room_id: RoomId,
        points: u32,
    ) -> Result<(), RoomError> {
        self.room(room_id)?.report_score(player_id, points).await
    }

    /// Forwards a hit report to a room.
    pub async fn enemy_killed(
        &self,
        player_id: PlayerId,
        room_id: RoomId,
        enemy_id: String,
    ) -> Result<(), RoomError> {
        self.room(room_id)?.enemy_killed(player_id, enemy_id).await
    }

    /// The member view of a room.
    pub async fn snapshot(&self, room_id: RoomId) -> Result<RoomSnapshot, RoomError> {
        self.room(room_id)?.snapshot().await
    }

    /// Diagnostic info about a room.
    pub async fn info(&self, room_id: RoomId) -> Result<RoomInfo, RoomError> {
        self.room(room_id)?.info().await
    }

    /// The current lobby summary.
    pub async fn lobby(&self) -> Vec<LobbyEntry> {
        self.lobby.entries().await
    }

    /// The board rooms publish to.
    pub fn lobby_board(&self) -> &Arc<LobbyBoard> {
        &self.lobby
    }

    /// All room ids, ascending.
    pub fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Stops every room actor.
    pub async fn shutdown(&self) {
        for handle in self.rooms.values() {
            let _ = handle.shutdown().await;
        }
        tracing::info!(rooms = self.rooms.len(), "room pool shut down");
    }
}
