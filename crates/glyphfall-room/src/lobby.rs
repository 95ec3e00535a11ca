//! The lobby board: the public summary of every room.
//!
//! Rooms never ask each other for state. Instead each room actor records
//! its own [`LobbyEntry`] here whenever it changes, and publishing reads
//! the board as a whole. Entries carry counts and status only, never
//! player identities.

use std::sync::Arc;

use glyphfall_protocol::{LobbyEntry, PlayerId, ServerEvent};
use glyphfall_session::ClientRegistry;
use tokio::sync::RwLock;

/// Latest lobby entry of every room, ordered by room id.
pub struct LobbyBoard {
    entries: RwLock<Vec<LobbyEntry>>,
    registry: Arc<ClientRegistry>,
}

impl LobbyBoard {
    pub fn new(registry: Arc<ClientRegistry>) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            registry,
        }
    }

    /// Stores a room's current entry, replacing the previous one.
    pub async fn record(&self, entry: LobbyEntry) {
        let mut entries = self.entries.write().await;
        match entries.binary_search_by_key(&entry.id, |e| e.id) {
            Ok(index) => entries[index] = entry,
            Err(index) => entries.insert(index, entry),
        }
    }

    /// A copy of the board.
    pub async fn entries(&self) -> Vec<LobbyEntry> {
        self.entries.read().await.clone()
    }

    /// Sends the board to every connected client.
    pub async fn publish(&self) {
        let entries = self.entries().await;
        tracing::trace!(rooms = entries.len(), "publishing lobby");
        self.registry.emit_to_all(ServerEvent::UpdateLobby(entries)).await;
    }

    /// Sends the board to one newly connected client.
    pub async fn greet(&self, player_id: PlayerId) {
        let entries = self.entries().await;
        self.registry
            .send_to(player_id, ServerEvent::UpdateLobby(entries))
            .await;
    }
}
