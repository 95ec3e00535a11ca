//! The client registry: every open connection and the room group it sits in.
//!
//! Each connection task registers an [`EventSender`] when the socket is
//! accepted and a writer task drains the matching receiver into the socket.
//! Sending never blocks and never fails loudly: if a client's writer is
//! gone, the event is dropped and the disconnect path cleans up shortly
//! after.
//!
//! # Concurrency note
//!
//! Unlike the per-room state, the registry is shared by every room actor
//! and every connection task, so it lives behind a `tokio::sync::RwLock`.
//! Broadcasts take the read lock; only register/unregister and seat
//! changes take the write lock.

use std::collections::HashMap;

use glyphfall_protocol::{PlayerId, RoomId, ServerEvent};
use tokio::sync::{RwLock, mpsc};

use crate::SessionError;

/// Outbound queue for one client.
pub type EventSender = mpsc::UnboundedSender<ServerEvent>;

struct Client {
    sender: EventSender,
    room: Option<RoomId>,
}

/// All connected clients, keyed by player id.
#[derive(Default)]
pub struct ClientRegistry {
    clients: RwLock<HashMap<PlayerId, Client>>,
}

impl ClientRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a newly connected client.
    ///
    /// # Errors
    /// Returns [`SessionError::AlreadyRegistered`] if the id is taken.
    pub async fn register(
        &self,
        player_id: PlayerId,
        sender: EventSender,
    ) -> Result<(), SessionError> {
        let mut clients = self.clients.write().await;
        if clients.contains_key(&player_id) {
            return Err(SessionError::AlreadyRegistered(player_id));
        }
        clients.insert(player_id, Client { sender, room: None });
        tracing::debug!(%player_id, connected = clients.len(), "client registered");
        Ok(())
    }

    /// Removes a client. Returns the room it was still grouped into, if any.
    pub async fn unregister(&self, player_id: PlayerId) -> Option<RoomId> {
        let mut clients = self.clients.write().await;
        let removed = clients.remove(&player_id)?;
        tracing::debug!(%player_id, connected = clients.len(), "client unregistered");
        removed.room
    }

    /// Puts a client into a room's broadcast group.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] if the client is not registered.
    pub async fn join_group(&self, player_id: PlayerId, room_id: RoomId) -> Result<(), SessionError> {
        let mut clients = self.clients.write().await;
        let client = clients
            .get_mut(&player_id)
            .ok_or(SessionError::NotFound(player_id))?;
        client.room = Some(room_id);
        Ok(())
    }

    /// Takes a client out of `room_id`'s group.
    ///
    /// Does nothing if the client is unknown or grouped into another room,
    /// so a late cleanup from one room never clears a seat in the next.
    pub async fn leave_group(&self, player_id: PlayerId, room_id: RoomId) {
        let mut clients = self.clients.write().await;
        if let Some(client) = clients.get_mut(&player_id) {
            if client.room == Some(room_id) {
                client.room = None;
            }
        }
    }

    /// The room group a client is in, if any.
    pub async fn seat_of(&self, player_id: PlayerId) -> Option<RoomId> {
        self.clients
            .read()
            .await
            .get(&player_id)
            .and_then(|client| client.room)
    }

    /// Whether a client is registered.
    pub async fn contains(&self, player_id: PlayerId) -> bool {
        self.clients.read().await.contains_key(&player_id)
    }

    /// Number of registered clients.
    pub async fn len(&self) -> usize {
        self.clients.read().await.len()
    }

    /// Whether no clients are registered.
    pub async fn is_empty(&self) -> bool {
        self.clients.read().await.is_empty()
    }

    /// Sends an event to one client.
    pub async fn send_to(&self, player_id: PlayerId, event: ServerEvent) {
        let clients = self.clients.read().await;
        if let Some(client) = clients.get(&player_id) {
            deliver(player_id, &client.sender, event);
        }
    }

    /// Sends an event to every client grouped into `room_id`.
    pub async fn emit_to_group(&self, room_id: RoomId, event: ServerEvent) {
        let clients = self.clients.read().await;
        for (&player_id, client) in clients.iter() {
            if client.room == Some(room_id) {
                deliver(player_id, &client.sender, event.clone());
            }
        }
    }

    /// Sends an event to every registered client.
    pub async fn emit_to_all(&self, event: ServerEvent) {
        let clients = self.clients.read().await;
        for (&player_id, client) in clients.iter() {
            deliver(player_id, &client.sender, event.clone());
        }
    }
}

fn deliver(player_id: PlayerId, sender: &EventSender, event: ServerEvent) {
    if sender.send(event).is_err() {
        tracing::trace!(%player_id, "dropping event for closed client");
    }
}
