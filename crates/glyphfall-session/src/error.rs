//! Error types for the session layer.

use glyphfall_protocol::PlayerId;

/// Errors that can occur while tracking connected clients.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No client is registered under this id. Either it never connected or
    /// it has already been unregistered.
    #[error("no client registered for player {0}")]
    NotFound(PlayerId),

    /// A client with this id is already registered. Ids come from the
    /// transport and are never reused, so this points at a wiring bug.
    #[error("player {0} is already registered")]
    AlreadyRegistered(PlayerId),
}
