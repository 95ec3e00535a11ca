//! Unified error type for the Glyphfall server.

use glyphfall_protocol::ProtocolError;
use glyphfall_room::RoomError;
use glyphfall_session::SessionError;
use glyphfall_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant generates the `From` impls, so
/// `?` converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum GlyphfallError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A registry error (duplicate or unknown client).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A room-level error (unknown room, full, wrong phase).
    #[error(transparent)]
    Room(#[from] RoomError),
}
