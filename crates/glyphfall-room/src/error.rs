//! Error types for the room layer.

use glyphfall_protocol::{PlayerId, RoomId};
use glyphfall_session::SessionError;

use crate::Phase;

/// Errors that can occur during room operations.
///
/// Clients never see these: the connection handler logs them and moves on.
/// They exist so callers and tests can tell why an action was ignored.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// No room in the pool has this id.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// Every seat is taken.
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// The player is already seated in this room.
    #[error("player {0} already in room {1}")]
    AlreadyInRoom(PlayerId, RoomId),

    /// The player is seated in a different room.
    #[error("player {0} is already seated in room {1}")]
    AlreadySeated(PlayerId, RoomId),

    /// The player is not seated in this room.
    #[error("player {0} not in room {1}")]
    NotInRoom(PlayerId, RoomId),

    /// The room's phase does not allow this operation, e.g. joining
    /// mid-round or scoring during the countdown.
    #[error("room {room_id} cannot {action} while {phase}")]
    InvalidState {
        room_id: RoomId,
        phase: Phase,
        action: &'static str,
    },

    /// The room's actor has stopped.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),

    /// The connection registry rejected the operation.
    #[error(transparent)]
    Session(#[from] SessionError),
}
