//! # Glyphfall
//!
//! Room-based matchmaking and round server for a small real-time arcade
//! game.
//!
//! A Glyphfall server holds a fixed pool of rooms. Clients connect over
//! WebSocket, watch the lobby, and take one of four elemental seats in a
//! room. A room counts down while it fills, plays a `3, 2, 1, GO!`
//! sequence, runs a timed round with a stream of enemies, collects scores,
//! and resets itself.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use glyphfall::prelude::*;
//!
//! # async fn run() -> Result<(), GlyphfallError> {
//! let server = GlyphfallServer::builder()
//!     .bind("0.0.0.0:3000")
//!     .room_config(RoomConfig {
//!         round_secs: 90,
//!         ..RoomConfig::default()
//!     })
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::GlyphfallError;
pub use server::{DEFAULT_ROOM_COUNT, GlyphfallServer, GlyphfallServerBuilder};

pub use glyphfall_protocol as protocol;
pub use glyphfall_room as room;
pub use glyphfall_session as session;
pub use glyphfall_tick as tick;
pub use glyphfall_transport as transport;

/// Everything needed to run a server and talk to it.
pub mod prelude {
    pub use crate::{DEFAULT_ROOM_COUNT, GlyphfallError, GlyphfallServer, GlyphfallServerBuilder};
    pub use glyphfall_protocol::{
        ClientEvent, Codec, Enemy, JsonCodec, LobbyEntry, Player, PlayerId, ProtocolError, Role,
        RoomId, RoomSnapshot, RoomStatus, ServerEvent, StartSignal,
    };
    pub use glyphfall_room::{Phase, RoomConfig, RoomError};
    pub use glyphfall_session::SessionError;
    pub use glyphfall_tick::TickPolicy;
    pub use glyphfall_transport::TransportError;
}
