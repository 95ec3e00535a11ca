//! Wire protocol for Glyphfall.
//!
//! This crate defines what clients and the server say to each other:
//!
//! - **Types** ([`ClientEvent`], [`ServerEvent`], [`LobbyEntry`],
//!   [`RoomSnapshot`], [`Player`], [`Enemy`], …): the values that travel
//!   on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those values become
//!   frame bytes.
//! - **Errors** ([`ProtocolError`]).
//!
//! Every frame is `{"event": "<name>", "data": <payload>}`.
//!
//! ```text
//! Transport (frames) → Protocol (events) → Session (who gets them)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ClientEvent, Enemy, LobbyEntry, Player, PlayerId, Role, RoomId, RoomSnapshot, RoomStatus,
    ServerEvent, StartSignal,
};
