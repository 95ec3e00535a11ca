//! Connected-client tracking for Glyphfall.
//!
//! The session layer knows two things about every open connection: how to
//! reach it (an outbound event queue) and which room group, if any, it
//! belongs to. Rooms use the [`ClientRegistry`] to fan events out to their
//! members, and the lobby uses it to reach everyone.
//!
//! # How it fits in the stack
//!
//! ```text
//! Room Layer (above)  ← emits to groups and to everyone
//!     ↕
//! Session Layer (this crate)  ← who is connected, who sits where
//!     ↕
//! Protocol Layer (below)  ← provides PlayerId, RoomId, ServerEvent
//! ```

mod error;
mod registry;

pub use error::SessionError;
pub use registry::{ClientRegistry, EventSender};
