//! Room pool, matchmaking and round lifecycle for Glyphfall.
//!
//! Each room runs as an isolated Tokio task (actor model) that owns its
//! seats, its phase and all of its timers.
//!
//! # Key types
//!
//! - [`RoomPool`]: the fixed set of rooms; validates ids and routes actions
//! - [`RoomHandle`]: send commands to a running room actor
//! - [`Room`]: the pure room model (seats, roles, scores, projections)
//! - [`Phase`]: lifecycle state machine
//! - [`RoomConfig`]: capacity and timing
//! - [`LobbyBoard`]: the public summary every client sees
//! - [`Spawner`]: enemy generator used during rounds

mod actor;
mod config;
mod error;
mod lobby;
mod manager;
mod room;
mod spawn;

pub use actor::{RoomHandle, RoomInfo};
pub use config::{Phase, RoomConfig};
pub use error::RoomError;
pub use lobby::LobbyBoard;
pub use manager::RoomPool;
pub use room::Room;
pub use spawn::{Edge, GLYPHS, Spawner};
