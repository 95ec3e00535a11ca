//! Socket layer for Glyphfall.
//!
//! The server loop only sees the [`Transport`] and [`Connection`] traits.
//! [`WebSocketTransport`] is the implementation browsers talk to.
//!
//! # Feature Flags
//!
//! - `websocket` (default): WebSocket transport via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{
    DEFAULT_HANDSHAKE_TIMEOUT, PendingWebSocket, WebSocketConnection, WebSocketTransport,
};

use std::fmt;
use std::net::SocketAddr;

/// Identifies an accepted socket within one listener.
///
/// Ids are handed out in accept order starting at 1 and never reused, so
/// the server can use them directly as player ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// A listener that yields peers whose upgrade is still pending.
///
/// `accept` returns as soon as the peer is at the door. The upgrade runs
/// separately through [`Upgrade::complete`], so a peer that stalls its
/// handshake never holds up the accept loop.
pub trait Transport: Send + Sync + 'static {
    type Pending: Upgrade<Connection = Self::Connection, Error = Self::Error>;
    type Connection: Connection;
    type Error: std::error::Error + Send + Sync;

    /// Waits for the next peer.
    async fn accept(&mut self) -> Result<Self::Pending, Self::Error>;
}

/// An accepted peer that has not finished its handshake yet.
pub trait Upgrade: Send + 'static {
    type Connection: Connection;
    type Error: std::error::Error + Send + Sync;

    /// Runs the handshake, giving up after the transport's timeout.
    async fn complete(self) -> Result<Self::Connection, Self::Error>;

    fn id(&self) -> ConnectionId;

    fn peer_addr(&self) -> SocketAddr;
}

/// One upgraded socket.
///
/// `send` and `recv` take `&self` and must not block each other: room
/// broadcasts are written while the handler is parked on a read.
pub trait Connection: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync;

    /// Writes one frame.
    async fn send(&self, data: &[u8]) -> Result<(), Self::Error>;

    /// Reads the next data frame. `Ok(None)` means the peer closed.
    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Starts the closing handshake.
    async fn close(&self) -> Result<(), Self::Error>;

    fn id(&self) -> ConnectionId;

    fn peer_addr(&self) -> SocketAddr;
}
