//! `GlyphfallServer` builder and server loop.
//!
//! This is the entry point for running a Glyphfall server. It ties together
//! all the layers: transport → protocol → session → room.

use std::sync::Arc;
use std::time::Duration;

use glyphfall_protocol::{Codec, JsonCodec};
use glyphfall_room::{LobbyBoard, RoomConfig, RoomPool};
use glyphfall_session::ClientRegistry;
use glyphfall_transport::{DEFAULT_HANDSHAKE_TIMEOUT, Transport, Upgrade, WebSocketTransport};

use crate::GlyphfallError;
use crate::handler::handle_connection;

/// Number of rooms a server starts with unless told otherwise.
pub const DEFAULT_ROOM_COUNT: u32 = 10;

/// Shared server state passed to each connection handler task.
///
/// Nothing in here needs a lock at this level: the registry and lobby
/// board lock internally, and the pool is a fixed set of actor handles.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) registry: Arc<ClientRegistry>,
    pub(crate) pool: RoomPool,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a Glyphfall server.
///
/// # Example
///
/// ```rust,no_run
/// use glyphfall::prelude::*;
///
/// # async fn run() -> Result<(), GlyphfallError> {
/// let server = GlyphfallServer::builder()
///     .bind("0.0.0.0:3000")
///     .rooms(10)
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct GlyphfallServerBuilder {
    bind_addr: String,
    room_count: u32,
    room_config: RoomConfig,
    handshake_timeout: Duration,
}

impl GlyphfallServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            room_count: DEFAULT_ROOM_COUNT,
            room_config: RoomConfig::default(),
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets how many rooms the pool holds.
    pub fn rooms(mut self, count: u32) -> Self {
        self.room_count = count;
        self
    }

    /// Sets the capacity and timing every room uses.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Sets how long a peer may take to finish its WebSocket upgrade.
    pub fn handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    /// Binds the listener and starts the room pool.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`.
    pub async fn build(self) -> Result<GlyphfallServer<JsonCodec>, GlyphfallError> {
        let transport = WebSocketTransport::bind(&self.bind_addr)
            .await?
            .with_handshake_timeout(self.handshake_timeout);

        let registry = Arc::new(ClientRegistry::new());
        let lobby = Arc::new(LobbyBoard::new(Arc::clone(&registry)));
        let pool = RoomPool::spawn(
            self.room_count,
            self.room_config,
            Arc::clone(&registry),
            lobby,
        )
        .await;

        let state = Arc::new(ServerState {
            registry,
            pool,
            codec: JsonCodec,
        });

        Ok(GlyphfallServer { transport, state })
    }
}

impl Default for GlyphfallServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Glyphfall server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct GlyphfallServer<C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl GlyphfallServer<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> GlyphfallServerBuilder {
        GlyphfallServerBuilder::new()
    }
}

impl<C: Codec> GlyphfallServer<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Number of rooms in the pool.
    pub fn room_count(&self) -> usize {
        self.state.pool.len()
    }

    /// Runs the server accept loop.
    ///
    /// Each accepted peer gets its own task, which runs the upgrade and then
    /// the connection handler. Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), GlyphfallError> {
        tracing::info!(
            addr = ?self.transport.local_addr().ok(),
            rooms = self.state.pool.len(),
            "Glyphfall server running"
        );

        loop {
            match self.transport.accept().await {
                Ok(pending) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        let peer = pending.peer_addr();
                        let conn = match pending.complete().await {
                            Ok(conn) => conn,
                            Err(e) => {
                                tracing::debug!(%peer, error = %e, "upgrade failed");
                                return;
                            }
                        };
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
