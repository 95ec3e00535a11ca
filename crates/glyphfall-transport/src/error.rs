use std::net::SocketAddr;

/// Socket-level failures.
///
/// Everything a peer can cause is reported as a string so this type does
/// not leak the WebSocket library into the crates above it.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The listener could not be bound.
    #[error("cannot listen on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The listener failed to hand out a TCP stream.
    #[error("accept failed: {0}")]
    Accept(#[source] std::io::Error),

    /// A TCP peer connected but never completed the WebSocket upgrade.
    #[error("handshake with {peer} failed: {reason}")]
    Handshake { peer: SocketAddr, reason: String },

    /// The socket is already closed.
    #[error("connection closed")]
    Closed,

    /// Writing a frame failed.
    #[error("send failed: {0}")]
    Send(String),

    /// Reading a frame failed.
    #[error("receive failed: {0}")]
    Receive(String),
}
