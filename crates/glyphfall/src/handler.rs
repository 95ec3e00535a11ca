//! Per-connection handler: registration, event pumping and dispatch.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Register the client and send `connected` plus the lobby
//!   2. Spawn a writer task that drains the client's event queue into the
//!      socket
//!   3. Loop: receive frames → decode `ClientEvent` → dispatch to the pool
//!
//! Rejected actions (unknown room, full room, wrong phase) are only logged.
//! The client never gets an error frame.

use std::sync::Arc;

use glyphfall_protocol::{ClientEvent, Codec, PlayerId, ServerEvent};
use glyphfall_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::GlyphfallError;
use crate::server::ServerState;

/// Drop guard that unseats and unregisters a player when the handler exits.
///
/// Cleanup runs even if the handler returns early with an error. Since
/// `Drop` is synchronous, we spawn a fire-and-forget task for it.
struct DisconnectGuard<C: Codec> {
    player_id: PlayerId,
    state: Arc<ServerState<C>>,
}

impl<C: Codec> Drop for DisconnectGuard<C> {
    fn drop(&mut self) {
        let player_id = self.player_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let left = state.pool.disconnect(player_id).await;
            state.registry.unregister(player_id).await;
            tracing::info!(%player_id, left_room = ?left, "player disconnected");
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), GlyphfallError> {
    let conn = Arc::new(conn);
    let conn_id = conn.id();
    let player_id = PlayerId(conn_id.into_inner());

    let (tx, rx) = mpsc::unbounded_channel();
    state.registry.register(player_id, tx).await?;
    let _guard = DisconnectGuard {
        player_id,
        state: Arc::clone(&state),
    };
    tracing::info!(%conn_id, %player_id, peer = %conn.peer_addr(), "player connected");

    state
        .registry
        .send_to(player_id, ServerEvent::Connected { id: player_id })
        .await;
    state.pool.lobby_board().greet(player_id).await;

    let writer = tokio::spawn(write_events(Arc::clone(&conn), Arc::clone(&state), rx));

    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%player_id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "recv error");
                break;
            }
        };

        let event: ClientEvent = match state.codec.decode(&data) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "failed to decode client event");
                continue;
            }
        };

        dispatch(&state, player_id, event).await;
    }

    writer.abort();
    if let Err(e) = conn.close().await {
        tracing::debug!(%player_id, error = %e, "close failed");
    }
    // _guard drops here → seat freed, client unregistered.
    Ok(())
}

/// Routes one client action to the room pool.
async fn dispatch<C: Codec>(state: &ServerState<C>, player_id: PlayerId, event: ClientEvent) {
    let result = match event {
        ClientEvent::JoinRoom(room_id) => state.pool.join(player_id, room_id).await,
        ClientEvent::LeaveRoom(room_id) => state.pool.leave(player_id, room_id).await,
        ClientEvent::PlayerScore { room_id, points } => {
            state.pool.report_score(player_id, room_id, points).await
        }
        ClientEvent::EnemyKilled { room_id, enemy_id } => {
            state.pool.enemy_killed(player_id, room_id, enemy_id).await
        }
    };

    if let Err(e) = result {
        tracing::debug!(%player_id, error = %e, "client action ignored");
    }
}

/// Pumps queued events into the socket until the queue closes or a send
/// fails.
async fn write_events<C: Codec>(
    conn: Arc<WebSocketConnection>,
    state: Arc<ServerState<C>>,
    mut rx: mpsc::UnboundedReceiver<ServerEvent>,
) {
    let player_id = PlayerId(conn.id().into_inner());

    while let Some(event) = rx.recv().await {
        let bytes = match state.codec.encode(&event) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(%player_id, event = event.name(), error = %e, "failed to encode event");
                continue;
            }
        };
        if let Err(e) = conn.send(&bytes).await {
            tracing::debug!(%player_id, error = %e, "send failed, stopping writer");
            break;
        }
    }
}
