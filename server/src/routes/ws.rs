//! Websocket transport — framing, dispatch, and connection lifecycle.
//!
//! ARCHITECTURE
//! ============
//! Each connection gets a random `connection_id` and a bounded mpsc channel.
//! The registry holds the sender; the socket task drains the receiver. The
//! task selects between inbound frames and outbound events until the socket
//! closes, then leaves whatever room the connection had joined.
//!
//! `process_inbound_text` carries all dispatch decisions and is free of
//! socket I/O, so the interesting behavior is testable without a live
//! websocket. Events it produces (currently only `board-state` on join) go
//! back to the sending connection; everything else flows through the relay
//! to peers.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use protocol::{ClientEvent, ServerEvent};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::services::relay;
use crate::state::AppState;

/// Outbound buffer per connection. A client that falls this many events
/// behind starts missing frames (see the registry's `try_send` broadcast).
const OUTBOUND_BUFFER: usize = 256;

/// `GET /api/ws` — upgrade to the event channel.
pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(state, socket))
}

async fn run_ws(state: AppState, mut socket: WebSocket) {
    let connection_id = Uuid::new_v4();
    let (client_tx, mut client_rx) = mpsc::channel::<ServerEvent>(OUTBOUND_BUFFER);
    let mut current_room: Option<String> = None;

    info!(%connection_id, "websocket connected");

    'conn: loop {
        tokio::select! {
            inbound = socket.recv() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => {
                        let replies = process_inbound_text(
                            &state,
                            &mut current_room,
                            connection_id,
                            &client_tx,
                            text.as_str(),
                        )
                        .await;
                        for event in replies {
                            if send_event(&mut socket, &event).await.is_err() {
                                break 'conn;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {} // ping/pong/binary: ignored
                    Some(Err(e)) => {
                        debug!(%connection_id, error = %e, "websocket read error");
                        break;
                    }
                }
            }
            outbound = client_rx.recv() => {
                // The registry end of the channel is never dropped while the
                // connection is in a room, so None only happens at teardown.
                let Some(event) = outbound else { break };
                if send_event(&mut socket, &event).await.is_err() {
                    break;
                }
            }
        }
    }

    if let Some(room_id) = current_room {
        relay::leave_room(&state, &room_id, connection_id).await;
    }
    info!(%connection_id, "websocket disconnected");
}

/// Decode and dispatch one inbound text frame. Returns the events to send
/// back to this connection only.
///
/// Malformed frames are logged and dropped; one bad client must not take
/// down its own connection, let alone the room.
pub async fn process_inbound_text(
    state: &AppState,
    current_room: &mut Option<String>,
    connection_id: Uuid,
    client_tx: &mpsc::Sender<ServerEvent>,
    text: &str,
) -> Vec<ServerEvent> {
    let event: ClientEvent = match serde_json::from_str(text) {
        Ok(event) => event,
        Err(e) => {
            warn!(%connection_id, error = %e, "dropping malformed frame");
            return Vec::new();
        }
    };

    match event {
        ClientEvent::JoinRoom { room_id } => {
            // Re-joining moves the connection: leave the old room first so
            // its members get `user-left` and the stale cursor is dropped.
            if let Some(old_room) = current_room.take() {
                if old_room != room_id {
                    relay::leave_room(state, &old_room, connection_id).await;
                }
            }
            let elements =
                relay::join_room(state, &room_id, connection_id, client_tx.clone()).await;
            *current_room = Some(room_id);
            vec![ServerEvent::BoardState { elements }]
        }
        other => {
            relay::relay_event(state, connection_id, other).await;
            Vec::new()
        }
    }
}

/// Serialize and write one event frame. An I/O error means the socket is
/// gone; a serialization error is a bug worth logging but not worth killing
/// the connection over.
async fn send_event(socket: &mut WebSocket, event: &ServerEvent) -> Result<(), axum::Error> {
    match serde_json::to_string(event) {
        Ok(json) => socket.send(Message::Text(json.into())).await,
        Err(e) => {
            warn!(error = %e, "failed to serialize outbound event");
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
