//! Relay service — forwards operations among room members and across
//! processes.
//!
//! DESIGN
//! ======
//! The relay is a pure forwarder: it maps each inbound client event to its
//! broadcast counterpart and sends it to every *other* member of the room,
//! locally through the registry and cluster-wide through the fan-out bridge.
//! It never parses or validates element content, so payload shape can evolve
//! without touching this layer.
//!
//! Ordering: messages from one connection reach a given peer in send order
//! (a channel property). Nothing orders two different senders relative to
//! each other — which is why every element operation is an idempotent upsert
//! or removal by id, and why undo/redo and clear ship as unconditional
//! full-state `sync-board` corrections rather than deltas.
//!
//! ERROR HANDLING
//! ==============
//! Persistence and fan-out failures are logged and swallowed. The live
//! broadcast path must keep working when the durable store doesn't.

use protocol::{ClientEvent, Element, ServerEvent};
use rand::Rng;
use tokio::sync::mpsc;
use tracing::{error, warn};
use uuid::Uuid;

use crate::fanout::Envelope;
use crate::state::AppState;

/// Presence colors assigned round-robin-by-chance at join.
const PRESENCE_COLORS: [&str; 8] = [
    "#D94B4B", "#4A9EFF", "#3BB273", "#F2A33C", "#9B59B6", "#1ABC9C", "#E87EA1", "#8A8178",
];

fn presence_color() -> String {
    let idx = rand::rng().random_range(0..PRESENCE_COLORS.len());
    PRESENCE_COLORS[idx].to_owned()
}

/// Subscribe a connection to a room.
///
/// Peers (local and cross-process) learn about the newcomer via
/// `user-joined`; the newcomer alone gets the latest persisted snapshot,
/// returned here for the transport layer to deliver as `board-state`.
/// Snapshot loading is best-effort — on failure the board starts empty.
pub async fn join_room(
    state: &AppState,
    room_id: &str,
    connection_id: Uuid,
    tx: mpsc::Sender<ServerEvent>,
) -> Vec<Element> {
    let color = presence_color();
    state.registry.join(room_id, connection_id, color.clone(), tx).await;

    let joined = ServerEvent::UserJoined { connection_id, color };
    broadcast_and_publish(state, room_id, joined, Some(connection_id)).await;

    match state.store.load(room_id).await {
        Ok(Some(snapshot)) => snapshot.elements,
        Ok(None) => Vec::new(),
        Err(e) => {
            error!(error = %e, %room_id, "snapshot load failed; joiner starts empty");
            Vec::new()
        }
    }
}

/// Remove a connection from a room and tell the remaining peers, so they can
/// drop its cursor.
pub async fn leave_room(state: &AppState, room_id: &str, connection_id: Uuid) {
    if state.registry.leave(room_id, connection_id).await {
        let left = ServerEvent::UserLeft { connection_id };
        broadcast_and_publish(state, room_id, left, Some(connection_id)).await;
    }
}

/// Forward one non-join client event.
///
/// Every arm rebroadcasts verbatim to the other members of the event's room;
/// `save-board` is the exception — it goes to the persistence bridge instead
/// of to peers.
pub async fn relay_event(state: &AppState, connection_id: Uuid, event: ClientEvent) {
    match event {
        ClientEvent::Draw { room_id, element } => {
            let update = ServerEvent::DrawUpdate { element };
            broadcast_and_publish(state, &room_id, update, Some(connection_id)).await;
        }
        ClientEvent::RemoveElement { room_id, id } => {
            let removed = ServerEvent::ElementRemoved { id };
            broadcast_and_publish(state, &room_id, removed, Some(connection_id)).await;
        }
        ClientEvent::RemoveElements { room_id, ids } => {
            let removed = ServerEvent::ElementsRemoved { ids };
            broadcast_and_publish(state, &room_id, removed, Some(connection_id)).await;
        }
        ClientEvent::ClearBoard { room_id } => {
            broadcast_and_publish(state, &room_id, ServerEvent::BoardCleared, Some(connection_id)).await;
        }
        ClientEvent::SyncBoard { room_id, elements } => {
            let sync = ServerEvent::SyncBoard { elements };
            broadcast_and_publish(state, &room_id, sync, Some(connection_id)).await;
        }
        ClientEvent::CursorMove { room_id, cursor } => {
            state.registry.update_cursor(&room_id, connection_id, cursor).await;
            let update = ServerEvent::CursorUpdate { connection_id, cursor };
            broadcast_and_publish(state, &room_id, update, Some(connection_id)).await;
        }
        ClientEvent::SaveBoard { room_id, elements } => {
            if let Err(e) = state.store.save(&room_id, &elements).await {
                // Best-effort: a failed save never interrupts collaboration.
                error!(error = %e, %room_id, "board save failed");
            }
        }
        ClientEvent::JoinRoom { room_id } => {
            // Joins carry transport-level bookkeeping and are handled by the
            // websocket layer; reaching this arm is a dispatch bug upstream.
            warn!(%room_id, %connection_id, "join-room routed to relay_event; ignoring");
        }
    }
}

/// Broadcast to local room members and publish for the rest of the cluster.
async fn broadcast_and_publish(
    state: &AppState,
    room_id: &str,
    event: ServerEvent,
    exclude: Option<Uuid>,
) {
    state.registry.broadcast(room_id, &event, exclude).await;

    let envelope = Envelope { origin: state.node_id, room_id: room_id.to_owned(), event };
    if let Err(e) = state.bridge.publish(envelope).await {
        warn!(error = %e, %room_id, "fan-out publish failed");
    }
}

#[cfg(test)]
#[path = "relay_test.rs"]
mod tests;
