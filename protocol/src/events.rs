//! Room-scoped event vocabulary exchanged over the transport.
//!
//! Every frame is a JSON object `{ "event": <kebab-case tag>, "data": ... }`.
//! [`ClientEvent`] flows client → relay; [`ServerEvent`] flows relay →
//! client(s). The relay forwards element payloads verbatim — it maps a client
//! event to its broadcast counterpart without inspecting element content, so
//! payload shape can evolve without touching the relay.

#[cfg(test)]
#[path = "events_test.rs"]
mod events_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::element::{Element, Point};

/// Messages a client sends to the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    /// Subscribe to a room; triggers a snapshot push back to the sender only.
    JoinRoom { room_id: String },
    /// Create-or-update upsert for one element.
    Draw { room_id: String, element: Element },
    /// Delete one element by id.
    RemoveElement { room_id: String, id: Uuid },
    /// Delete a batch of elements.
    RemoveElements { room_id: String, ids: Vec<Uuid> },
    /// Wholesale clear of the room's board.
    ClearBoard { room_id: String },
    /// Full replace of the board. Sent after a local undo/redo, because local
    /// history never replicates — shipping the resulting state wholesale is
    /// the only way to make peers consistent again.
    SyncBoard { room_id: String, elements: Vec<Element> },
    /// Presence cursor sample. Throttled client-side before emission.
    CursorMove { room_id: String, cursor: Point },
    /// Push the full element set to the persistence bridge.
    SaveBoard { room_id: String, elements: Vec<Element> },
}

impl ClientEvent {
    /// The room this event targets.
    #[must_use]
    pub fn room_id(&self) -> &str {
        match self {
            ClientEvent::JoinRoom { room_id }
            | ClientEvent::Draw { room_id, .. }
            | ClientEvent::RemoveElement { room_id, .. }
            | ClientEvent::RemoveElements { room_id, .. }
            | ClientEvent::ClearBoard { room_id }
            | ClientEvent::SyncBoard { room_id, .. }
            | ClientEvent::CursorMove { room_id, .. }
            | ClientEvent::SaveBoard { room_id, .. } => room_id,
        }
    }
}

/// Messages the relay sends to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// Full board snapshot, sent once to a joining connection.
    BoardState { elements: Vec<Element> },
    /// Broadcast of a peer's `draw` upsert.
    DrawUpdate { element: Element },
    /// Broadcast of a single-element deletion.
    ElementRemoved { id: Uuid },
    /// Broadcast of a batch deletion.
    ElementsRemoved { ids: Vec<Uuid> },
    /// Broadcast of a wholesale clear.
    BoardCleared,
    /// Full replace of the receiver's board, discarding local-only state.
    SyncBoard { elements: Vec<Element> },
    /// A peer's cursor moved.
    CursorUpdate { connection_id: Uuid, cursor: Point },
    /// A peer joined the room. Carries the presence color assigned to it.
    UserJoined { connection_id: Uuid, color: String },
    /// A peer left; receivers drop its cursor.
    UserLeft { connection_id: Uuid },
}

/// Durable snapshot record, keyed by room. Also the REST read-path response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    pub room_id: String,
    pub elements: Vec<Element>,
    /// Milliseconds since the Unix epoch at the time of the last save.
    pub updated_at: i64,
}
