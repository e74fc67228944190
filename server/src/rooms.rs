//! Room registry — membership, presence, and broadcast.
//!
//! DESIGN
//! ======
//! An explicit service object created at process start and passed to request
//! handlers; no ambient globals. Each room holds the connected clients'
//! outbound senders plus ephemeral presence (last cursor point, assigned
//! color). None of this is board content and none of it is persisted: a room
//! entry exists exactly as long as it has members.
//!
//! Broadcast is best-effort `try_send`: a slow consumer whose channel is full
//! misses the frame rather than stalling the room.

use std::collections::HashMap;

use protocol::element::Point;
use protocol::ServerEvent;
use tokio::sync::{RwLock, mpsc};
use tracing::info;
use uuid::Uuid;

/// Per-room live state: members and their ephemeral presence.
#[derive(Default)]
pub struct Room {
    /// Connected clients: connection id -> sender for outgoing events.
    clients: HashMap<Uuid, mpsc::Sender<ServerEvent>>,
    /// Last known cursor point per connection. Removed with the connection;
    /// never expired on a timer (disconnect events are assumed reliable).
    cursors: HashMap<Uuid, Point>,
    /// Presence color assigned at join.
    colors: HashMap<Uuid, String>,
}

/// Registry of all rooms on this process.
pub struct RoomRegistry {
    rooms: RwLock<HashMap<String, Room>>,
}

impl RoomRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self { rooms: RwLock::new(HashMap::new()) }
    }

    /// Add a connection to a room, creating the room if needed.
    pub async fn join(
        &self,
        room_id: &str,
        connection_id: Uuid,
        color: String,
        tx: mpsc::Sender<ServerEvent>,
    ) {
        let mut rooms = self.rooms.write().await;
        let room = rooms.entry(room_id.to_owned()).or_default();
        room.clients.insert(connection_id, tx);
        room.colors.insert(connection_id, color);
        info!(%room_id, %connection_id, members = room.clients.len(), "joined room");
    }

    /// Remove a connection from a room. Returns true if it was a member.
    /// The room is evicted when its last member leaves.
    pub async fn leave(&self, room_id: &str, connection_id: Uuid) -> bool {
        let mut rooms = self.rooms.write().await;
        let Some(room) = rooms.get_mut(room_id) else {
            return false;
        };
        let was_member = room.clients.remove(&connection_id).is_some();
        room.cursors.remove(&connection_id);
        room.colors.remove(&connection_id);
        if was_member {
            info!(%room_id, %connection_id, remaining = room.clients.len(), "left room");
        }
        if room.clients.is_empty() {
            rooms.remove(room_id);
            info!(%room_id, "evicted empty room");
        }
        was_member
    }

    /// Record a connection's latest cursor point.
    pub async fn update_cursor(&self, room_id: &str, connection_id: Uuid, point: Point) {
        let mut rooms = self.rooms.write().await;
        if let Some(room) = rooms.get_mut(room_id) {
            room.cursors.insert(connection_id, point);
        }
    }

    /// Current cursor points for a room, keyed by connection.
    pub async fn cursors(&self, room_id: &str) -> Vec<(Uuid, Point)> {
        let rooms = self.rooms.read().await;
        let Some(room) = rooms.get(room_id) else {
            return Vec::new();
        };
        room.cursors.iter().map(|(id, p)| (*id, *p)).collect()
    }

    /// Number of connections currently in a room.
    pub async fn member_count(&self, room_id: &str) -> usize {
        let rooms = self.rooms.read().await;
        rooms.get(room_id).map_or(0, |room| room.clients.len())
    }

    /// Send an event to every member of a room, optionally excluding one
    /// connection (the sender of the operation being rebroadcast).
    pub async fn broadcast(&self, room_id: &str, event: &ServerEvent, exclude: Option<Uuid>) {
        let rooms = self.rooms.read().await;
        let Some(room) = rooms.get(room_id) else {
            return;
        };
        for (connection_id, tx) in &room.clients {
            if exclude == Some(*connection_id) {
                continue;
            }
            // Best-effort: if a client's channel is full, skip it.
            let _ = tx.try_send(event.clone());
        }
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "rooms_test.rs"]
mod tests;
