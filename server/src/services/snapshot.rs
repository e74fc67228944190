//! Persistence bridge — durable board snapshots keyed by room.
//!
//! DESIGN
//! ======
//! `save` is an unconditional upsert: the last caller wins, with no version
//! check or compare-and-swap. Two clients saving concurrently race and the
//! later write sticks — an accepted weak-consistency trade, documented here
//! rather than papered over. Persistence exists for late joiners and reload
//! recovery only; live edits never pass through it.
//!
//! ERROR HANDLING
//! ==============
//! A room with no saved snapshot is `Ok(None)`, not an error. I/O failures
//! surface as `SnapshotError` and are logged and swallowed by callers on the
//! live path — a broken database must not stop edits from propagating.

use std::collections::HashMap;

use async_trait::async_trait;
use protocol::{BoardSnapshot, Element};
use sqlx::PgPool;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("snapshot encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Durable key-value snapshot store keyed by room id.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load the latest snapshot for a room. `None` means the room has never
    /// been saved; the board simply starts empty.
    async fn load(&self, room_id: &str) -> Result<Option<BoardSnapshot>, SnapshotError>;

    /// Upsert the full element set for a room. Last writer wins.
    async fn save(&self, room_id: &str, elements: &[Element]) -> Result<(), SnapshotError>;
}

/// Current time as milliseconds since Unix epoch.
fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

// =============================================================================
// POSTGRES
// =============================================================================

/// Snapshot store backed by the `boards` table.
pub struct PgSnapshotStore {
    pool: PgPool,
}

impl PgSnapshotStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SnapshotStore for PgSnapshotStore {
    async fn load(&self, room_id: &str) -> Result<Option<BoardSnapshot>, SnapshotError> {
        let row = sqlx::query_as::<_, (serde_json::Value, i64)>(
            "SELECT elements, updated_at FROM boards WHERE room_id = $1",
        )
        .bind(room_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some((elements_json, updated_at)) = row else {
            return Ok(None);
        };
        let elements: Vec<Element> = serde_json::from_value(elements_json)?;
        Ok(Some(BoardSnapshot { room_id: room_id.to_owned(), elements, updated_at }))
    }

    async fn save(&self, room_id: &str, elements: &[Element]) -> Result<(), SnapshotError> {
        let elements_json = serde_json::to_value(elements)?;
        sqlx::query(
            "INSERT INTO boards (room_id, elements, updated_at) VALUES ($1, $2, $3) \
             ON CONFLICT (room_id) DO UPDATE SET \
                 elements = EXCLUDED.elements, updated_at = EXCLUDED.updated_at",
        )
        .bind(room_id)
        .bind(&elements_json)
        .bind(now_ms())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

// =============================================================================
// IN-MEMORY
// =============================================================================

/// Snapshot store held in process memory. Backs tests and database-less runs;
/// same last-writer-wins contract as the Postgres store.
pub struct MemorySnapshotStore {
    rooms: RwLock<HashMap<String, BoardSnapshot>>,
}

impl MemorySnapshotStore {
    #[must_use]
    pub fn new() -> Self {
        Self { rooms: RwLock::new(HashMap::new()) }
    }
}

impl Default for MemorySnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn load(&self, room_id: &str) -> Result<Option<BoardSnapshot>, SnapshotError> {
        let rooms = self.rooms.read().await;
        Ok(rooms.get(room_id).cloned())
    }

    async fn save(&self, room_id: &str, elements: &[Element]) -> Result<(), SnapshotError> {
        let mut rooms = self.rooms.write().await;
        rooms.insert(
            room_id.to_owned(),
            BoardSnapshot { room_id: room_id.to_owned(), elements: elements.to_vec(), updated_at: now_ms() },
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod tests;
