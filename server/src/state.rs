//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. The
//! relay holds no board content — elements live in client replicas and in the
//! snapshot store. What the server does own is plumbing: the room registry
//! (membership + presence), the snapshot store handle, and the fan-out bridge
//! for cross-process broadcast. `node_id` identifies this process on the
//! bridge so it can skip its own envelopes.

use std::sync::Arc;

use uuid::Uuid;

use crate::fanout::FanoutBridge;
use crate::rooms::RoomRegistry;
use crate::services::snapshot::SnapshotStore;

/// Shared application state. Clone is required by Axum — all inner fields are
/// Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    /// Identifies this relay process on the fan-out bridge.
    pub node_id: Uuid,
    pub registry: Arc<RoomRegistry>,
    pub store: Arc<dyn SnapshotStore>,
    pub bridge: Arc<dyn FanoutBridge>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn SnapshotStore>, bridge: Arc<dyn FanoutBridge>) -> Self {
        Self { node_id: Uuid::new_v4(), registry: Arc::new(RoomRegistry::new()), store, bridge }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
