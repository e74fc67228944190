//! Fan-out bridge — cross-process broadcast mirroring.
//!
//! DESIGN
//! ======
//! A single relay process broadcasts directly through its `RoomRegistry`.
//! With several processes behind a load balancer, each one additionally
//! publishes every broadcast as an [`Envelope`] on the bridge and runs a
//! listener that delivers envelopes from *other* processes to its local
//! rooms. Envelopes carry the origin's `node_id` so a process never re-plays
//! its own traffic.
//!
//! The bridge is an interface boundary: production deployments put a real
//! pub/sub system behind it, [`LoopbackBridge`] covers single-process runs
//! and tests. Delivery is at-least-once — duplicates are safe because every
//! remote apply on the receiving replicas is idempotent.

use async_trait::async_trait;
use protocol::ServerEvent;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::warn;
use uuid::Uuid;

use crate::state::AppState;

const LOOPBACK_CAPACITY: usize = 1024;

/// One relayed operation as published across the cluster.
#[derive(Debug, Clone)]
pub struct Envelope {
    /// `node_id` of the publishing process.
    pub origin: Uuid,
    pub room_id: String,
    pub event: ServerEvent,
}

#[derive(Debug, thiserror::Error)]
pub enum FanoutError {
    #[error("fan-out bridge unavailable: {0}")]
    Unavailable(String),
}

/// Publish/subscribe fan-out across relay processes.
#[async_trait]
pub trait FanoutBridge: Send + Sync {
    /// Publish an envelope to every subscribed process, including the caller.
    async fn publish(&self, envelope: Envelope) -> Result<(), FanoutError>;

    /// Subscribe to the stream of published envelopes.
    fn subscribe(&self) -> broadcast::Receiver<Envelope>;
}

/// In-process bridge over a `tokio::sync::broadcast` channel. Several
/// `AppState`s sharing one `LoopbackBridge` behave like a multi-process
/// cluster, which is exactly how the tests exercise cross-node delivery.
pub struct LoopbackBridge {
    tx: broadcast::Sender<Envelope>,
}

impl LoopbackBridge {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(LOOPBACK_CAPACITY);
        Self { tx }
    }
}

impl Default for LoopbackBridge {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FanoutBridge for LoopbackBridge {
    async fn publish(&self, envelope: Envelope) -> Result<(), FanoutError> {
        // A send error only means no subscriber exists right now; publishing
        // into an empty cluster is not a failure.
        let _ = self.tx.send(envelope);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<Envelope> {
        self.tx.subscribe()
    }
}

/// Spawn the listener that delivers other processes' envelopes to local
/// rooms. Returns a handle for shutdown.
pub fn spawn_fanout_listener(state: AppState) -> JoinHandle<()> {
    let mut rx = state.bridge.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(envelope) => {
                    if envelope.origin == state.node_id {
                        continue;
                    }
                    state
                        .registry
                        .broadcast(&envelope.room_id, &envelope.event, None)
                        .await;
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "fan-out listener lagged; envelopes dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
#[path = "fanout_test.rs"]
mod tests;
