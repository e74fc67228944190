mod db;
mod fanout;
mod rooms;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use crate::fanout::LoopbackBridge;
use crate::services::snapshot::{MemorySnapshotStore, PgSnapshotStore, SnapshotStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    // Persistence is best-effort: without a database the relay still forwards
    // edits, but snapshots only live as long as the process.
    let store: Arc<dyn SnapshotStore> = match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let pool = db::init_pool(&url).await.expect("database init failed");
            tracing::info!("snapshot store backed by postgres");
            Arc::new(PgSnapshotStore::new(pool))
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set — snapshots are in-memory and lost on restart");
            Arc::new(MemorySnapshotStore::new())
        }
    };

    let bridge = Arc::new(LoopbackBridge::new());
    let state = state::AppState::new(store, bridge);

    // Deliver envelopes published by other relay processes to local rooms.
    let _fanout = fanout::spawn_fanout_listener(state.clone());

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "board relay listening");
    axum::serve(listener, app).await.expect("server failed");
}
