//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One Axum router carries the whole external surface: the websocket upgrade
//! (all writes flow through it), the read-only REST path for board snapshots,
//! and a health probe. CORS is wide open — access control is outside this
//! subsystem's boundary.

pub mod boards;
pub mod ws;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/board/{room_id}", get(boards::get_board))
        .route("/api/ws", get(ws::handle_ws))
        .route("/healthz", get(healthz))
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
