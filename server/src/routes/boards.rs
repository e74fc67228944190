//! Read-only REST path for board snapshots.
//!
//! The core system has no write REST path: all writes flow through the event
//! channel and `save-board`. This endpoint serves reload recovery and
//! external read-side integrations.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use protocol::BoardSnapshot;
use tracing::error;

use crate::state::AppState;

/// `GET /api/board/:room_id` — latest persisted snapshot, or 404 if the room
/// has never been saved.
pub async fn get_board(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<BoardSnapshot>, StatusCode> {
    match state.store.load(&room_id).await {
        Ok(Some(snapshot)) => Ok(Json(snapshot)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!(error = %e, %room_id, "snapshot load failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[cfg(test)]
#[path = "boards_test.rs"]
mod tests;
