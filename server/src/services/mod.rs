//! Domain services used by websocket and HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own relay and persistence logic so route handlers can stay
//! focused on transport concerns (upgrade, framing, dispatch).

pub mod relay;
pub mod snapshot;
