//! Shared numeric constants for the replica.

/// Maximum number of history snapshots kept per replica. Committing beyond
/// the cap evicts the oldest snapshot from the front of the stack.
pub const HISTORY_CAP: usize = 50;

/// Offset in board units applied to pasted and duplicated elements so they
/// don't land exactly on top of their sources.
pub const PASTE_OFFSET: f64 = 20.0;

/// Minimum interval between outgoing cursor-move emissions.
pub const MIN_CURSOR_INTERVAL_MS: i64 = 50;
