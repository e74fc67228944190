//! Outgoing cursor-move rate limiting.
//!
//! Cursor samples arrive at pointer-event rate; emitting every one of them
//! floods the room. The throttle admits at most one emission per interval.
//! This is a courtesy rate bound, not a correctness requirement — dropped
//! samples are simply superseded by the next admitted one.

#[cfg(test)]
#[path = "throttle_test.rs"]
mod throttle_test;

use crate::consts::MIN_CURSOR_INTERVAL_MS;

/// Timestamp-driven admission filter for cursor-move emissions.
///
/// The caller supplies the clock (milliseconds since an arbitrary origin),
/// which keeps the throttle deterministic under test.
#[derive(Debug, Clone)]
pub struct CursorThrottle {
    min_interval_ms: i64,
    last_sent_at: Option<i64>,
}

impl CursorThrottle {
    /// Throttle at the default minimum interval.
    #[must_use]
    pub fn new() -> Self {
        Self::with_interval(MIN_CURSOR_INTERVAL_MS)
    }

    /// Throttle at a caller-chosen minimum interval.
    #[must_use]
    pub fn with_interval(min_interval_ms: i64) -> Self {
        Self { min_interval_ms, last_sent_at: None }
    }

    /// Returns true if an emission at `now_ms` is allowed, recording it.
    pub fn admit(&mut self, now_ms: i64) -> bool {
        if let Some(last) = self.last_sent_at {
            if now_ms - last < self.min_interval_ms {
                return false;
            }
        }
        self.last_sent_at = Some(now_ms);
        true
    }
}

impl Default for CursorThrottle {
    fn default() -> Self {
        Self::new()
    }
}
