//! Key builders for every Redis entry the application uses.
//!
//! Centralising key construction prevents typos and makes it easy to find
//! every key the application writes. Keys here are *unprefixed*; the
//! configured prefix is applied by [`crate::client::RedisClient`].

use uuid::Uuid;

use venuepulse_core::types::id::SpaceId;

// ── Occupancy keys ─────────────────────────────────────────

/// Physically-present headcount for a space.
pub fn occupancy(space_id: SpaceId) -> String {
    format!("occupancy:{space_id}")
}

/// Cached capacity for a space, duplicated from the spaces table.
pub fn capacity(space_id: SpaceId) -> String {
    format!("capacity:{space_id}")
}

/// Running smoothed congestion ratio for a space (display only).
pub fn smoothed_ratio(space_id: SpaceId) -> String {
    format!("congestion:ema:{space_id}")
}

// ── Pipeline keys ──────────────────────────────────────────

/// Check-in event stream for one space. One stream per space gives
/// per-space FIFO ordering for free.
pub fn checkin_stream(space_id: SpaceId) -> String {
    format!("checkin:{space_id}")
}

/// Set of space IDs that have a check-in stream.
pub fn checkin_spaces() -> String {
    "checkin:spaces".to_string()
}

/// Dead-letter stream for events that exhausted their delivery attempts.
pub fn checkin_dead_letter() -> String {
    "checkin:dead".to_string()
}

/// Idempotency dedup key for one delivered event.
pub fn checkin_dedup(event_id: Uuid) -> String {
    format!("checkin:dedup:{event_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occupancy_key() {
        assert_eq!(occupancy(SpaceId(7)), "occupancy:7");
    }

    #[test]
    fn test_dedup_key() {
        let id = Uuid::nil();
        assert_eq!(
            checkin_dedup(id),
            "checkin:dedup:00000000-0000-0000-0000-000000000000"
        );
    }
}
