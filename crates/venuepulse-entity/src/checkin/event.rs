//! Check-in event wire contract.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use venuepulse_core::types::id::SpaceId;

/// Direction of a physical scan at a space entrance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckInAction {
    /// A visitor entered the space.
    #[serde(rename = "IN")]
    In,
    /// A visitor left the space.
    #[serde(rename = "OUT")]
    Out,
}

impl CheckInAction {
    /// The signed delta this action applies to the occupancy counter.
    pub fn delta(self) -> i64 {
        match self {
            Self::In => 1,
            Self::Out => -1,
        }
    }
}

/// One physical entry or exit scan, immutable once enqueued.
///
/// Wire format (stable across producer/consumer versions):
/// `{"event_id": "<uuid>", "space_id": <int>, "user_id": "<string>", "action": "IN"|"OUT"}`.
///
/// `event_id` is the delivery/idempotency key: delivery is at-least-once, so
/// consumers use it to make counter updates safe under redelivery. Messages
/// without one (legacy producers) are accepted but applied non-idempotently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInEvent {
    /// Idempotency key, assigned once at enqueue time.
    #[serde(default)]
    pub event_id: Option<Uuid>,
    /// The space being entered or left.
    pub space_id: SpaceId,
    /// The scanning user. Free-form: badge IDs and guest codes also appear here.
    pub user_id: String,
    /// Entry or exit.
    pub action: CheckInAction,
}

impl CheckInEvent {
    /// Create a new event with a fresh idempotency key.
    pub fn new(space_id: SpaceId, user_id: impl Into<String>, action: CheckInAction) -> Self {
        Self {
            event_id: Some(Uuid::new_v4()),
            space_id,
            user_id: user_id.into(),
            action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format_is_stable() {
        let json = r#"{"event_id":"00000000-0000-0000-0000-000000000001","space_id":3,"user_id":"u-17","action":"IN"}"#;
        let event: CheckInEvent = serde_json::from_str(json).expect("deserialize");
        assert_eq!(event.space_id, SpaceId(3));
        assert_eq!(event.user_id, "u-17");
        assert_eq!(event.action, CheckInAction::In);
        assert!(event.event_id.is_some());
    }

    #[test]
    fn test_legacy_message_without_event_id_parses() {
        let json = r#"{"space_id":5,"user_id":"u-2","action":"OUT"}"#;
        let event: CheckInEvent = serde_json::from_str(json).expect("deserialize");
        assert_eq!(event.action, CheckInAction::Out);
        assert!(event.event_id.is_none());
    }

    #[test]
    fn test_action_delta() {
        assert_eq!(CheckInAction::In.delta(), 1);
        assert_eq!(CheckInAction::Out.delta(), -1);
    }
}
