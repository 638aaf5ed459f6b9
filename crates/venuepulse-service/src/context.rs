//! Request context carrying the authenticated caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use venuepulse_core::types::id::UserId;
use venuepulse_entity::user::UserRole;

/// Context for the current authenticated request.
///
/// Extracted by the API layer from validated JWT claims and passed
/// explicitly into service methods so that every operation knows *who* is
/// acting — a typed value, never a string-keyed context lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// The user's role at the time the JWT was issued.
    pub role: UserRole,
    /// The username (convenience field from JWT claims).
    pub username: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: UserId, role: UserRole, username: String) -> Self {
        Self {
            user_id,
            role,
            username,
            request_time: Utc::now(),
        }
    }

    /// Returns whether the current user holds elevated privileges.
    pub fn is_elevated(&self) -> bool {
        self.role.is_elevated()
    }
}
