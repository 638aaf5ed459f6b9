//! User role, carried in JWT claims.
//!
//! Identity issuance is external; the role only gates elevated operations
//! such as cancelling another user's reservation.

use serde::{Deserialize, Serialize};

/// Role of an authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular member: may manage only their own reservations.
    Member,
    /// Space administrator: may cancel any reservation and view listings.
    Admin,
}

impl UserRole {
    /// Whether the role carries elevated privileges.
    pub fn is_elevated(self) -> bool {
        matches!(self, Self::Admin)
    }
}
