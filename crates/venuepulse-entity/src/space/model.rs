//! Space entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use venuepulse_core::types::id::SpaceId;

/// A capacity-bounded physical venue that can be booked and monitored.
///
/// `current_count` is the *booked* headcount, owned exclusively by the
/// reservation ledger. It is advisory: reservations past capacity queue
/// logically and are never blocked here. The physically-present headcount
/// lives in the occupancy counter store and follows a separate update path.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Space {
    /// Unique space identifier.
    pub id: SpaceId,
    /// Display name.
    pub name: String,
    /// Street address.
    pub address: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Operational status.
    pub status: SpaceStatus,
    /// Maximum simultaneous visitors.
    pub capacity: i32,
    /// Booked headcount (confirmed reservations), never negative.
    pub current_count: i32,
    /// When the space was registered.
    pub created_at: DateTime<Utc>,
}

impl Space {
    /// Whether the space currently accepts visitors.
    pub fn is_open(&self) -> bool {
        matches!(self.status, SpaceStatus::Open)
    }
}

/// Operational status of a space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "space_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SpaceStatus {
    /// Accepting visitors and reservations.
    Open,
    /// Closed; existing reservations remain visible.
    Closed,
}

impl std::fmt::Display for SpaceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

impl std::str::FromStr for SpaceStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            _ => Err(()),
        }
    }
}
