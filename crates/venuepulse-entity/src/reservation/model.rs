//! Reservation entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use venuepulse_core::types::id::{ReservationId, SpaceId, UserId};

/// A booking linking a user, a space, and a future visit time.
///
/// At most one reservation per user may be in `Confirmed` status at any
/// instant; the ledger enforces this with row locking plus a partial
/// unique index. `Cancelled` and `Attended` are terminal.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    /// Unique reservation identifier.
    pub id: ReservationId,
    /// The booking user.
    pub user_id: UserId,
    /// The booked space.
    pub space_id: SpaceId,
    /// Scheduled visit time.
    pub visit_time: DateTime<Utc>,
    /// Lifecycle status.
    pub status: ReservationStatus,
    /// When the reservation was created.
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    /// Whether the reservation is the user's active booking.
    pub fn is_active(&self) -> bool {
        matches!(self.status, ReservationStatus::Confirmed)
    }
}

/// Reservation lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "reservation_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ReservationStatus {
    /// Active booking, created by a successful create call.
    Confirmed,
    /// Terminal: cancelled by the user or an admin.
    Cancelled,
    /// Terminal: closed on a confirmed physical check-in.
    Attended,
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Confirmed => write!(f, "CONFIRMED"),
            Self::Cancelled => write!(f, "CANCELLED"),
            Self::Attended => write!(f, "ATTENDED"),
        }
    }
}

/// Data required to create a new reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReservation {
    /// The booking user.
    pub user_id: UserId,
    /// The space to book.
    pub space_id: SpaceId,
    /// Scheduled visit time.
    pub visit_time: DateTime<Utc>,
}
