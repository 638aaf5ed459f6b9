//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create reservation request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateReservationRequest {
    /// Target space ID.
    #[validate(range(min = 1, message = "space_id is required"))]
    pub space_id: i64,
    /// Planned visit time.
    pub visit_time: DateTime<Utc>,
}

/// Create space request (admin).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSpaceRequest {
    /// Display name.
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    /// Street address.
    pub address: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Maximum simultaneous visitors.
    #[validate(range(min = 1, message = "Capacity must be positive"))]
    pub capacity: i32,
}

/// Change space status request (admin).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetSpaceStatusRequest {
    /// New status: "open" or "closed".
    pub status: String,
}

/// Check-in / check-out request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckInRequest {
    /// The space being entered or left.
    #[validate(range(min = 1, message = "space_id is required"))]
    pub space_id: i64,
}

/// Reservation listing query (admin).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationListQuery {
    /// Maximum rows returned.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}
