//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use venuepulse_entity::reservation::Reservation;
use venuepulse_entity::space::Space;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

/// Reservation create outcome.
///
/// `DUPLICATE` is a normal response, not an error: the caller already
/// holds an active reservation and nothing was written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReservationResponse {
    /// "SUCCESS" or "DUPLICATE".
    pub status: String,
    /// ID of the created reservation, when status is "SUCCESS".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation_id: Option<i64>,
}

/// Reservation summary for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationResponse {
    /// Reservation ID.
    pub id: i64,
    /// Space ID.
    pub space_id: i64,
    /// Planned visit time.
    pub visit_time: DateTime<Utc>,
    /// Lifecycle status.
    pub status: String,
    /// Created at.
    pub created_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationResponse {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id.0,
            space_id: r.space_id.0,
            visit_time: r.visit_time,
            status: r.status.to_string(),
            created_at: r.created_at,
        }
    }
}

/// Space summary for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceResponse {
    /// Space ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Street address.
    pub address: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Operational status.
    pub status: String,
    /// Maximum simultaneous visitors.
    pub capacity: i32,
    /// Booked headcount (reservations, not physical presence).
    pub booked_count: i32,
    /// Created at.
    pub created_at: DateTime<Utc>,
}

impl From<Space> for SpaceResponse {
    fn from(s: Space) -> Self {
        Self {
            id: s.id.0,
            name: s.name,
            address: s.address,
            phone: s.phone,
            status: s.status.to_string(),
            capacity: s.capacity,
            booked_count: s.current_count,
            created_at: s.created_at,
        }
    }
}

/// Congestion view of one space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CongestionResponse {
    /// Space ID.
    pub space_id: i64,
    /// Physically-present count from the live counter.
    pub current_count: i64,
    /// The space's capacity.
    pub max_capacity: i64,
    /// Estimated congestion ratio in [0.0, 1.0].
    pub ratio: f64,
    /// EMA-smoothed ratio for display trends.
    pub smoothed_ratio: f64,
}

/// Acknowledgement that a check-in event was enqueued.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInResponse {
    /// Always "ACCEPTED"; counter application is asynchronous.
    pub status: String,
    /// Whether an active reservation was closed as attended by this scan.
    pub attended: bool,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
}

/// Detailed health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// Overall status.
    pub status: String,
    /// Database status.
    pub database: String,
    /// Counter store status.
    pub counter: String,
    /// Admission gate permits in use.
    pub gate_in_use: usize,
    /// Admission gate pool size.
    pub gate_total: usize,
}
