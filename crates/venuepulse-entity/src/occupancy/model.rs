//! Occupancy counter snapshot.

use serde::{Deserialize, Serialize};

use venuepulse_core::types::id::SpaceId;

/// Point-in-time view of the physically-present headcount for a space.
///
/// Distinct from `Space::current_count` (the booked headcount): this value
/// is updated only by the check-in pipeline and is eventually consistent
/// with bookings. `max_capacity` is cached from the space row for fast
/// reads on the congestion path.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OccupancySnapshot {
    /// The space this snapshot describes.
    pub space_id: SpaceId,
    /// Physically-present count. Transiently inaccurate under redelivery.
    pub current_count: i64,
    /// Cached capacity for ratio computation.
    pub max_capacity: i64,
}
