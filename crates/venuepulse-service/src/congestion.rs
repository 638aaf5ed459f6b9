//! Congestion read service.
//!
//! Combines the live occupancy counter with space capacity and runs the
//! estimator. Capacity is read from the Redis cache when present and falls
//! back to (and refreshes from) the spaces table.

use std::sync::Arc;

use chrono::{Timelike, Utc};
use serde::Serialize;
use tracing::warn;

use venuepulse_congestion::{CongestionEstimator, apply_ema};
use venuepulse_core::error::AppError;
use venuepulse_core::result::AppResult;
use venuepulse_core::types::id::SpaceId;
use venuepulse_counter::occupancy::OccupancyStore;
use venuepulse_database::repositories::space::SpaceRepository;

/// Point-in-time congestion view of a space.
#[derive(Debug, Clone, Serialize)]
pub struct CongestionReport {
    /// The space.
    pub space_id: SpaceId,
    /// Physically-present count from the live counter.
    pub current_count: i64,
    /// The space's capacity.
    pub max_capacity: i64,
    /// Estimated congestion ratio in [0.0, 1.0].
    pub ratio: f64,
    /// EMA-smoothed ratio for display trends.
    pub smoothed_ratio: f64,
}

/// Service computing congestion reports.
#[derive(Clone)]
pub struct CongestionService {
    occupancy: OccupancyStore,
    spaces: SpaceRepository,
    estimator: Arc<dyn CongestionEstimator>,
    ema_alpha: f64,
}

impl CongestionService {
    /// Create a new congestion service.
    pub fn new(
        occupancy: OccupancyStore,
        spaces: SpaceRepository,
        estimator: Arc<dyn CongestionEstimator>,
        ema_alpha: f64,
    ) -> Self {
        Self {
            occupancy,
            spaces,
            estimator,
            ema_alpha,
        }
    }

    /// Compute the congestion report for a space at the current hour.
    pub async fn report(&self, space_id: SpaceId) -> AppResult<CongestionReport> {
        self.report_at(space_id, Utc::now().hour()).await
    }

    /// Compute the congestion report for a space at an explicit hour.
    ///
    /// The hour is a parameter so the calculation stays deterministic and
    /// testable; `report` supplies the wall clock.
    pub async fn report_at(&self, space_id: SpaceId, hour: u32) -> AppResult<CongestionReport> {
        let current_count = self.occupancy.current_count(space_id).await?;

        let max_capacity = match self.occupancy.capacity(space_id).await? {
            Some(capacity) => capacity,
            None => {
                let space = self
                    .spaces
                    .find_by_id(space_id)
                    .await?
                    .ok_or_else(|| AppError::not_found(format!("Space {space_id} not found")))?;
                let capacity = i64::from(space.capacity);
                // Best-effort cache refresh; a miss next time just re-reads.
                if let Err(e) = self.occupancy.set_capacity(space_id, capacity).await {
                    warn!(space_id = space_id.0, error = %e, "Failed to cache capacity");
                }
                capacity
            }
        };

        let ratio = self.estimator.calculate(current_count, max_capacity, hour);

        // Display smoothing only; the raw ratio is never affected. The
        // stored average is best-effort, so a Redis hiccup degrades the
        // trend line rather than failing the read.
        let smoothed_ratio = match self.occupancy.smoothed_ratio(space_id).await {
            Ok(Some(previous)) => apply_ema(previous, ratio, self.ema_alpha),
            Ok(None) => ratio,
            Err(e) => {
                warn!(space_id = space_id.0, error = %e, "Failed to read smoothed ratio");
                ratio
            }
        };
        if let Err(e) = self
            .occupancy
            .set_smoothed_ratio(space_id, smoothed_ratio)
            .await
        {
            warn!(space_id = space_id.0, error = %e, "Failed to store smoothed ratio");
        }

        Ok(CongestionReport {
            space_id,
            current_count,
            max_capacity,
            ratio,
            smoothed_ratio,
        })
    }
}

impl std::fmt::Debug for CongestionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CongestionService").finish_non_exhaustive()
    }
}
