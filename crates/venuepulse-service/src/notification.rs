//! Capacity alert delivery.
//!
//! The check-in pipeline fires an alert exactly when a space crosses the
//! configured congestion threshold. Delivery is behind a trait so the
//! transport can change without touching the worker.

use async_trait::async_trait;
use tracing::warn;

use venuepulse_core::types::id::SpaceId;

/// Receives capacity alerts raised by the check-in pipeline.
#[async_trait]
pub trait AlertNotifier: Send + Sync {
    /// Called when a space crosses the alert threshold from below.
    ///
    /// Failures must not affect counter updates; implementations should
    /// swallow and log their own errors.
    async fn notify_capacity_alert(&self, space_id: SpaceId, current_count: i64, max_capacity: i64);
}

/// Notifier that emits a structured warning log for each alert.
#[derive(Debug, Clone, Default)]
pub struct LogAlertNotifier;

#[async_trait]
impl AlertNotifier for LogAlertNotifier {
    async fn notify_capacity_alert(
        &self,
        space_id: SpaceId,
        current_count: i64,
        max_capacity: i64,
    ) {
        warn!(
            space_id = space_id.0,
            current_count,
            max_capacity,
            "space crossed capacity alert threshold"
        );
    }
}
