//! Check-in event producer.

use redis::AsyncCommands;
use tracing::debug;

use venuepulse_core::error::{AppError, ErrorKind};
use venuepulse_core::result::AppResult;
use venuepulse_core::types::id::SpaceId;
use venuepulse_counter::client::RedisClient;
use venuepulse_counter::keys;
use venuepulse_entity::checkin::{CheckInAction, CheckInEvent};

/// Publishes check-in events onto per-space streams.
///
/// Producers only append; ordering within a space falls out of stream
/// append order. Each publish also registers the space in the stream
/// registry set so the consumer discovers new spaces without configuration.
#[derive(Debug, Clone)]
pub struct CheckInProducer {
    client: RedisClient,
}

impl CheckInProducer {
    /// Create a new producer.
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    /// Map a Redis error to an AppError.
    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Pipeline, format!("Redis error: {e}"), e)
    }

    /// Enqueue an entry or exit scan for a space.
    ///
    /// Returns the stream entry ID. The caller gets an acknowledgement of
    /// enqueue only; counter application happens asynchronously.
    pub async fn publish(
        &self,
        space_id: SpaceId,
        user_id: &str,
        action: CheckInAction,
    ) -> AppResult<String> {
        let event = CheckInEvent::new(space_id, user_id, action);
        self.publish_event(&event).await
    }

    /// Enqueue a pre-built event (used by tests and replay tooling).
    pub async fn publish_event(&self, event: &CheckInEvent) -> AppResult<String> {
        let payload = serde_json::to_string(event)?;
        let stream = self.client.prefixed_key(&keys::checkin_stream(event.space_id));
        let registry = self.client.prefixed_key(&keys::checkin_spaces());
        let mut conn = self.client.conn_mut();

        let entry_id: String = conn
            .xadd(&stream, "*", &[("payload", payload.as_str())])
            .await
            .map_err(Self::map_err)?;
        let _: () = conn
            .sadd(&registry, event.space_id.0)
            .await
            .map_err(Self::map_err)?;

        debug!(
            space_id = event.space_id.0,
            entry_id = %entry_id,
            action = ?event.action,
            "Check-in event enqueued"
        );
        Ok(entry_id)
    }
}
