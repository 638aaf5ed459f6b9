//! Idempotency store for check-in event delivery.
//!
//! Delivery is at-least-once, so the consumer claims each event's delivery
//! ID with `SET NX EX` before applying it. A claim that fails means the
//! event was already applied; the redelivery is acknowledged and skipped.

use std::time::Duration;

use uuid::Uuid;

use venuepulse_core::error::{AppError, ErrorKind};
use venuepulse_core::result::AppResult;

use crate::client::RedisClient;
use crate::keys;

/// Redis-backed dedup store keyed by event delivery ID.
#[derive(Debug, Clone)]
pub struct DedupStore {
    /// Redis client.
    client: RedisClient,
    /// How long claims are remembered.
    ttl: Duration,
}

impl DedupStore {
    /// Create a new dedup store.
    pub fn new(client: RedisClient, ttl_seconds: u64) -> Self {
        Self {
            client,
            ttl: Duration::from_secs(ttl_seconds),
        }
    }

    /// Map a Redis error to an AppError.
    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Counter, format!("Redis error: {e}"), e)
    }

    /// Claim an event ID for processing.
    ///
    /// Returns `true` if this is the first delivery (caller should apply
    /// the event), `false` if the ID was already claimed (redelivery).
    pub async fn claim(&self, event_id: Uuid) -> AppResult<bool> {
        let key = self.client.prefixed_key(&keys::checkin_dedup(event_id));
        let mut conn = self.client.conn_mut();

        // SET key value EX ttl NX
        let result: Option<String> = redis::cmd("SET")
            .arg(&key)
            .arg(1)
            .arg("EX")
            .arg(self.ttl.as_secs())
            .arg("NX")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;

        Ok(result.is_some())
    }

    /// Release a claim so a failed apply can be retried on redelivery.
    pub async fn release(&self, event_id: Uuid) -> AppResult<()> {
        let key = self.client.prefixed_key(&keys::checkin_dedup(event_id));
        let mut conn = self.client.conn_mut();
        let _: () = redis::cmd("DEL")
            .arg(&key)
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }
}
