//! Check-in event consumer worker.
//!
//! One polling loop drains every registered space stream under a consumer
//! group. Within a space, entries are applied strictly in stream order: an
//! apply failure stops the batch, and on later cycles the failed entry acts
//! as a barrier — nothing younger (pending or new) is applied until it is
//! either retried successfully or dead-lettered. Across spaces, streams are
//! processed in parallel under a semaphore. Delivery is at-least-once:
//! application is made idempotent through the dedup store, retried with
//! exponential backoff, and dead-lettered after the configured number of
//! attempts.

use std::sync::Arc;
use std::time::Duration;

use redis::AsyncCommands;
use redis::streams::{
    StreamClaimReply, StreamId, StreamPendingCountReply, StreamRangeReply, StreamReadOptions,
    StreamReadReply,
};
use tokio::sync::{Semaphore, watch};
use tracing::{debug, error, info, warn};

use venuepulse_core::config::pipeline::PipelineConfig;
use venuepulse_core::error::{AppError, ErrorKind};
use venuepulse_core::result::AppResult;
use venuepulse_core::types::id::SpaceId;
use venuepulse_counter::client::RedisClient;
use venuepulse_counter::dedup::DedupStore;
use venuepulse_counter::keys;
use venuepulse_counter::occupancy::OccupancyStore;
use venuepulse_entity::checkin::{CheckInAction, CheckInEvent};
use venuepulse_service::notification::AlertNotifier;

use crate::alert::crossed_threshold;

/// Map a Redis error to an AppError.
fn map_redis_err(e: redis::RedisError) -> AppError {
    AppError::with_source(ErrorKind::Pipeline, format!("Redis error: {e}"), e)
}

/// Redelivery backoff for a message on its Nth delivery attempt.
///
/// Doubles per attempt from the configured base, with the shift capped so
/// large delivery counts cannot overflow.
fn backoff_ms(base_ms: u64, attempts: u32) -> u64 {
    let exponent = attempts.saturating_sub(1).min(10);
    base_ms.saturating_mul(1u64 << exponent)
}

/// Disposition of one pending entry during the reclaim pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingAction {
    /// Delivery attempts exhausted; move to the dead-letter stream.
    DeadLetter,
    /// Still inside its backoff window. Nothing younger in the stream may
    /// be applied until this entry is resolved, or redelivery would
    /// reorder the space's events.
    Wait,
    /// Idle past its backoff; claim and apply again.
    Retry,
}

fn pending_action(times_delivered: u32, idle_ms: u64, config: &PipelineConfig) -> PendingAction {
    if times_delivered >= config.max_attempts {
        return PendingAction::DeadLetter;
    }
    if idle_ms < backoff_ms(config.backoff_base_ms, times_delivered) {
        return PendingAction::Wait;
    }
    PendingAction::Retry
}

/// Consumer worker applying check-in events to the occupancy counters.
#[derive(Clone)]
pub struct CheckInWorker {
    client: RedisClient,
    occupancy: OccupancyStore,
    dedup: DedupStore,
    notifier: Arc<dyn AlertNotifier>,
    config: PipelineConfig,
    limiter: Arc<Semaphore>,
}

impl CheckInWorker {
    /// Create a new worker.
    pub fn new(
        client: RedisClient,
        occupancy: OccupancyStore,
        notifier: Arc<dyn AlertNotifier>,
        config: PipelineConfig,
    ) -> Self {
        let dedup = DedupStore::new(client.clone(), config.dedup_ttl_seconds);
        let limiter = Arc::new(Semaphore::new(config.concurrency));
        Self {
            client,
            occupancy,
            dedup,
            notifier,
            config,
            limiter,
        }
    }

    /// Run the polling loop until the shutdown signal flips.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(
            group = %self.config.consumer_group,
            consumer = %self.config.consumer_name,
            "Check-in worker started"
        );
        let poll = Duration::from_millis(self.config.poll_interval_ms);

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = tokio::time::sleep(poll) => {
                    if let Err(e) = self.cycle().await {
                        warn!(error = %e, "Check-in worker cycle failed");
                    }
                }
            }
        }

        info!("Check-in worker stopped");
    }

    /// One poll cycle: discover registered spaces and drain each stream.
    ///
    /// Every per-space task is awaited before the cycle returns, so at most
    /// one task touches a given stream at a time and per-space order holds.
    async fn cycle(&self) -> AppResult<()> {
        let registry = self.client.prefixed_key(&keys::checkin_spaces());
        let mut conn = self.client.conn_mut();
        let space_ids: Vec<i64> = conn.smembers(&registry).await.map_err(map_redis_err)?;

        let mut tasks = Vec::with_capacity(space_ids.len());
        for raw_id in space_ids {
            let Ok(permit) = self.limiter.clone().try_acquire_owned() else {
                // At the concurrency cap; remaining spaces wait for the
                // next cycle.
                break;
            };
            let worker = self.clone();
            let space_id = SpaceId(raw_id);
            tasks.push(tokio::spawn(async move {
                let _permit = permit;
                if let Err(e) = worker.process_space(space_id).await {
                    warn!(space_id = space_id.0, error = %e, "Failed to process space stream");
                }
            }));
        }

        for task in tasks {
            let _ = task.await;
        }
        Ok(())
    }

    /// Drain one space stream: settle stale deliveries, then read new
    /// entries — but only once no unresolved pending entry remains, so a
    /// failed event can never be overtaken by a younger one.
    async fn process_space(&self, space_id: SpaceId) -> AppResult<()> {
        let stream = self.client.prefixed_key(&keys::checkin_stream(space_id));
        self.ensure_group(&stream).await?;
        if !self.reclaim_stale(&stream, space_id).await? {
            return Ok(());
        }
        self.read_new(&stream).await
    }

    /// Create the consumer group on the stream if it does not exist yet.
    async fn ensure_group(&self, stream: &str) -> AppResult<()> {
        let mut conn = self.client.conn_mut();
        let created: Result<(), redis::RedisError> = conn
            .xgroup_create_mkstream(stream, &self.config.consumer_group, "0")
            .await;
        match created {
            Ok(()) => Ok(()),
            Err(e) if e.code() == Some("BUSYGROUP") => Ok(()),
            Err(e) => Err(map_redis_err(e)),
        }
    }

    /// Read and apply a batch of new entries in stream order.
    async fn read_new(&self, stream: &str) -> AppResult<()> {
        let mut conn = self.client.conn_mut();
        let opts = StreamReadOptions::default()
            .group(&self.config.consumer_group, &self.config.consumer_name)
            .count(self.config.batch_size);
        let reply: StreamReadReply = conn
            .xread_options(&[stream], &[">"], &opts)
            .await
            .map_err(map_redis_err)?;

        for key in reply.keys {
            for entry in key.ids {
                if let Err(e) = self.apply_entry(stream, &entry).await {
                    // Stop at the failed entry. It and everything after it
                    // stay pending, so redelivery preserves stream order.
                    warn!(entry_id = %entry.id, error = %e, "Failed to apply check-in event");
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    /// Apply one stream entry to the occupancy counter.
    ///
    /// Malformed entries are acknowledged and discarded with a warning.
    /// Redeliveries of already-applied events (same `event_id`) are
    /// acknowledged and skipped. An apply failure leaves the entry pending
    /// for the reclaim pass and releases any dedup claim taken.
    async fn apply_entry(&self, stream: &str, entry: &StreamId) -> AppResult<()> {
        let Some(payload) = entry.get::<String>("payload") else {
            warn!(entry_id = %entry.id, "Stream entry has no payload field, discarding");
            return self.ack(stream, &entry.id).await;
        };

        let event: CheckInEvent = match serde_json::from_str(&payload) {
            Ok(event) => event,
            Err(e) => {
                warn!(entry_id = %entry.id, error = %e, "Unparseable check-in event, discarding");
                return self.ack(stream, &entry.id).await;
            }
        };

        let claimed = match event.event_id {
            Some(event_id) => {
                if !self.dedup.claim(event_id).await? {
                    debug!(entry_id = %entry.id, %event_id, "Event already applied, skipping redelivery");
                    return self.ack(stream, &entry.id).await;
                }
                Some(event_id)
            }
            // Legacy producer without an idempotency key; applied as-is.
            None => None,
        };

        let applied = match event.action {
            CheckInAction::In => self.occupancy.record_entry(event.space_id).await,
            CheckInAction::Out => self.occupancy.record_exit(event.space_id).await,
        };

        let new_count = match applied {
            Ok(count) => count,
            Err(e) => {
                if let Some(event_id) = claimed {
                    if let Err(release_err) = self.dedup.release(event_id).await {
                        warn!(%event_id, error = %release_err, "Failed to release dedup claim");
                    }
                }
                return Err(e);
            }
        };

        if event.action == CheckInAction::In {
            self.maybe_alert(event.space_id, new_count).await;
        }

        self.ack(stream, &entry.id).await
    }

    /// Fire a capacity alert if this entry pushed the space over the line.
    ///
    /// Best-effort: alert problems never affect the counter update or the
    /// acknowledgement of the entry.
    async fn maybe_alert(&self, space_id: SpaceId, new_count: i64) {
        let max_capacity = match self.occupancy.capacity(space_id).await {
            Ok(Some(capacity)) => capacity,
            Ok(None) => return,
            Err(e) => {
                warn!(space_id = space_id.0, error = %e, "Failed to read capacity for alert check");
                return;
            }
        };

        if crossed_threshold(
            new_count - 1,
            new_count,
            max_capacity,
            self.config.alert_threshold,
        ) {
            self.notifier
                .notify_capacity_alert(space_id, new_count, max_capacity)
                .await;
        }
    }

    /// Retry or dead-letter pending entries whose delivery went stale.
    ///
    /// Pending entries are visited oldest first. The first entry that can
    /// be neither applied nor dead-lettered ends the pass and reports the
    /// stream blocked: everything younger, pending or new, has to wait
    /// behind it. Returns whether the stream is clear for new reads.
    async fn reclaim_stale(&self, stream: &str, space_id: SpaceId) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let pending: StreamPendingCountReply = conn
            .xpending_count(
                stream,
                &self.config.consumer_group,
                "-",
                "+",
                self.config.batch_size,
            )
            .await
            .map_err(map_redis_err)?;

        // A full page may cut off older unresolved entries; only an
        // exhausted page proves the stream is clear.
        let page_full = pending.ids.len() >= self.config.batch_size;

        for message in pending.ids {
            let times_delivered = message.times_delivered as u32;
            match pending_action(
                times_delivered,
                message.last_delivered_ms as u64,
                &self.config,
            ) {
                PendingAction::DeadLetter => {
                    self.dead_letter(stream, space_id, &message.id).await?;
                }
                PendingAction::Wait => return Ok(false),
                PendingAction::Retry => {
                    let min_idle = backoff_ms(self.config.backoff_base_ms, times_delivered);
                    let claimed: StreamClaimReply = conn
                        .xclaim(
                            stream,
                            &self.config.consumer_group,
                            &self.config.consumer_name,
                            min_idle as usize,
                            &[&message.id],
                        )
                        .await
                        .map_err(map_redis_err)?;

                    // Another consumer got there first, or the entry's idle
                    // time reset; it is still unresolved, so it blocks.
                    if claimed.ids.is_empty() {
                        return Ok(false);
                    }

                    for entry in claimed.ids {
                        if let Err(e) = self.apply_entry(stream, &entry).await {
                            warn!(entry_id = %entry.id, error = %e, "Redelivered check-in event failed again");
                            return Ok(false);
                        }
                    }
                }
            }
        }
        Ok(!page_full)
    }

    /// Move an exhausted entry to the dead-letter stream and acknowledge it.
    async fn dead_letter(&self, stream: &str, space_id: SpaceId, entry_id: &str) -> AppResult<()> {
        let mut conn = self.client.conn_mut();
        let range: StreamRangeReply = conn
            .xrange(stream, entry_id, entry_id)
            .await
            .map_err(map_redis_err)?;

        let dead = self.client.prefixed_key(&keys::checkin_dead_letter());
        for entry in range.ids {
            let payload: String = entry.get("payload").unwrap_or_default();
            let _: String = conn
                .xadd(
                    &dead,
                    "*",
                    &[
                        ("payload", payload.as_str()),
                        ("origin_stream", stream),
                        ("origin_id", entry_id),
                    ],
                )
                .await
                .map_err(map_redis_err)?;
        }

        let _: i64 = conn
            .xack(stream, &self.config.consumer_group, &[entry_id])
            .await
            .map_err(map_redis_err)?;

        error!(
            space_id = space_id.0,
            entry_id, "Check-in event dead-lettered after exhausting delivery attempts"
        );
        Ok(())
    }

    /// Acknowledge one entry.
    async fn ack(&self, stream: &str, entry_id: &str) -> AppResult<()> {
        let mut conn = self.client.conn_mut();
        let _: i64 = conn
            .xack(stream, &self.config.consumer_group, &[entry_id])
            .await
            .map_err(map_redis_err)?;
        Ok(())
    }
}

impl std::fmt::Debug for CheckInWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckInWorker")
            .field("group", &self.config.consumer_group)
            .field("consumer", &self.config.consumer_name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_per_attempt() {
        assert_eq!(backoff_ms(500, 1), 500);
        assert_eq!(backoff_ms(500, 2), 1_000);
        assert_eq!(backoff_ms(500, 3), 2_000);
        assert_eq!(backoff_ms(500, 5), 8_000);
    }

    #[test]
    fn test_backoff_shift_is_capped() {
        // Pathological delivery counts must not overflow the shift.
        assert_eq!(backoff_ms(500, 60), 500 * 1024);
        assert_eq!(backoff_ms(500, u32::MAX), 500 * 1024);
    }

    #[test]
    fn test_backoff_zero_attempts_treated_as_first() {
        assert_eq!(backoff_ms(500, 0), 500);
    }

    fn config_with(max_attempts: u32, backoff_base_ms: u64) -> PipelineConfig {
        PipelineConfig {
            max_attempts,
            backoff_base_ms,
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn test_exhausted_delivery_is_dead_lettered() {
        let config = config_with(5, 500);
        assert_eq!(pending_action(5, 0, &config), PendingAction::DeadLetter);
        assert_eq!(pending_action(7, 60_000, &config), PendingAction::DeadLetter);
    }

    #[test]
    fn test_entry_inside_backoff_blocks_the_stream() {
        let config = config_with(5, 500);
        // A failure polled again before its backoff elapses must hold the
        // whole stream, or a younger OUT could overtake the failed IN and
        // floor the counter out from under it.
        assert_eq!(pending_action(1, 250, &config), PendingAction::Wait);
        assert_eq!(pending_action(2, 999, &config), PendingAction::Wait);
    }

    #[test]
    fn test_entry_past_backoff_is_retried() {
        let config = config_with(5, 500);
        assert_eq!(pending_action(1, 500, &config), PendingAction::Retry);
        assert_eq!(pending_action(3, 2_000, &config), PendingAction::Retry);
    }
}
