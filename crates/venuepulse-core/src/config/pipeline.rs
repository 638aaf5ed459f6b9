//! Check-in event pipeline configuration.

use serde::{Deserialize, Serialize};

/// Settings for the check-in event consumer and its redelivery policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Redis Streams consumer group name.
    #[serde(default = "default_consumer_group")]
    pub consumer_group: String,
    /// Consumer name within the group. Must be unique per process.
    #[serde(default = "default_consumer_name")]
    pub consumer_name: String,
    /// Maximum entries fetched per XREADGROUP call.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Poll interval in milliseconds when a stream is idle.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Maximum delivery attempts before a message is dead-lettered.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Base redelivery backoff in milliseconds; doubles per attempt.
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
    /// TTL for idempotency dedup keys in seconds.
    #[serde(default = "default_dedup_ttl")]
    pub dedup_ttl_seconds: u64,
    /// Occupancy ratio at which a threshold alert fires (edge-detected).
    #[serde(default = "default_alert_threshold")]
    pub alert_threshold: f64,
    /// Maximum number of space streams processed concurrently.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            consumer_group: default_consumer_group(),
            consumer_name: default_consumer_name(),
            batch_size: default_batch_size(),
            poll_interval_ms: default_poll_interval_ms(),
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
            dedup_ttl_seconds: default_dedup_ttl(),
            alert_threshold: default_alert_threshold(),
            concurrency: default_concurrency(),
        }
    }
}

fn default_consumer_group() -> String {
    "checkin-workers".to_string()
}

fn default_consumer_name() -> String {
    format!("worker-{}", std::process::id())
}

fn default_batch_size() -> usize {
    32
}

fn default_poll_interval_ms() -> u64 {
    250
}

fn default_max_attempts() -> u32 {
    5
}

fn default_backoff_base_ms() -> u64 {
    500
}

fn default_dedup_ttl() -> u64 {
    86_400
}

fn default_alert_threshold() -> f64 {
    0.8
}

fn default_concurrency() -> usize {
    8
}
