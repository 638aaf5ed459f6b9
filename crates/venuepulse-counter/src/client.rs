//! Shared Redis handle for the counter store and the check-in streams.

use redis::aio::ConnectionManager;
use tracing::info;

use venuepulse_core::config::{RedisConfig, mask_url_password};
use venuepulse_core::error::{AppError, ErrorKind};
use venuepulse_core::result::AppResult;

/// Handle on the Redis connection plus the configured key namespace.
///
/// Clones are cheap: every clone multiplexes over the same managed
/// connection, which reconnects by itself after a drop.
#[derive(Debug, Clone)]
pub struct RedisClient {
    conn: ConnectionManager,
    key_prefix: String,
}

impl RedisClient {
    /// Connect and wrap the managed connection. Fails fast on a malformed
    /// URL or an unreachable server.
    pub async fn connect(config: &RedisConfig) -> AppResult<Self> {
        let client = redis::Client::open(config.url.as_str())
            .map_err(|e| AppError::with_source(ErrorKind::Counter, "Invalid Redis URL", e))?;

        let conn = ConnectionManager::new(client).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Counter,
                format!("Failed to connect to {}", mask_url_password(&config.url)),
                e,
            )
        })?;

        info!(
            url = %mask_url_password(&config.url),
            prefix = %config.key_prefix,
            "Connected to Redis"
        );
        Ok(Self {
            conn,
            key_prefix: config.key_prefix.clone(),
        })
    }

    /// Clone of the managed connection for issuing commands.
    pub fn conn_mut(&self) -> ConnectionManager {
        self.conn.clone()
    }

    /// Apply the configured namespace prefix to an application key.
    pub fn prefixed_key(&self, key: &str) -> String {
        format!("{}{key}", self.key_prefix)
    }

    /// The configured namespace prefix.
    pub fn prefix(&self) -> &str {
        &self.key_prefix
    }
}
