//! Atomic occupancy counter operations.
//!
//! Every mutation is a single server-side operation — `INCRBY` for entries,
//! a floored-decrement script for exits — never an application-level
//! read-modify-write. Concurrent consumers touching different spaces never
//! contend, and redelivered events cannot corrupt unrelated counters.

use redis::AsyncCommands;
use redis::Script;

use venuepulse_core::error::{AppError, ErrorKind};
use venuepulse_core::result::AppResult;
use venuepulse_core::types::id::SpaceId;
use venuepulse_entity::occupancy::OccupancySnapshot;

use crate::client::RedisClient;
use crate::keys;

/// Floored decrement: DECR, but clamped so the counter never goes below
/// zero when OUT events outnumber INs. Runs atomically on the server.
const DECR_FLOOR_SCRIPT: &str = r"
local v = redis.call('DECRBY', KEYS[1], tonumber(ARGV[1]))
if v < 0 then
  redis.call('SET', KEYS[1], '0')
  return 0
end
return v
";

/// Redis-backed live occupancy counter store.
#[derive(Clone)]
pub struct OccupancyStore {
    /// Redis client.
    client: RedisClient,
    /// Floored decrement script, loaded once.
    decr_floor: Script,
}

impl OccupancyStore {
    /// Create a new occupancy store.
    pub fn new(client: RedisClient) -> Self {
        Self {
            client,
            decr_floor: Script::new(DECR_FLOOR_SCRIPT),
        }
    }

    /// Map a Redis error to an AppError.
    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Counter, format!("Redis error: {e}"), e)
    }

    /// Apply an entry: atomic increment. Returns the post-update count.
    pub async fn record_entry(&self, space_id: SpaceId) -> AppResult<i64> {
        let key = self.client.prefixed_key(&keys::occupancy(space_id));
        let mut conn = self.client.conn_mut();
        let count: i64 = conn.incr(&key, 1i64).await.map_err(Self::map_err)?;
        Ok(count)
    }

    /// Apply an exit: atomic decrement floored at zero. Returns the
    /// post-update count.
    pub async fn record_exit(&self, space_id: SpaceId) -> AppResult<i64> {
        let key = self.client.prefixed_key(&keys::occupancy(space_id));
        let mut conn = self.client.conn_mut();
        let count: i64 = self
            .decr_floor
            .key(&key)
            .arg(1i64)
            .invoke_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(count)
    }

    /// Read the current physically-present count (0 if never written).
    pub async fn current_count(&self, space_id: SpaceId) -> AppResult<i64> {
        let key = self.client.prefixed_key(&keys::occupancy(space_id));
        let mut conn = self.client.conn_mut();
        let count: Option<i64> = conn.get(&key).await.map_err(Self::map_err)?;
        Ok(count.unwrap_or(0))
    }

    /// Cache a space's capacity for fast congestion reads.
    pub async fn set_capacity(&self, space_id: SpaceId, capacity: i64) -> AppResult<()> {
        let key = self.client.prefixed_key(&keys::capacity(space_id));
        let mut conn = self.client.conn_mut();
        let _: () = conn.set(&key, capacity).await.map_err(Self::map_err)?;
        Ok(())
    }

    /// Read a space's cached capacity, if present.
    pub async fn capacity(&self, space_id: SpaceId) -> AppResult<Option<i64>> {
        let key = self.client.prefixed_key(&keys::capacity(space_id));
        let mut conn = self.client.conn_mut();
        let capacity: Option<i64> = conn.get(&key).await.map_err(Self::map_err)?;
        Ok(capacity)
    }

    /// Read the running smoothed congestion ratio, if one has been stored.
    pub async fn smoothed_ratio(&self, space_id: SpaceId) -> AppResult<Option<f64>> {
        let key = self.client.prefixed_key(&keys::smoothed_ratio(space_id));
        let mut conn = self.client.conn_mut();
        let ratio: Option<f64> = conn.get(&key).await.map_err(Self::map_err)?;
        Ok(ratio)
    }

    /// Store the running smoothed congestion ratio.
    pub async fn set_smoothed_ratio(&self, space_id: SpaceId, ratio: f64) -> AppResult<()> {
        let key = self.client.prefixed_key(&keys::smoothed_ratio(space_id));
        let mut conn = self.client.conn_mut();
        let _: () = conn.set(&key, ratio).await.map_err(Self::map_err)?;
        Ok(())
    }

    /// Read count and cached capacity together.
    pub async fn snapshot(&self, space_id: SpaceId) -> AppResult<OccupancySnapshot> {
        let current_count = self.current_count(space_id).await?;
        let max_capacity = self.capacity(space_id).await?.unwrap_or(0);
        Ok(OccupancySnapshot {
            space_id,
            current_count,
            max_capacity,
        })
    }

    /// Check store connectivity.
    pub async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(pong == "PONG")
    }
}

impl std::fmt::Debug for OccupancyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OccupancyStore")
            .field("prefix", &self.client.prefix())
            .finish()
    }
}
