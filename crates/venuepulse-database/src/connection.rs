//! Connection handling for the reservation database.
//!
//! One pool serves the ledger and the space catalog; repositories borrow it
//! through [`DatabasePool::pool`]. Schema management lives here too, so a
//! freshly connected pool can bring the database up to date before any
//! repository touches it.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use venuepulse_core::config::{DatabaseConfig, mask_url_password};
use venuepulse_core::error::{AppError, ErrorKind};
use venuepulse_core::result::AppResult;

/// Shared PostgreSQL pool for the reservation ledger and space catalog.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Open the pool. The first connection is established eagerly, so a bad
    /// URL or unreachable server fails here rather than on first use.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect(&config.url)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to connect to {}", mask_url_password(&config.url)),
                    e,
                )
            })?;

        info!(
            url = %mask_url_password(&config.url),
            max_connections = config.max_connections,
            "Connected to PostgreSQL"
        );
        Ok(Self { pool })
    }

    /// Apply any embedded migrations the database has not seen yet.
    pub async fn run_migrations(&self) -> AppResult<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Migration failed", e))?;
        info!("Database schema is up to date");
        Ok(())
    }

    /// Borrow the underlying pool for repository construction.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Round-trip a trivial query to verify the database is reachable.
    pub async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }

    /// Drain and close every connection.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}
