//! Space repository implementation.

use sqlx::PgPool;

use venuepulse_core::error::{AppError, ErrorKind};
use venuepulse_core::result::AppResult;
use venuepulse_core::types::id::SpaceId;
use venuepulse_entity::space::{Space, SpaceStatus};

/// Repository for space CRUD and query operations.
///
/// Note that `current_count` mutation lives in the reservation repository —
/// the ledger owns that field and this repository never writes it.
#[derive(Debug, Clone)]
pub struct SpaceRepository {
    pool: PgPool,
}

impl SpaceRepository {
    /// Create a new space repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all registered spaces.
    pub async fn find_all(&self) -> AppResult<Vec<Space>> {
        sqlx::query_as::<_, Space>("SELECT * FROM spaces ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list spaces", e))
    }

    /// Find a space by ID.
    pub async fn find_by_id(&self, id: SpaceId) -> AppResult<Option<Space>> {
        sqlx::query_as::<_, Space>("SELECT * FROM spaces WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find space", e))
    }

    /// Register a new space.
    pub async fn create(
        &self,
        name: &str,
        address: Option<&str>,
        phone: Option<&str>,
        capacity: i32,
    ) -> AppResult<Space> {
        sqlx::query_as::<_, Space>(
            "INSERT INTO spaces (name, address, phone, capacity) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(name)
        .bind(address)
        .bind(phone)
        .bind(capacity)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create space", e))
    }

    /// Update the operational status of a space.
    pub async fn set_status(&self, id: SpaceId, status: SpaceStatus) -> AppResult<()> {
        let result = sqlx::query("UPDATE spaces SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update space status", e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Space {id} not found")));
        }
        Ok(())
    }
}
