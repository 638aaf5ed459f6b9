//! Reservation ledger — transactional create/cancel over reservations and
//! the booked headcount on spaces.
//!
//! Serialization of the "one CONFIRMED reservation per user" invariant is
//! delegated to PostgreSQL so it holds across multiple server instances:
//! the create path locks the user's confirmed rows with `FOR UPDATE`, and a
//! partial unique index on `(user_id) WHERE status = 'CONFIRMED'` backstops
//! any path that skips the lock.

use sqlx::PgPool;
use tracing::debug;

use venuepulse_core::error::{AppError, ErrorKind};
use venuepulse_core::result::AppResult;
use venuepulse_core::types::id::{ReservationId, SpaceId, UserId};
use venuepulse_entity::reservation::{CreateReservation, Reservation, ReservationStatus};

/// Outcome of a reservation create call.
///
/// `Duplicate` is a normal, cacheable rejection — the caller already holds
/// an active reservation — not an error.
#[derive(Debug, Clone)]
pub enum CreateOutcome {
    /// The reservation was created and the booked count incremented.
    Created(Reservation),
    /// The user already has a CONFIRMED reservation; nothing was written.
    Duplicate,
}

/// Repository for reservation ledger operations.
#[derive(Debug, Clone)]
pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    /// Create a new reservation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a reservation for a user, incrementing the space's booked
    /// count in the same transaction.
    ///
    /// The duplicate check and the insert run under one transaction with the
    /// user's confirmed rows locked, so two concurrent calls for the same
    /// user cannot both pass the check.
    pub async fn create(&self, data: &CreateReservation) -> AppResult<CreateOutcome> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let existing: Option<ReservationId> = sqlx::query_scalar(
            "SELECT id FROM reservations WHERE user_id = $1 AND status = 'CONFIRMED' FOR UPDATE",
        )
        .bind(data.user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check active reservation", e)
        })?;

        if existing.is_some() {
            // Dropping the transaction rolls it back; nothing was written.
            debug!(user_id = %data.user_id, "Duplicate reservation attempt");
            return Ok(CreateOutcome::Duplicate);
        }

        let inserted = sqlx::query_as::<_, Reservation>(
            "INSERT INTO reservations (user_id, space_id, visit_time, status) \
             VALUES ($1, $2, $3, 'CONFIRMED') RETURNING *",
        )
        .bind(data.user_id)
        .bind(data.space_id)
        .bind(data.visit_time)
        .fetch_one(&mut *tx)
        .await;

        let reservation = match inserted {
            Ok(r) => r,
            // The partial unique index fired: another transaction confirmed
            // a reservation for this user between our lock scan and insert.
            Err(e) if is_unique_violation(&e) => {
                debug!(user_id = %data.user_id, "Duplicate caught by unique index");
                return Ok(CreateOutcome::Duplicate);
            }
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Database,
                    "Failed to insert reservation",
                    e,
                ));
            }
        };

        let updated = sqlx::query(
            "UPDATE spaces SET current_count = current_count + 1 WHERE id = $1",
        )
        .bind(data.space_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to increment booked count", e)
        })?;

        if updated.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Space {} not found",
                data.space_id
            )));
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit reservation", e)
        })?;

        Ok(CreateOutcome::Created(reservation))
    }

    /// Cancel a CONFIRMED reservation, decrementing the space's booked
    /// count (floored at zero) in the same transaction.
    ///
    /// Non-elevated callers may only cancel their own reservations.
    pub async fn cancel(
        &self,
        reservation_id: ReservationId,
        user_id: UserId,
        elevated: bool,
    ) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let reservation = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE id = $1 FOR UPDATE",
        )
        .bind(reservation_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load reservation", e)
        })?
        .ok_or_else(|| AppError::not_found(format!("Reservation {reservation_id} not found")))?;

        if reservation.status != ReservationStatus::Confirmed {
            return Err(AppError::conflict(format!(
                "Reservation {reservation_id} is not active"
            )));
        }

        if reservation.user_id != user_id && !elevated {
            return Err(AppError::forbidden(
                "Reservation belongs to a different user",
            ));
        }

        sqlx::query("UPDATE reservations SET status = 'CANCELLED' WHERE id = $1")
            .bind(reservation_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to cancel reservation", e)
            })?;

        // Floored decrement: repeated cancels relative to increments must
        // never drive the booked count negative.
        sqlx::query(
            "UPDATE spaces SET current_count = GREATEST(current_count - 1, 0) WHERE id = $1",
        )
        .bind(reservation.space_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to decrement booked count", e)
        })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit cancellation", e)
        })?;

        Ok(())
    }

    /// Close a reservation as attended on a confirmed physical check-in.
    ///
    /// Terminal, like cancellation; also releases the booked slot.
    pub async fn mark_attended(&self, reservation_id: ReservationId) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let space_id: Option<SpaceId> = sqlx::query_scalar(
            "UPDATE reservations SET status = 'ATTENDED' \
             WHERE id = $1 AND status = 'CONFIRMED' RETURNING space_id",
        )
        .bind(reservation_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to mark attended", e)
        })?;

        let space_id = space_id.ok_or_else(|| {
            AppError::conflict(format!(
                "Reservation {reservation_id} is not active"
            ))
        })?;

        sqlx::query(
            "UPDATE spaces SET current_count = GREATEST(current_count - 1, 0) WHERE id = $1",
        )
        .bind(space_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to decrement booked count", e)
        })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit attendance", e)
        })?;

        Ok(())
    }

    /// Return the user's single CONFIRMED reservation, if any.
    pub async fn find_active_by_user(&self, user_id: UserId) -> AppResult<Option<Reservation>> {
        sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE user_id = $1 AND status = 'CONFIRMED'",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find active reservation", e)
        })
    }

    /// Find a reservation by ID.
    pub async fn find_by_id(&self, id: ReservationId) -> AppResult<Option<Reservation>> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find reservation", e)
            })
    }

    /// List recent reservations for a space (admin view).
    pub async fn find_by_space(
        &self,
        space_id: SpaceId,
        limit: i64,
    ) -> AppResult<Vec<Reservation>> {
        sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE space_id = $1 \
             ORDER BY created_at DESC LIMIT $2",
        )
        .bind(space_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list reservations", e)
        })
    }
}

/// Whether a sqlx error is a PostgreSQL unique-constraint violation.
fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(
        e,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505")
    )
}
