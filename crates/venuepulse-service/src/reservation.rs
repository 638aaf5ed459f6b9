//! Reservation service.
//!
//! Validates the target space and delegates ledger writes to the repository.
//! The one-CONFIRMED-per-user rule is enforced in the database; this layer
//! only adds space-level checks and authorization.

use chrono::{DateTime, Utc};
use tracing::info;

use venuepulse_core::error::AppError;
use venuepulse_core::result::AppResult;
use venuepulse_core::types::id::{ReservationId, SpaceId};
use venuepulse_database::repositories::reservation::{CreateOutcome, ReservationRepository};
use venuepulse_database::repositories::space::SpaceRepository;
use venuepulse_entity::reservation::{CreateReservation, Reservation};

use crate::context::RequestContext;

/// Service for reservation operations.
#[derive(Debug, Clone)]
pub struct ReservationService {
    reservations: ReservationRepository,
    spaces: SpaceRepository,
}

impl ReservationService {
    /// Create a new reservation service.
    pub fn new(reservations: ReservationRepository, spaces: SpaceRepository) -> Self {
        Self {
            reservations,
            spaces,
        }
    }

    /// Create a reservation for the current user.
    ///
    /// Returns `CreateOutcome::Duplicate` when the user already holds a
    /// CONFIRMED reservation; the HTTP layer renders that as a normal
    /// structured response, not an error.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        space_id: SpaceId,
        visit_time: DateTime<Utc>,
    ) -> AppResult<CreateOutcome> {
        let space = self
            .spaces
            .find_by_id(space_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Space {space_id} not found")))?;

        if !space.is_open() {
            return Err(AppError::conflict(format!(
                "Space {space_id} is not accepting reservations"
            )));
        }

        if visit_time <= ctx.request_time {
            return Err(AppError::validation("visit_time must be in the future"));
        }

        let outcome = self
            .reservations
            .create(&CreateReservation {
                user_id: ctx.user_id,
                space_id,
                visit_time,
            })
            .await?;

        if let CreateOutcome::Created(reservation) = &outcome {
            info!(
                reservation_id = reservation.id.0,
                space_id = space_id.0,
                user_id = %ctx.user_id,
                "Reservation created"
            );
        }
        Ok(outcome)
    }

    /// Cancel a reservation.
    ///
    /// Members may only cancel their own; admins may cancel any.
    pub async fn cancel(
        &self,
        ctx: &RequestContext,
        reservation_id: ReservationId,
    ) -> AppResult<()> {
        self.reservations
            .cancel(reservation_id, ctx.user_id, ctx.is_elevated())
            .await?;
        info!(
            reservation_id = reservation_id.0,
            user_id = %ctx.user_id,
            "Reservation cancelled"
        );
        Ok(())
    }

    /// The current user's CONFIRMED reservation, if any.
    pub async fn find_active(&self, ctx: &RequestContext) -> AppResult<Option<Reservation>> {
        self.reservations.find_active_by_user(ctx.user_id).await
    }

    /// Close the current user's active reservation as attended.
    ///
    /// Called from the check-in path when the user physically arrives at
    /// the space they booked. A user without an active reservation there
    /// is a plain walk-in and this returns `Ok(false)`.
    pub async fn mark_attended_if_reserved(
        &self,
        ctx: &RequestContext,
        space_id: SpaceId,
    ) -> AppResult<bool> {
        let Some(reservation) = self.reservations.find_active_by_user(ctx.user_id).await? else {
            return Ok(false);
        };
        if reservation.space_id != space_id {
            return Ok(false);
        }
        self.reservations.mark_attended(reservation.id).await?;
        info!(
            reservation_id = reservation.id.0,
            user_id = %ctx.user_id,
            "Reservation marked attended"
        );
        Ok(true)
    }

    /// List recent reservations for a space. Admin only.
    pub async fn list_for_space(
        &self,
        ctx: &RequestContext,
        space_id: SpaceId,
        limit: i64,
    ) -> AppResult<Vec<Reservation>> {
        if !ctx.is_elevated() {
            return Err(AppError::forbidden("Admin role required"));
        }
        self.reservations.find_by_space(space_id, limit).await
    }
}
