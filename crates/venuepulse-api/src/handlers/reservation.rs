//! Reservation handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use validator::Validate;

use venuepulse_core::error::AppError;
use venuepulse_core::types::id::{ReservationId, SpaceId};
use venuepulse_database::repositories::reservation::CreateOutcome;

use crate::dto::request::{CreateReservationRequest, ReservationListQuery};
use crate::dto::response::{
    ApiResponse, CreateReservationResponse, MessageResponse, ReservationResponse,
};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/reservations
pub async fn create_reservation(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateReservationRequest>,
) -> Result<Json<ApiResponse<CreateReservationResponse>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let outcome = state
        .reservation_service
        .create(&auth, SpaceId(req.space_id), req.visit_time)
        .await?;

    let body = match outcome {
        CreateOutcome::Created(reservation) => CreateReservationResponse {
            status: "SUCCESS".to_string(),
            reservation_id: Some(reservation.id.0),
        },
        CreateOutcome::Duplicate => CreateReservationResponse {
            status: "DUPLICATE".to_string(),
            reservation_id: None,
        },
    };
    Ok(Json(ApiResponse::ok(body)))
}

/// DELETE /api/reservations/{id}
pub async fn cancel_reservation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .reservation_service
        .cancel(&auth, ReservationId(id))
        .await?;

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Reservation cancelled".to_string(),
    })))
}

/// GET /api/reservations/active
pub async fn active_reservation(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Option<ReservationResponse>>>, ApiError> {
    let reservation = state.reservation_service.find_active(&auth).await?;
    Ok(Json(ApiResponse::ok(
        reservation.map(ReservationResponse::from),
    )))
}

/// GET /api/spaces/{id}/reservations (admin)
pub async fn list_space_reservations(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(space_id): Path<i64>,
    Query(query): Query<ReservationListQuery>,
) -> Result<Json<ApiResponse<Vec<ReservationResponse>>>, ApiError> {
    let reservations = state
        .reservation_service
        .list_for_space(&auth, SpaceId(space_id), query.limit)
        .await?;

    Ok(Json(ApiResponse::ok(
        reservations
            .into_iter()
            .map(ReservationResponse::from)
            .collect(),
    )))
}
