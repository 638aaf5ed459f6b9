//! Check-in and check-out handlers.
//!
//! These only enqueue events; counter application happens asynchronously in
//! the pipeline worker. A check-in at the space the user booked also closes
//! the reservation as attended.

use axum::Json;
use axum::extract::State;
use validator::Validate;

use venuepulse_core::error::AppError;
use venuepulse_core::types::id::SpaceId;
use venuepulse_entity::checkin::CheckInAction;

use crate::dto::request::CheckInRequest;
use crate::dto::response::{ApiResponse, CheckInResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/checkin
pub async fn check_in(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CheckInRequest>,
) -> Result<Json<ApiResponse<CheckInResponse>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let space_id = SpaceId(req.space_id);

    let user_id = auth.user_id.to_string();
    state
        .checkin_producer
        .publish(space_id, &user_id, CheckInAction::In)
        .await?;

    let attended = state
        .reservation_service
        .mark_attended_if_reserved(&auth, space_id)
        .await?;

    Ok(Json(ApiResponse::ok(CheckInResponse {
        status: "ACCEPTED".to_string(),
        attended,
    })))
}

/// POST /api/checkout
pub async fn check_out(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CheckInRequest>,
) -> Result<Json<ApiResponse<CheckInResponse>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let user_id = auth.user_id.to_string();
    state
        .checkin_producer
        .publish(SpaceId(req.space_id), &user_id, CheckInAction::Out)
        .await?;

    Ok(Json(ApiResponse::ok(CheckInResponse {
        status: "ACCEPTED".to_string(),
        attended: false,
    })))
}
