//! Space handlers.

use axum::Json;
use axum::extract::{Path, State};
use tracing::warn;
use validator::Validate;

use venuepulse_core::error::AppError;
use venuepulse_core::types::id::SpaceId;
use venuepulse_entity::space::SpaceStatus;

use crate::dto::request::{CreateSpaceRequest, SetSpaceStatusRequest};
use crate::dto::response::{ApiResponse, MessageResponse, SpaceResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/spaces
pub async fn list_spaces(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<SpaceResponse>>>, ApiError> {
    let spaces = state.space_repo.find_all().await?;
    Ok(Json(ApiResponse::ok(
        spaces.into_iter().map(SpaceResponse::from).collect(),
    )))
}

/// GET /api/spaces/{id}
pub async fn get_space(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<SpaceResponse>>, ApiError> {
    let space = state
        .space_repo
        .find_by_id(SpaceId(id))
        .await?
        .ok_or_else(|| AppError::not_found(format!("Space {id} not found")))?;
    Ok(Json(ApiResponse::ok(SpaceResponse::from(space))))
}

/// POST /api/spaces (admin)
pub async fn create_space(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateSpaceRequest>,
) -> Result<Json<ApiResponse<SpaceResponse>>, ApiError> {
    if !auth.is_elevated() {
        return Err(AppError::forbidden("Admin role required").into());
    }
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let space = state
        .space_repo
        .create(
            &req.name,
            req.address.as_deref(),
            req.phone.as_deref(),
            req.capacity,
        )
        .await?;

    // Prime the capacity cache so congestion reads don't fall back to the
    // database on first hit.
    if let Err(e) = state
        .occupancy
        .set_capacity(space.id, i64::from(space.capacity))
        .await
    {
        warn!(space_id = space.id.0, error = %e, "Failed to cache capacity");
    }

    Ok(Json(ApiResponse::ok(SpaceResponse::from(space))))
}

/// PUT /api/spaces/{id}/status (admin)
pub async fn set_space_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<SetSpaceStatusRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    if !auth.is_elevated() {
        return Err(AppError::forbidden("Admin role required").into());
    }

    let status: SpaceStatus = req
        .status
        .parse()
        .map_err(|_| AppError::validation(format!("Unknown space status: {}", req.status)))?;

    state.space_repo.set_status(SpaceId(id), status).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: format!("Space status set to {status}"),
    })))
}
