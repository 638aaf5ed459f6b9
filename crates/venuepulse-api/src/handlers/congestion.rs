//! Congestion read handlers.

use axum::Json;
use axum::extract::{Path, State};

use venuepulse_core::types::id::SpaceId;

use crate::dto::response::{ApiResponse, CongestionResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/spaces/{id}/congestion
///
/// Public read: congestion is display data for people deciding whether to
/// visit, so no authentication is required.
pub async fn get_congestion(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<CongestionResponse>>, ApiError> {
    let report = state.congestion_service.report(SpaceId(id)).await?;

    Ok(Json(ApiResponse::ok(CongestionResponse {
        space_id: report.space_id.0,
        current_count: report.current_count,
        max_capacity: report.max_capacity,
        ratio: report.ratio,
        smoothed_ratio: report.smoothed_ratio,
    })))
}
