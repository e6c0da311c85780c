//! Statistics handlers

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use super::dto::StatsDto;
use crate::application::ReportService;
use crate::interfaces::http::common::{error_response, ApiError, ApiResponse};

#[utoipa::path(
    get,
    path = "/api/stats",
    tag = "Reports",
    responses(
        (status = 200, description = "Revenue and occupancy figures", body = ApiResponse<StatsDto>)
    )
)]
pub async fn get_stats(
    State(reports): State<Arc<ReportService>>,
) -> Result<Json<ApiResponse<StatsDto>>, ApiError> {
    let stats = reports.stats().await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(stats.into())))
}
