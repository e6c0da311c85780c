//! Slot handlers

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use super::dto::SlotListResponse;
use crate::application::ReportService;
use crate::interfaces::http::common::{error_response, ApiError, ApiResponse};

#[utoipa::path(
    get,
    path = "/api/slots",
    tag = "Slots",
    responses(
        (status = 200, description = "All slots with pool counts", body = ApiResponse<SlotListResponse>)
    )
)]
pub async fn list_slots(
    State(reports): State<Arc<ReportService>>,
) -> Result<Json<ApiResponse<SlotListResponse>>, ApiError> {
    let overview = reports.list_slots().await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(overview.into())))
}
