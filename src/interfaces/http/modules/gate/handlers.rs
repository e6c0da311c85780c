//! Gate handlers

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use super::dto::{EntryResponse, ExitResponse, ScanRequest};
use crate::application::GateController;
use crate::interfaces::http::common::{error_response, ApiError, ApiResponse, ValidatedJson};

#[utoipa::path(
    post,
    path = "/api/entry",
    tag = "Gate",
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Slot assigned", body = ApiResponse<EntryResponse>),
        (status = 400, description = "Unreadable scan code"),
        (status = 404, description = "Vehicle not registered"),
        (status = 409, description = "Already parked or lot full")
    )
)]
pub async fn vehicle_entry(
    State(gate): State<Arc<GateController>>,
    ValidatedJson(scan): ValidatedJson<ScanRequest>,
) -> Result<Json<ApiResponse<EntryResponse>>, ApiError> {
    let receipt = gate.enter(&scan.qr_data).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(receipt.into())))
}

#[utoipa::path(
    post,
    path = "/api/exit",
    tag = "Gate",
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Session closed and fee computed", body = ApiResponse<ExitResponse>),
        (status = 400, description = "Unreadable scan code"),
        (status = 404, description = "No active parking for this vehicle")
    )
)]
pub async fn vehicle_exit(
    State(gate): State<Arc<GateController>>,
    ValidatedJson(scan): ValidatedJson<ScanRequest>,
) -> Result<Json<ApiResponse<ExitResponse>>, ApiError> {
    let receipt = gate.exit(&scan.qr_data).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(receipt.into())))
}
