//! Vehicle registry handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::dto::{RegisterVehicleRequest, RegisterVehicleResponse, VehicleDto, VehicleListResponse};
use crate::application::VehicleRegistryService;
use crate::interfaces::http::common::{error_response, ApiError, ApiResponse, ValidatedJson};

#[utoipa::path(
    post,
    path = "/api/register",
    tag = "Vehicles",
    request_body = RegisterVehicleRequest,
    responses(
        (status = 201, description = "Vehicle registered", body = ApiResponse<RegisterVehicleResponse>),
        (status = 400, description = "Missing or malformed fields"),
        (status = 409, description = "Vehicle already registered"),
        (status = 422, description = "Field validation failed")
    )
)]
pub async fn register_vehicle(
    State(registry): State<Arc<VehicleRegistryService>>,
    ValidatedJson(request): ValidatedJson<RegisterVehicleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RegisterVehicleResponse>>), ApiError> {
    let registration = registry
        .register(request.into())
        .await
        .map_err(error_response)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(registration.into())),
    ))
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Vehicles",
    responses(
        (status = 200, description = "Registered vehicles, newest first", body = ApiResponse<VehicleListResponse>)
    )
)]
pub async fn list_vehicles(
    State(registry): State<Arc<VehicleRegistryService>>,
) -> Result<Json<ApiResponse<VehicleListResponse>>, ApiError> {
    let vehicles = registry.list().await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(VehicleListResponse {
        users: vehicles.into_iter().map(VehicleDto::from).collect(),
    })))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Vehicles",
    params(("id" = i32, Path, description = "Vehicle id")),
    responses(
        (status = 200, description = "Vehicle deleted"),
        (status = 404, description = "Vehicle not found"),
        (status = 409, description = "Vehicle is currently parked")
    )
)]
pub async fn delete_vehicle(
    State(registry): State<Arc<VehicleRegistryService>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    registry.delete(id).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(())))
}
