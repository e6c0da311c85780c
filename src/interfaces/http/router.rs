//! API router and OpenAPI document

use std::sync::Arc;

use axum::{
    extract::FromRef,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use super::common::ApiResponse;
use super::modules::health::HealthState;
use super::modules::metrics::{http_metrics_middleware, MetricsState};
use super::modules::{gate, health, metrics, sessions, slots, stats, vehicles};
use crate::application::{GateController, ReportService, VehicleRegistryService};

/// State shared by every `/api` route. Handlers extract only the service
/// they need via `FromRef`.
#[derive(Clone)]
pub struct ApiState {
    pub registry: Arc<VehicleRegistryService>,
    pub gate: Arc<GateController>,
    pub reports: Arc<ReportService>,
}

impl FromRef<ApiState> for Arc<VehicleRegistryService> {
    fn from_ref(s: &ApiState) -> Self {
        Arc::clone(&s.registry)
    }
}

impl FromRef<ApiState> for Arc<GateController> {
    fn from_ref(s: &ApiState) -> Self {
        Arc::clone(&s.gate)
    }
}

impl FromRef<ApiState> for Arc<ReportService> {
    fn from_ref(s: &ApiState) -> Self {
        Arc::clone(&s.reports)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        vehicles::register_vehicle,
        vehicles::list_vehicles,
        vehicles::delete_vehicle,
        gate::vehicle_entry,
        gate::vehicle_exit,
        slots::list_slots,
        sessions::list_logs,
        sessions::export_logs,
        stats::get_stats,
    ),
    components(
        schemas(
            ApiResponse<String>,
            health::HealthResponse,
            health::ComponentHealth,
            vehicles::RegisterVehicleRequest,
            vehicles::RegisterVehicleResponse,
            vehicles::VehicleDto,
            vehicles::VehicleListResponse,
            gate::ScanRequest,
            gate::EntryResponse,
            gate::ExitResponse,
            slots::SlotDto,
            slots::SlotStatsDto,
            slots::SlotListResponse,
            sessions::SessionLogDto,
            sessions::SessionLogListResponse,
            stats::StatsDto,
        )
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Vehicles", description = "Vehicle registration and registry management"),
        (name = "Gate", description = "Entry and exit scans"),
        (name = "Slots", description = "Slot pool occupancy"),
        (name = "Reports", description = "Session logs, statistics and CSV export"),
    ),
    info(
        title = "Parking Service API",
        version = "1.0.0",
        description = "Single-site parking manager: registration, gate scans, fees and reports"
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full HTTP router. `/metrics` is mounted only when a
/// Prometheus handle is supplied.
pub fn create_api_router(
    api: ApiState,
    health_state: HealthState,
    metrics_state: Option<MetricsState>,
) -> Router {
    let api_routes = Router::new()
        // Registry
        .route("/register", post(vehicles::register_vehicle))
        .route("/users", get(vehicles::list_vehicles))
        .route("/users/{id}", delete(vehicles::delete_vehicle))
        // Gate
        .route("/entry", post(gate::vehicle_entry))
        .route("/exit", post(gate::vehicle_exit))
        // Reports
        .route("/slots", get(slots::list_slots))
        .route("/logs", get(sessions::list_logs))
        .route("/stats", get(stats::get_stats))
        .route("/export", get(sessions::export_logs))
        .with_state(api);

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health_state);

    let mut router = Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .route("/api-docs/openapi.json", get(openapi_json));

    if let Some(state) = metrics_state {
        router = router.merge(
            Router::new()
                .route("/metrics", get(metrics::prometheus_metrics))
                .with_state(state),
        );
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .route_layer(middleware::from_fn(http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
