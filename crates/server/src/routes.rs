use axum::{extract::State, middleware, routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::{observability, types::Health};

use crate::context::{ServiceKind, ServiceState};
use crate::metrics::track_metrics;

pub mod attendance;
pub mod examination;
pub mod faculty;
pub mod students;

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse))
)]
pub async fn health(State(kind): State<ServiceKind>) -> Json<Health> {
    Json(Health::ok(kind.name()))
}

async fn metrics() -> (axum::http::StatusCode, String) {
    observability::encode_metrics()
}

async fn openapi_json(State(kind): State<ServiceKind>) -> Json<utoipa::openapi::OpenApi> {
    Json(crate::openapi::document(kind))
}

/// Build the router of one service: its own endpoints plus health, metrics and the API document.
pub fn build_router(state: ServiceState, cors: CorsLayer) -> Router {
    let kind = state.kind();

    let api = match state {
        ServiceState::Attendance(svc) => attendance::router(svc),
        ServiceState::Examination(svc) => examination::router(svc),
        ServiceState::Faculty(svc) => faculty::router(svc),
        ServiceState::Student(svc) => students::router(svc),
    };

    let ambient = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/api-docs/openapi.json", get(openapi_json))
        .with_state(kind);

    ambient
        .merge(api)
        .route_layer(middleware::from_fn_with_state(kind, track_metrics))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
