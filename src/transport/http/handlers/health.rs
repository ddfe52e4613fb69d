use crate::transport::http::handlers::common::{failure, success};
use crate::transport::http::types::{ApiResponse, AppState};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy (store reachable)", body = ApiResponse),
        (status = 503, description = "Service is unhealthy (store unreachable)", body = ApiResponse)
    )
)]
pub async fn healthcheck_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.city_service.ping_store().await {
        Ok(()) => success(StatusCode::OK, serde_json::json!({ "status": "ok" })),
        Err(e) => failure(
            StatusCode::SERVICE_UNAVAILABLE,
            format!("Store ping failed: {}", e),
        ),
    }
}
