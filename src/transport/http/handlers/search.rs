use crate::transport::http::handlers::common::{
    failure, service_error_response, success, to_city_responses,
};
use crate::transport::http::types::{ApiResponse, AppState, SearchParams};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

#[utoipa::path(
    get,
    path = "/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Cities whose name contains the query", body = ApiResponse),
        (status = 400, description = "No search query provided", body = ApiResponse),
        (status = 404, description = "No matching cities found", body = ApiResponse)
    )
)]
pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let cities = match state.city_service.search(params.q.as_deref()).await {
        Ok(c) => c,
        Err(e) => return service_error_response(e),
    };
    if cities.is_empty() {
        return failure(StatusCode::NOT_FOUND, "No matching cities found");
    }
    match to_city_responses(cities) {
        Ok(body) => success(StatusCode::OK, body),
        Err(resp) => resp,
    }
}
