use crate::domain::city::{CityId, CityPatch};
use crate::transport::http::handlers::common::{
    city_id, failure, service_error_response, success, to_city_response, to_city_responses,
};
use crate::transport::http::types::{ApiResponse, AppState, CreateCityRequest};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/cities",
    responses(
        (status = 200, description = "All cities, ordered by id", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn list_cities_handler(State(state): State<AppState>) -> impl IntoResponse {
    let cities = match state.city_service.list_cities().await {
        Ok(c) => c,
        Err(e) => return service_error_response(e),
    };
    match to_city_responses(cities) {
        Ok(body) => success(StatusCode::OK, body),
        Err(resp) => resp,
    }
}

#[utoipa::path(
    get,
    path = "/cities/{id}",
    params(
        ("id" = i64, Path, description = "City id")
    ),
    responses(
        (status = 200, description = "The city", body = ApiResponse),
        (status = 400, description = "Malformed id", body = ApiResponse),
        (status = 404, description = "City not found", body = ApiResponse)
    )
)]
pub async fn get_city_handler(
    State(state): State<AppState>,
    id: Result<Path<CityId>, PathRejection>,
) -> impl IntoResponse {
    let id = match city_id(id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let city = match state.city_service.get_city(id).await {
        Ok(c) => c,
        Err(e) => return service_error_response(e),
    };
    match to_city_response(city) {
        Ok(body) => success(StatusCode::OK, body),
        Err(resp) => resp,
    }
}

#[utoipa::path(
    post,
    path = "/cities",
    request_body = CreateCityRequest,
    responses(
        (status = 201, description = "City enriched and stored", body = ApiResponse),
        (status = 400, description = "Missing name/country, or enrichment failed", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn create_city_handler(
    State(state): State<AppState>,
    request: Result<Json<CreateCityRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => {
            return failure(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!(
                    "Invalid JSON body: {} (expected: {{\"name\": ..., \"country\": ...}})",
                    e
                ),
            );
        }
    };

    let city = match state.city_service.create_city(request.into()).await {
        Ok(c) => c,
        Err(e) => return service_error_response(e),
    };
    match to_city_response(city) {
        Ok(body) => success(StatusCode::CREATED, body),
        Err(resp) => resp,
    }
}

#[utoipa::path(
    put,
    path = "/cities/{id}",
    params(
        ("id" = i64, Path, description = "City id")
    ),
    request_body = CityPatch,
    responses(
        (status = 200, description = "City updated", body = ApiResponse),
        (status = 400, description = "Malformed id", body = ApiResponse),
        (status = 404, description = "City not found", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse)
    )
)]
pub async fn update_city_handler(
    State(state): State<AppState>,
    id: Result<Path<CityId>, PathRejection>,
    patch: Result<Json<CityPatch>, JsonRejection>,
) -> impl IntoResponse {
    let id = match city_id(id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Json(patch) = match patch {
        Ok(v) => v,
        Err(e) => {
            return failure(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Invalid JSON body: {}", e),
            );
        }
    };

    let city = match state.city_service.update_city(id, &patch).await {
        Ok(c) => c,
        Err(e) => return service_error_response(e),
    };
    match to_city_response(city) {
        Ok(body) => success(StatusCode::OK, body),
        Err(resp) => resp,
    }
}

#[utoipa::path(
    delete,
    path = "/cities/{id}",
    params(
        ("id" = i64, Path, description = "City id")
    ),
    responses(
        (status = 200, description = "City deleted", body = ApiResponse),
        (status = 400, description = "Malformed id", body = ApiResponse),
        (status = 404, description = "City not found", body = ApiResponse)
    )
)]
pub async fn delete_city_handler(
    State(state): State<AppState>,
    id: Result<Path<CityId>, PathRejection>,
) -> impl IntoResponse {
    let id = match city_id(id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match state.city_service.delete_city(id).await {
        Ok(()) => success(StatusCode::OK, serde_json::json!({ "id": id, "deleted": true })),
        Err(e) => service_error_response(e),
    }
}
