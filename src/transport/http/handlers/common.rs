use crate::app::city_service::ServiceError;
use crate::domain::city::{CityId, CityRecord};
use crate::transport::http::types::{ApiResponse, CityResponse};
use axum::extract::rejection::PathRejection;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

pub fn success<T: Serialize>(status: StatusCode, data: T) -> Response {
    match serde_json::to_value(data) {
        Ok(data) => (
            status,
            Json(ApiResponse {
                success: true,
                data: Some(data),
                error: None,
            }),
        )
            .into_response(),
        Err(e) => failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

pub fn failure(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(error.into()),
        }),
    )
        .into_response()
}

pub fn service_error_status(e: &ServiceError) -> StatusCode {
    match e {
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ServiceError::Enrichment(_) => StatusCode::BAD_REQUEST,
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn service_error_response(e: ServiceError) -> Response {
    let status = service_error_status(&e);
    let message = match &e {
        ServiceError::Enrichment(inner) => format!("Failed to add city: {}", inner),
        ServiceError::NotFound(_) => "City not found".to_string(),
        other => other.to_string(),
    };
    if status.is_server_error() {
        tracing::error!(error = %e, "request failed");
    } else {
        tracing::warn!(error = %e, "request rejected");
    }
    failure(status, message)
}

/// Unwraps the `{id}` segment, answering a malformed one inside the envelope.
pub fn city_id(path: Result<Path<CityId>, PathRejection>) -> Result<CityId, Response> {
    path.map(|Path(id)| id).map_err(|e| {
        tracing::warn!(error = %e, "rejected city id");
        failure(StatusCode::BAD_REQUEST, format!("Invalid city id: {}", e.body_text()))
    })
}

/// Converts stored records to their response shape, re-expanding the weather snapshot.
pub fn to_city_responses(cities: Vec<CityRecord>) -> Result<Vec<CityResponse>, Response> {
    cities
        .into_iter()
        .map(to_city_response)
        .collect()
}

pub fn to_city_response(city: CityRecord) -> Result<CityResponse, Response> {
    let id = city.id;
    CityResponse::try_from(city).map_err(|e| {
        tracing::error!(id, error = %e, "stored weather snapshot is not valid JSON");
        failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("City {} has a corrupt weather snapshot", id),
        )
    })
}
