use crate::domain::city::CityPatch;
use crate::domain::enrichment::WeatherReport;
use crate::transport::http::handlers::{cities, health, search};
use crate::transport::http::types::{ApiResponse, AppState, CityResponse, CreateCityRequest};
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        cities::list_cities_handler,
        cities::get_city_handler,
        cities::create_city_handler,
        cities::update_city_handler,
        cities::delete_city_handler,
        search::search_handler
    ),
    components(schemas(
        ApiResponse,
        CreateCityRequest,
        CityPatch,
        CityResponse,
        WeatherReport
    ))
)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route(
            "/cities",
            get(cities::list_cities_handler).post(cities::create_city_handler),
        )
        .route(
            "/cities/:id",
            get(cities::get_city_handler)
                .put(cities::update_city_handler)
                .delete(cities::delete_city_handler),
        )
        .route("/search", get(search::search_handler))
        .with_state(app_state)
}
