// src/bin/api_server.rs

use city_records::infra::{config::AppConfig, providers, seed};
use city_records::storage;
use city_records::transport;
use city_records::CityService;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        weather_api = %config.weather_api_url,
        country_api = %config.country_api_url,
        timeout_secs = config.http_timeout.as_secs(),
        "configuration loaded"
    );

    // --- Store + pipeline ---
    let store = storage::store_from_url(config.database_url.as_deref()).await?;
    let pipeline = providers::pipeline_from_config(&config)?;
    let city_service = Arc::new(CityService::new(pipeline, store));

    // --- Seeding ---
    seed::seed_from_file(&city_service, &config.seed_file).await;

    // --- API Server ---
    let app_state = transport::http::AppState { city_service };
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(cors);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "API server listening (Swagger UI at /swagger-ui)");

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }

    Ok(())
}
