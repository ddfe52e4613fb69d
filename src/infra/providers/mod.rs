//! HTTP clients for the external weather and country-metadata providers.

pub mod country;
pub mod weather;

pub use country::RestCountriesClient;
pub use weather::OpenWeatherMapClient;

use crate::domain::enrichment::EnrichmentPipeline;
use crate::infra::config::AppConfig;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Shared client for provider calls. One attempt per request, bounded by `timeout`.
pub fn http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .build()
}

/// Wires both provider clients from configuration into a pipeline.
pub fn pipeline_from_config(config: &AppConfig) -> reqwest::Result<EnrichmentPipeline> {
    let client = http_client(config.http_timeout)?;
    Ok(EnrichmentPipeline::new(
        Arc::new(OpenWeatherMapClient::new(
            client.clone(),
            config.weather_api_url.clone(),
            config.weather_api_key.clone(),
        )),
        Arc::new(RestCountriesClient::new(client, config.country_api_url.clone())),
    ))
}
