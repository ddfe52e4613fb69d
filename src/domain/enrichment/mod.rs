//! Enrichment of a bare city description with country metadata and weather.
//!
//! The pipeline only depends on the two fetcher traits below, so the real
//! HTTP clients (see `infra::providers`) can be swapped for stubs in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;
use utoipa::ToSchema;

pub mod extractor;
pub mod pipeline;

pub use extractor::{extract_codes, DerivedCodes};
pub use pipeline::{EnrichmentPipeline, EnrichmentRequest};

/// Current conditions as returned to callers and stored with a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeatherReport {
    /// Temperature in the provider's native unit.
    pub temperature: f64,
    pub description: String,
}

/// Why a single provider call produced no usable result.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("provider returned status {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("no country matches '{0}'")]
    NoMatch(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FetchError::Malformed(e.to_string())
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

/// One or both provider calls failed, so no record can be built.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("weather unavailable for {city}, {country}: {source}")]
    Weather {
        city: String,
        country: String,
        source: FetchError,
    },

    #[error("country metadata unavailable for {country}: {source}")]
    Country { country: String, source: FetchError },

    #[error("weather ({weather}) and country metadata ({country_error}) unavailable for {city}, {country}")]
    Both {
        city: String,
        country: String,
        weather: FetchError,
        country_error: FetchError,
    },
}

/// Looks up current conditions for a city.
#[async_trait]
pub trait WeatherFetcher: Send + Sync {
    async fn fetch(&self, city: &str, country: &str) -> Result<WeatherReport, FetchError>;
}

/// Looks up country metadata by name.
///
/// When several countries match, the first one the provider lists wins; no
/// disambiguation is attempted.
#[async_trait]
pub trait CountryFetcher: Send + Sync {
    async fn fetch(&self, country: &str) -> Result<JsonValue, FetchError>;
}
