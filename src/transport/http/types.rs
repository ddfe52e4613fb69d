use crate::app::city_service::CityService;
use crate::domain::city::{CityId, CityRecord};
use crate::domain::enrichment::{EnrichmentRequest, WeatherReport};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Clone)]
pub struct AppState {
    pub city_service: Arc<CityService>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct CreateCityRequest {
    /// Required, non-blank.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default)]
    pub state: Option<String>,
    /// Required, non-blank. Used both for the weather lookup and the country lookup.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub country: String,
    #[serde(default)]
    pub tourist_rating: Option<i32>,
    /// Free-form date text.
    #[serde(default)]
    pub date_established: Option<String>,
    #[serde(default)]
    pub estimated_population: Option<i64>,
}

/// `null` reads as missing, which validation then rejects with a 400.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<CreateCityRequest> for EnrichmentRequest {
    fn from(r: CreateCityRequest) -> Self {
        EnrichmentRequest {
            name: r.name,
            state: r.state,
            country: r.country,
            tourist_rating: r.tourist_rating,
            date_established: r.date_established,
            estimated_population: r.estimated_population,
        }
    }
}

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Case-insensitive substring of the city name.
    pub q: Option<String>,
}

/// A city as returned to callers. The raw country payload stays in storage.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct CityResponse {
    pub id: CityId,
    pub name: String,
    pub state: Option<String>,
    pub country: String,
    pub tourist_rating: Option<i32>,
    pub date_established: Option<String>,
    pub estimated_population: Option<i64>,
    pub country_2digit_code: String,
    pub country_3digit_code: String,
    pub currency_code: String,
    pub weather: WeatherReport,
}

impl TryFrom<CityRecord> for CityResponse {
    type Error = serde_json::Error;

    fn try_from(city: CityRecord) -> Result<Self, Self::Error> {
        let weather = city.weather_report()?;
        Ok(Self {
            id: city.id,
            name: city.name,
            state: city.state,
            country: city.country,
            tourist_rating: city.tourist_rating,
            date_established: city.date_established,
            estimated_population: city.estimated_population,
            country_2digit_code: city.country_2digit_code,
            country_3digit_code: city.country_3digit_code,
            currency_code: city.currency_code,
            weather,
        })
    }
}
