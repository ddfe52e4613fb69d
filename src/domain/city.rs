//! City records as they are created, stored and patched.

use crate::domain::enrichment::WeatherReport;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Identity assigned by the store on creation. Never changes afterwards.
pub type CityId = i64;

/// Fallback written into a derived code field when the country payload lacks it.
pub const NOT_AVAILABLE: &str = "N/A";

/// A fully enriched city that has not been persisted yet.
///
/// Only the enrichment pipeline builds these; the store turns them into a
/// [`CityRecord`] by assigning an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCity {
    pub name: String,
    pub state: Option<String>,
    pub country: String,
    pub tourist_rating: Option<i32>,
    pub date_established: Option<String>,
    pub estimated_population: Option<i64>,
    pub country_2digit_code: String,
    pub country_3digit_code: String,
    pub currency_code: String,
    /// Raw country-metadata payload, serialized JSON text.
    pub country_data: String,
    /// Weather snapshot `{temperature, description}`, serialized JSON text.
    pub weather: String,
}

/// A persisted city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRecord {
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
    pub country_data: String,
    pub weather: String,
}

impl CityRecord {
    pub fn from_new(id: CityId, city: NewCity) -> Self {
        Self {
            id,
            name: city.name,
            state: city.state,
            country: city.country,
            tourist_rating: city.tourist_rating,
            date_established: city.date_established,
            estimated_population: city.estimated_population,
            country_2digit_code: city.country_2digit_code,
            country_3digit_code: city.country_3digit_code,
            currency_code: city.currency_code,
            country_data: city.country_data,
            weather: city.weather,
        }
    }

    /// Re-expands the stored weather snapshot.
    pub fn weather_report(&self) -> Result<WeatherReport, serde_json::Error> {
        serde_json::from_str(&self.weather)
    }

    /// Applies the mutable subset of fields. Enriched fields are write-once.
    pub fn apply(&mut self, patch: &CityPatch) {
        if let Some(rating) = &patch.tourist_rating {
            self.tourist_rating = *rating;
        }
        if let Some(date) = &patch.date_established {
            self.date_established = date.clone();
        }
        if let Some(population) = &patch.estimated_population {
            self.estimated_population = *population;
        }
    }
}

/// Partial update of the three user-editable fields.
///
/// The outer `Option` says whether the key was present at all; the inner one
/// carries an explicit `null`, which clears the field.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct CityPatch {
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<i32>)]
    pub tourist_rating: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub date_established: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<i64>)]
    pub estimated_population: Option<Option<i64>>,
}

impl CityPatch {
    pub fn is_empty(&self) -> bool {
        self.tourist_rating.is_none()
            && self.date_established.is_none()
            && self.estimated_population.is_none()
    }
}

fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
