//! Fan-out/fan-in orchestration of the two provider lookups.

use crate::domain::city::NewCity;
use crate::domain::enrichment::{
    extract_codes, CountryFetcher, EnrichmentError, WeatherFetcher,
};
use std::sync::Arc;

/// Caller-supplied description of a city to enrich.
#[derive(Debug, Clone, Default)]
pub struct EnrichmentRequest {
    pub name: String,
    pub state: Option<String>,
    pub country: String,
    pub tourist_rating: Option<i32>,
    pub date_established: Option<String>,
    pub estimated_population: Option<i64>,
}

impl EnrichmentRequest {
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            ..Default::default()
        }
    }
}

/// Stateless between calls; cheap to clone and share across handlers.
#[derive(Clone)]
pub struct EnrichmentPipeline {
    weather: Arc<dyn WeatherFetcher>,
    country: Arc<dyn CountryFetcher>,
}

impl EnrichmentPipeline {
    pub fn new(weather: Arc<dyn WeatherFetcher>, country: Arc<dyn CountryFetcher>) -> Self {
        Self { weather, country }
    }

    /// Fetches weather and country metadata concurrently and assembles a
    /// [`NewCity`]. Both lookups must succeed; the record is not persisted here.
    pub async fn enrich(&self, request: EnrichmentRequest) -> Result<NewCity, EnrichmentError> {
        let (weather, country) = tokio::join!(
            self.weather.fetch(&request.name, &request.country),
            self.country.fetch(&request.country),
        );

        let (weather, country_data) = match (weather, country) {
            (Ok(w), Ok(c)) => (w, c),
            (Err(source), Ok(_)) => {
                return Err(EnrichmentError::Weather {
                    city: request.name,
                    country: request.country,
                    source,
                })
            }
            (Ok(_), Err(source)) => {
                return Err(EnrichmentError::Country {
                    country: request.country,
                    source,
                })
            }
            (Err(weather), Err(country_error)) => {
                return Err(EnrichmentError::Both {
                    city: request.name,
                    country: request.country,
                    weather,
                    country_error,
                })
            }
        };

        let codes = extract_codes(&country_data);
        let country_data = country_data.to_string();
        let weather = serde_json::json!({
            "temperature": weather.temperature,
            "description": weather.description,
        })
        .to_string();

        tracing::debug!(
            city = %request.name,
            country = %request.country,
            code2 = %codes.code2,
            "enrichment complete"
        );

        Ok(NewCity {
            name: request.name,
            state: request.state,
            country: request.country,
            tourist_rating: request.tourist_rating,
            date_established: request.date_established,
            estimated_population: request.estimated_population,
            country_2digit_code: codes.code2,
            country_3digit_code: codes.code3,
            currency_code: codes.currency_code,
            country_data,
            weather,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::city::NOT_AVAILABLE;
    use crate::domain::enrichment::{FetchError, WeatherReport};
    use async_trait::async_trait;
    use serde_json::{json, Value as JsonValue};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Barrier;

    pub(crate) struct StubWeather {
        pub result: Option<WeatherReport>,
        pub calls: AtomicUsize,
    }

    impl StubWeather {
        pub(crate) fn ok(temperature: f64, description: &str) -> Self {
            Self {
                result: Some(WeatherReport {
                    temperature,
                    description: description.to_string(),
                }),
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                result: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl WeatherFetcher for StubWeather {
        async fn fetch(&self, _city: &str, _country: &str) -> Result<WeatherReport, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone().ok_or(FetchError::Status(401))
        }
    }

    pub(crate) struct StubCountry {
        pub result: Option<JsonValue>,
    }

    #[async_trait]
    impl CountryFetcher for StubCountry {
        async fn fetch(&self, country: &str) -> Result<JsonValue, FetchError> {
            self.result
                .clone()
                .ok_or_else(|| FetchError::NoMatch(country.to_string()))
        }
    }

    pub(crate) fn pipeline(weather: StubWeather, country: Option<JsonValue>) -> EnrichmentPipeline {
        EnrichmentPipeline::new(
            Arc::new(weather),
            Arc::new(StubCountry { result: country }),
        )
    }

    #[tokio::test]
    async fn assembles_record_from_both_payloads() {
        let payload = json!({"alpha-2": "US", "alpha-3": "USA", "currencies": [{"code": "USD"}]});
        let p = pipeline(StubWeather::ok(295.1, "clear sky"), Some(payload.clone()));

        let mut request = EnrichmentRequest::new("Austin", "United States");
        request.state = Some("Texas".to_string());
        request.tourist_rating = Some(5);

        let city = p.enrich(request).await.unwrap();
        assert_eq!(city.country_2digit_code, "US");
        assert_eq!(city.country_3digit_code, "USA");
        assert_eq!(city.currency_code, "USD");
        assert_eq!(city.state.as_deref(), Some("Texas"));
        assert_eq!(city.tourist_rating, Some(5));
        assert_eq!(city.date_established, None);
        assert_eq!(city.estimated_population, None);

        let stored_country: JsonValue = serde_json::from_str(&city.country_data).unwrap();
        assert_eq!(stored_country, payload);
        let stored_weather: WeatherReport = serde_json::from_str(&city.weather).unwrap();
        assert_eq!(stored_weather.temperature, 295.1);
        assert_eq!(stored_weather.description, "clear sky");
    }

    #[tokio::test]
    async fn partial_country_payload_still_enriches() {
        let p = pipeline(
            StubWeather::ok(280.0, "mist"),
            Some(json!({"alpha-2": "FR", "currencies": []})),
        );
        let city = p.enrich(EnrichmentRequest::new("Paris", "France")).await.unwrap();
        assert_eq!(city.country_2digit_code, "FR");
        assert_eq!(city.country_3digit_code, NOT_AVAILABLE);
        assert_eq!(city.currency_code, NOT_AVAILABLE);
    }

    #[tokio::test]
    async fn weather_failure_fails_enrichment() {
        let p = pipeline(StubWeather::failing(), Some(json!({"alpha-2": "US"})));
        let err = p
            .enrich(EnrichmentRequest::new("Austin", "United States"))
            .await
            .unwrap_err();
        assert!(matches!(err, EnrichmentError::Weather { .. }));
    }

    #[tokio::test]
    async fn country_failure_fails_enrichment() {
        let p = pipeline(StubWeather::ok(1.0, "snow"), None);
        let err = p
            .enrich(EnrichmentRequest::new("Nowhere", "Atlantis"))
            .await
            .unwrap_err();
        assert!(matches!(err, EnrichmentError::Country { .. }));
    }

    #[tokio::test]
    async fn both_failing_reports_both() {
        let p = pipeline(StubWeather::failing(), None);
        let err = p
            .enrich(EnrichmentRequest::new("Nowhere", "Atlantis"))
            .await
            .unwrap_err();
        assert!(matches!(err, EnrichmentError::Both { .. }));
    }

    #[tokio::test]
    async fn weather_snapshot_keeps_every_bit_of_the_temperature() {
        let temperature = 203.92036786346534_f64;
        let p = pipeline(StubWeather::ok(temperature, "broken clouds"), Some(json!({})));
        let city = p.enrich(EnrichmentRequest::new("Oslo", "Norway")).await.unwrap();

        let record = crate::domain::city::CityRecord::from_new(1, city);
        let report = record.weather_report().unwrap();
        assert_eq!(report.temperature.to_bits(), temperature.to_bits());
        assert_eq!(report.description, "broken clouds");
    }

    /// Both lookups wait on the same barrier, so neither returns until the
    /// other has started.
    struct GatedWeather(Arc<Barrier>);

    #[async_trait]
    impl WeatherFetcher for GatedWeather {
        async fn fetch(&self, _city: &str, _country: &str) -> Result<WeatherReport, FetchError> {
            self.0.wait().await;
            Ok(WeatherReport {
                temperature: 290.0,
                description: "clear sky".to_string(),
            })
        }
    }

    struct GatedCountry(Arc<Barrier>);

    #[async_trait]
    impl CountryFetcher for GatedCountry {
        async fn fetch(&self, _country: &str) -> Result<JsonValue, FetchError> {
            self.0.wait().await;
            Ok(json!({"alpha-2": "PT", "alpha-3": "PRT", "currencies": [{"code": "EUR"}]}))
        }
    }

    #[tokio::test]
    async fn lookups_run_concurrently() {
        let barrier = Arc::new(Barrier::new(2));
        let p = EnrichmentPipeline::new(
            Arc::new(GatedWeather(barrier.clone())),
            Arc::new(GatedCountry(barrier)),
        );

        let city = tokio::time::timeout(
            Duration::from_secs(5),
            p.enrich(EnrichmentRequest::new("Lisbon", "Portugal")),
        )
        .await
        .expect("lookups were awaited one after the other")
        .unwrap();
        assert_eq!(city.country_3digit_code, "PRT");
        assert_eq!(city.currency_code, "EUR");
    }
}
