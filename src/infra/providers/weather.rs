//! OpenWeatherMap current-conditions client.

use crate::domain::enrichment::{FetchError, WeatherFetcher, WeatherReport};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    main: MainReadings,
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

#[derive(Debug, Clone)]
pub struct OpenWeatherMapClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherMapClient {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl WeatherFetcher for OpenWeatherMapClient {
    async fn fetch(&self, city: &str, country: &str) -> Result<WeatherReport, FetchError> {
        let location = format!("{},{}", city, country);
        tracing::debug!(%location, "requesting current weather");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", location.as_str()), ("appid", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::warn!(%location, status = %response.status(), "weather provider refused request");
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body: CurrentConditions = response.json().await?;
        let description = body
            .weather
            .into_iter()
            .next()
            .map(|c| c.description)
            .ok_or_else(|| FetchError::Malformed("empty condition list".to_string()))?;

        Ok(WeatherReport {
            temperature: body.main.temp,
            description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OpenWeatherMapClient {
        OpenWeatherMapClient::new(Client::new(), format!("{}/weather", server.uri()), "secret")
    }

    #[tokio::test]
    async fn parses_temperature_and_first_description() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "Oslo,Norway"))
            .and(query_param("appid", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "main": {"temp": 271.3, "humidity": 80},
                "weather": [
                    {"id": 600, "description": "light snow"},
                    {"id": 701, "description": "mist"}
                ],
                "name": "Oslo"
            })))
            .mount(&mock_server)
            .await;

        let report = client_for(&mock_server).fetch("Oslo", "Norway").await.unwrap();
        assert_eq!(
            report,
            WeatherReport {
                temperature: 271.3,
                description: "light snow".to_string()
            }
        );
    }

    #[tokio::test]
    async fn non_success_status_is_a_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "cod": 401,
                "message": "Invalid API key"
            })))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).fetch("Oslo", "Norway").await.unwrap_err();
        assert!(matches!(err, FetchError::Status(401)));
    }

    #[tokio::test]
    async fn missing_fields_are_malformed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "weather": [{"description": "fog"}]
            })))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).fetch("Oslo", "Norway").await.unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn empty_condition_list_is_malformed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "main": {"temp": 290.0},
                "weather": []
            })))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).fetch("Oslo", "Norway").await.unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[tokio::test]
    async fn unreachable_provider_is_a_transport_failure() {
        let mock_server = MockServer::start().await;
        let url = format!("{}/weather", mock_server.uri());
        drop(mock_server);

        let client = OpenWeatherMapClient::new(Client::new(), url, "secret");
        let err = client.fetch("Oslo", "Norway").await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }
}
