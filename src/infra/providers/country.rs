//! REST Countries lookup by name.

use crate::domain::enrichment::{CountryFetcher, FetchError};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone)]
pub struct RestCountriesClient {
    client: Client,
    base_url: String,
}

impl RestCountriesClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// `{base_url}/{country}` with the name percent-encoded as one path segment.
    fn lookup_url(&self, country: &str) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| FetchError::Transport(format!("invalid country api url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| FetchError::Transport("country api url cannot take a path".to_string()))?
            .pop_if_empty()
            .push(country);
        Ok(url)
    }
}

#[async_trait]
impl CountryFetcher for RestCountriesClient {
    /// Returns the first country the provider lists for `country`.
    async fn fetch(&self, country: &str) -> Result<JsonValue, FetchError> {
        let url = self.lookup_url(country)?;
        tracing::debug!(%url, "requesting country metadata");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            tracing::warn!(country, status = %response.status(), "country provider refused request");
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let matches: Vec<JsonValue> = response.json().await?;
        if matches.len() > 1 {
            tracing::debug!(country, candidates = matches.len(), "several countries match, using the first");
        }
        match matches.into_iter().next() {
            Some(first) if first.is_object() => Ok(first),
            Some(_) => Err(FetchError::Malformed(
                "country entry is not an object".to_string(),
            )),
            None => Err(FetchError::NoMatch(country.to_string())),
        }
    }
}
