//! The city record service.
//!
//! This module sits between the HTTP layer and the collaborators it needs:
//! 1.  The enrichment pipeline, which turns a bare city description into a
//!     fully populated record (or refuses to).
//! 2.  The `CityStore`, which persists, updates and searches records.
//!
//! Records only reach the store after a successful enrichment.

use crate::domain::city::{CityId, CityPatch, CityRecord};
use crate::domain::enrichment::{EnrichmentError, EnrichmentPipeline, EnrichmentRequest};
use crate::infra::seed::SeedEntry;
use crate::storage::{CityStore, StoreError};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("city {0} not found")]
    NotFound(CityId),

    #[error(transparent)]
    Enrichment(#[from] EnrichmentError),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => ServiceError::NotFound(id),
            other => ServiceError::Store(other),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub created: usize,
    pub skipped: usize,
}

#[derive(Clone)]
pub struct CityService {
    pipeline: EnrichmentPipeline,
    store: Arc<dyn CityStore>,
}

impl CityService {
    pub fn new(pipeline: EnrichmentPipeline, store: Arc<dyn CityStore>) -> Self {
        Self { pipeline, store }
    }

    /// Enriches and persists a new city. Nothing is written when enrichment fails.
    pub async fn create_city(&self, request: EnrichmentRequest) -> Result<CityRecord, ServiceError> {
        if request.name.trim().is_empty() {
            return Err(ServiceError::Validation("name is required".to_string()));
        }
        if request.country.trim().is_empty() {
            return Err(ServiceError::Validation("country is required".to_string()));
        }

        let city = self.pipeline.enrich(request).await?;
        let id = self.store.create(city.clone()).await?;
        tracing::info!(id, name = %city.name, country = %city.country, "city created");
        Ok(CityRecord::from_new(id, city))
    }

    pub async fn list_cities(&self) -> Result<Vec<CityRecord>, ServiceError> {
        Ok(self.store.get_all().await?)
    }

    pub async fn get_city(&self, id: CityId) -> Result<CityRecord, ServiceError> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(id))
    }

    /// Updates rating, founding date and population. Enriched fields never change.
    pub async fn update_city(&self, id: CityId, patch: &CityPatch) -> Result<CityRecord, ServiceError> {
        let city = self.store.update(id, patch).await?;
        tracing::info!(id, "city updated");
        Ok(city)
    }

    pub async fn delete_city(&self, id: CityId) -> Result<(), ServiceError> {
        self.store.delete(id).await?;
        tracing::info!(id, "city deleted");
        Ok(())
    }

    /// Case-insensitive substring search on the name. A missing or blank
    /// query is rejected before the store is touched; otherwise the query is
    /// matched as given, surrounding whitespace included.
    pub async fn search(&self, query: Option<&str>) -> Result<Vec<CityRecord>, ServiceError> {
        let query = query
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| ServiceError::Validation("No search query provided".to_string()))?;
        Ok(self.store.find_by_name_substring(query).await?)
    }

    pub async fn ping_store(&self) -> Result<(), ServiceError> {
        Ok(self.store.ping().await?)
    }

    /// Enriches and stores each entry in turn. Entries that fail enrichment
    /// are skipped with a warning; a store failure aborts seeding.
    pub async fn seed(&self, entries: &[SeedEntry]) -> Result<SeedSummary, ServiceError> {
        let mut summary = SeedSummary::default();
        for entry in entries {
            let request = EnrichmentRequest {
                state: entry.state.clone(),
                ..EnrichmentRequest::new(entry.name.clone(), entry.country.clone())
            };
            match self.create_city(request).await {
                Ok(_) => summary.created += 1,
                Err(ServiceError::Enrichment(e)) => {
                    tracing::warn!(name = %entry.name, country = %entry.country, error = %e, "skipping seed entry");
                    summary.skipped += 1;
                }
                Err(ServiceError::Validation(msg)) => {
                    tracing::warn!(name = %entry.name, country = %entry.country, %msg, "skipping invalid seed entry");
                    summary.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }
        tracing::info!(created = summary.created, skipped = summary.skipped, "seeding finished");
        Ok(summary)
    }
}
