//! Persistence of city records.

use crate::domain::city::{CityId, CityPatch, CityRecord, NewCity};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryCityStore;
pub use postgres::PostgresCityStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("city {0} not found")]
    NotFound(CityId),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// CRUD plus case-insensitive name search over city records.
///
/// Each write is one logical transaction; implementations serialize writes
/// themselves so callers never need an outer lock.
#[async_trait]
pub trait CityStore: Send + Sync {
    /// Persists an enriched city and returns the id assigned to it.
    async fn create(&self, city: NewCity) -> Result<CityId, StoreError>;

    /// All records, ordered by id.
    async fn get_all(&self) -> Result<Vec<CityRecord>, StoreError>;

    async fn get_by_id(&self, id: CityId) -> Result<Option<CityRecord>, StoreError>;

    /// Fails with [`StoreError::NotFound`] and leaves the store unchanged when
    /// `id` does not exist.
    async fn update(&self, id: CityId, patch: &CityPatch) -> Result<CityRecord, StoreError>;

    async fn delete(&self, id: CityId) -> Result<(), StoreError>;

    /// Records whose name contains `query`, ignoring case, ordered by id.
    async fn find_by_name_substring(&self, query: &str) -> Result<Vec<CityRecord>, StoreError>;

    /// Cheap reachability check used by the health endpoint.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Postgres when a database URL is configured, otherwise an in-memory store.
pub async fn store_from_url(database_url: Option<&str>) -> Result<Arc<dyn CityStore>, StoreError> {
    match database_url {
        Some(url) => Ok(Arc::new(PostgresCityStore::connect(url).await?)),
        None => {
            tracing::warn!("DATABASE_URL not set, records will be kept in memory only");
            Ok(Arc::new(InMemoryCityStore::new()))
        }
    }
}
