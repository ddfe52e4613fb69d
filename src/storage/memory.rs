//! In-memory city store, used when no database is configured and in tests.

use crate::domain::city::{CityId, CityPatch, CityRecord, NewCity};
use crate::storage::{CityStore, StoreError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    next_id: CityId,
    cities: BTreeMap<CityId, CityRecord>,
}

/// BTreeMap-backed store. Clone-friendly via Arc; ids start at 1 and are never reused.
#[derive(Clone, Default)]
pub struct InMemoryCityStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryCityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CityStore for InMemoryCityStore {
    async fn create(&self, city: NewCity) -> Result<CityId, StoreError> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let id = inner.next_id;
        inner.cities.insert(id, CityRecord::from_new(id, city));
        Ok(id)
    }

    async fn get_all(&self) -> Result<Vec<CityRecord>, StoreError> {
        Ok(self.inner.read().await.cities.values().cloned().collect())
    }

    async fn get_by_id(&self, id: CityId) -> Result<Option<CityRecord>, StoreError> {
        Ok(self.inner.read().await.cities.get(&id).cloned())
    }

    async fn update(&self, id: CityId, patch: &CityPatch) -> Result<CityRecord, StoreError> {
        let mut inner = self.inner.write().await;
        let city = inner.cities.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        city.apply(patch);
        Ok(city.clone())
    }

    async fn delete(&self, id: CityId) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .cities
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn find_by_name_substring(&self, query: &str) -> Result<Vec<CityRecord>, StoreError> {
        let needle = query.to_lowercase();
        Ok(self
            .inner
            .read()
            .await
            .cities
            .values()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_city(name: &str) -> NewCity {
        NewCity {
            name: name.to_string(),
            state: None,
            country: "Spain".to_string(),
            tourist_rating: None,
            date_established: None,
            estimated_population: None,
            country_2digit_code: "ES".to_string(),
            country_3digit_code: "ESP".to_string(),
            currency_code: "EUR".to_string(),
            country_data: "{}".to_string(),
            weather: r#"{"temperature":300.0,"description":"sunny"}"#.to_string(),
        }
    }

    #[tokio::test]
    async fn ids_are_assigned_in_order_and_not_reused() {
        let store = InMemoryCityStore::new();
        let a = store.create(new_city("Madrid")).await.unwrap();
        let b = store.create(new_city("Seville")).await.unwrap();
        store.delete(b).await.unwrap();
        let c = store.create(new_city("Valencia")).await.unwrap();

        assert_eq!((a, b, c), (1, 2, 3));
        let names: Vec<_> = store.get_all().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Madrid", "Valencia"]);
    }

    #[tokio::test]
    async fn search_ignores_case() {
        let store = InMemoryCityStore::new();
        store.create(new_city("Barcelona")).await.unwrap();
        store.create(new_city("Bilbao")).await.unwrap();

        let hits = store.find_by_name_substring("CELO").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Barcelona");
        assert!(store.find_by_name_substring("zzz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_of_missing_id_leaves_store_unchanged() {
        let store = InMemoryCityStore::new();
        store.create(new_city("Granada")).await.unwrap();
        let before = store.get_all().await.unwrap();

        let patch = CityPatch {
            tourist_rating: Some(Some(3)),
            ..Default::default()
        };
        let err = store.update(99, &patch).await.unwrap_err();

        assert!(matches!(err, StoreError::NotFound(99)));
        assert_eq!(store.get_all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn delete_of_missing_id_is_not_found() {
        let store = InMemoryCityStore::new();
        assert!(matches!(store.delete(1).await, Err(StoreError::NotFound(1))));
    }
}
