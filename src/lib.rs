pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::city_service::{CityService, SeedSummary, ServiceError};
pub use domain::city::{CityId, CityPatch, CityRecord, NewCity, NOT_AVAILABLE};
pub use domain::enrichment::{
    extract_codes, CountryFetcher, DerivedCodes, EnrichmentError, EnrichmentPipeline,
    EnrichmentRequest, FetchError, WeatherFetcher, WeatherReport,
};
pub use infra::config::AppConfig;
pub use storage::{CityStore, InMemoryCityStore, PostgresCityStore, StoreError};
