//! Startup seed list: `[{"name": ..., "country": ..., "state": ...?}, ...]`.

use crate::app::city_service::{CityService, SeedSummary};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeedEntry {
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub state: Option<String>,
}

pub fn parse_seed_list(json: &str) -> anyhow::Result<Vec<SeedEntry>> {
    Ok(serde_json::from_str(json)?)
}

/// Reads the seed file. A missing file yields an empty list.
pub async fn load_seed_file(path: &Path) -> anyhow::Result<Vec<SeedEntry>> {
    let json = match tokio::fs::read_to_string(path).await {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "seed file not found, skipping seeding");
            return Ok(Vec::new());
        }
        Err(e) => return Err(anyhow::anyhow!("failed to read {}: {}", path.display(), e)),
    };
    parse_seed_list(&json).map_err(|e| anyhow::anyhow!("invalid seed file {}: {}", path.display(), e))
}

/// Startup seeding. An unreadable file or a store failure is logged and the
/// server carries on with whatever was stored; `None` means seeding stopped early.
pub async fn seed_from_file(service: &CityService, path: &Path) -> Option<SeedSummary> {
    let entries = match load_seed_file(path).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, "skipping seeding");
            return None;
        }
    };
    if entries.is_empty() {
        return Some(SeedSummary::default());
    }

    tracing::info!(count = entries.len(), file = %path.display(), "seeding cities");
    match service.seed(&entries).await {
        Ok(summary) => Some(summary),
        Err(e) => {
            tracing::warn!(error = %e, "seeding aborted");
            None
        }
    }
}
