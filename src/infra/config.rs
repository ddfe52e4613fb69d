//! Centralized configuration (environment variables + defaults).

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_WEATHER_API_URL: &str = "http://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_COUNTRY_API_URL: &str = "https://restcountries.com/v2/name";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_SEED_FILE: &str = "cities.json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is not a valid {expected}: '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Postgres connection string. When unset the service keeps records in memory.
    pub database_url: Option<String>,
    pub weather_api_key: String,
    pub weather_api_url: String,
    pub country_api_url: String,
    /// Applied to each outbound provider request; there is no retry.
    pub http_timeout: Duration,
    pub bind_addr: String,
    pub seed_file: PathBuf,
}

impl AppConfig {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let http_timeout = match get("HTTP_TIMEOUT_SECS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::Invalid {
                    name: "HTTP_TIMEOUT_SECS",
                    expected: "positive number of seconds",
                    value: v,
                })?,
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Ok(Self {
            database_url: get("DATABASE_URL"),
            weather_api_key: get("OPENWEATHERMAP_API_KEY")
                .ok_or(ConfigError::Missing("OPENWEATHERMAP_API_KEY"))?,
            weather_api_url: get("WEATHER_API_URL")
                .unwrap_or_else(|| DEFAULT_WEATHER_API_URL.to_string()),
            country_api_url: get("COUNTRY_API_URL")
                .unwrap_or_else(|| DEFAULT_COUNTRY_API_URL.to_string()),
            http_timeout,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            seed_file: get("SEED_FILE")
                .unwrap_or_else(|| DEFAULT_SEED_FILE.to_string())
                .into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_only_the_key_is_set() {
        let cfg = AppConfig::from_lookup(lookup(&[("OPENWEATHERMAP_API_KEY", "k")])).unwrap();
        assert_eq!(cfg.database_url, None);
        assert_eq!(cfg.weather_api_url, DEFAULT_WEATHER_API_URL);
        assert_eq!(cfg.country_api_url, DEFAULT_COUNTRY_API_URL);
        assert_eq!(cfg.http_timeout, Duration::from_secs(10));
        assert_eq!(cfg.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(cfg.seed_file, PathBuf::from("cities.json"));
    }

    #[test]
    fn api_key_is_required() {
        let err = AppConfig::from_lookup(lookup(&[("OPENWEATHERMAP_API_KEY", "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("OPENWEATHERMAP_API_KEY"));
    }

    #[test]
    fn bad_timeout_is_rejected() {
        for bad in ["abc", "0", "-3"] {
            let err = AppConfig::from_lookup(lookup(&[
                ("OPENWEATHERMAP_API_KEY", "k"),
                ("HTTP_TIMEOUT_SECS", bad),
            ]))
            .unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { name: "HTTP_TIMEOUT_SECS", .. }));
        }
    }

    #[test]
    fn overrides_are_read() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("OPENWEATHERMAP_API_KEY", "k"),
            ("DATABASE_URL", "postgres://localhost/cities"),
            ("HTTP_TIMEOUT_SECS", "3"),
            ("BIND_ADDR", "127.0.0.1:8080"),
        ]))
        .unwrap();
        assert_eq!(cfg.database_url.as_deref(), Some("postgres://localhost/cities"));
        assert_eq!(cfg.http_timeout, Duration::from_secs(3));
        assert_eq!(cfg.bind_addr, "127.0.0.1:8080");
    }
}
