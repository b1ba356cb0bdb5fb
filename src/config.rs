//! Configuration management for the query collector

use crate::errors::{CollectorError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

pub const DEFAULT_BATCH_SIZE: usize = 500;
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the ingestion API
    pub api_url: String,

    /// Collector identifier assigned by the ingestion API
    pub collector_id: String,

    /// Client authentication key
    pub client_key: String,

    /// Records per delivery chunk
    pub batch_size: usize,

    /// HTTP timeout for delivery requests
    pub http_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables, reading `.env` first if present
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            match lookup(key) {
                Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
                _ => Err(CollectorError::Config(format!("{} must be set", key))),
            }
        };

        let api_url = required("API_URL")?.trim_end_matches('/').to_string();
        let collector_id = required("COLLECTOR_ID")?;
        // Older deployments name the key LUMU_CLIENT_KEY
        let client_key = required("CLIENT_KEY")
            .or_else(|_| required("LUMU_CLIENT_KEY"))
            .map_err(|_| {
                CollectorError::Config("CLIENT_KEY (or LUMU_CLIENT_KEY) must be set".to_string())
            })?;

        let batch_size = match lookup("BATCH_SIZE") {
            Some(value) => value.trim().parse().map_err(|_| {
                CollectorError::Config(format!("BATCH_SIZE is not a valid number: {}", value))
            })?,
            None => DEFAULT_BATCH_SIZE,
        };

        let http_timeout = match lookup("HTTP_TIMEOUT_SECONDS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| {
                    CollectorError::Config(format!(
                        "HTTP_TIMEOUT_SECONDS is not a valid number: {}",
                        value
                    ))
                })?,
            None => DEFAULT_HTTP_TIMEOUT,
        };

        let config = Self {
            api_url,
            collector_id,
            client_key,
            batch_size,
            http_timeout,
        };
        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_url.is_empty() {
            return Err(CollectorError::Config("api_url cannot be empty".to_string()));
        }

        if self.collector_id.is_empty() {
            return Err(CollectorError::Config(
                "collector_id cannot be empty".to_string(),
            ));
        }

        if self.client_key.is_empty() {
            return Err(CollectorError::Config("client_key cannot be empty".to_string()));
        }

        if self.batch_size == 0 {
            return Err(CollectorError::Config(
                "batch_size must be greater than 0".to_string(),
            ));
        }

        if self.http_timeout.is_zero() {
            return Err(CollectorError::Config(
                "http_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Endpoint receiving query chunks, without the key parameter
    pub fn queries_url(&self) -> String {
        format!(
            "{}/collectors/{}/dns/queries",
            self.api_url, self.collector_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_required_values_and_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("API_URL", "https://api.example.com/v1/"),
            ("COLLECTOR_ID", "abc-123"),
            ("CLIENT_KEY", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "https://api.example.com/v1");
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(config.http_timeout, DEFAULT_HTTP_TIMEOUT);
        assert_eq!(
            config.queries_url(),
            "https://api.example.com/v1/collectors/abc-123/dns/queries"
        );
    }

    #[test]
    fn test_missing_value_is_named() {
        let err = Config::from_lookup(lookup_from(&[
            ("API_URL", "https://api.example.com"),
            ("CLIENT_KEY", "secret"),
        ]))
        .unwrap_err();

        assert!(err.to_string().contains("COLLECTOR_ID"));
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let err = Config::from_lookup(lookup_from(&[
            ("API_URL", "https://api.example.com"),
            ("COLLECTOR_ID", "abc"),
            ("CLIENT_KEY", "   "),
        ]))
        .unwrap_err();

        assert!(err.to_string().contains("CLIENT_KEY"));
    }

    #[test]
    fn test_legacy_client_key_name() {
        let config = Config::from_lookup(lookup_from(&[
            ("API_URL", "https://api.example.com"),
            ("COLLECTOR_ID", "abc"),
            ("LUMU_CLIENT_KEY", "legacy-secret"),
        ]))
        .unwrap();
        assert_eq!(config.client_key, "legacy-secret");

        let config = Config::from_lookup(lookup_from(&[
            ("API_URL", "https://api.example.com"),
            ("COLLECTOR_ID", "abc"),
            ("CLIENT_KEY", "new-secret"),
            ("LUMU_CLIENT_KEY", "legacy-secret"),
        ]))
        .unwrap();
        assert_eq!(config.client_key, "new-secret");
    }

    #[test]
    fn test_optional_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("API_URL", "https://api.example.com"),
            ("COLLECTOR_ID", "abc"),
            ("CLIENT_KEY", "secret"),
            ("BATCH_SIZE", "10"),
            ("HTTP_TIMEOUT_SECONDS", "3"),
        ]))
        .unwrap();

        assert_eq!(config.batch_size, 10);
        assert_eq!(config.http_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_batch_size() {
        for value in ["zero", "0", "-5"] {
            let result = Config::from_lookup(lookup_from(&[
                ("API_URL", "https://api.example.com"),
                ("COLLECTOR_ID", "abc"),
                ("CLIENT_KEY", "secret"),
                ("BATCH_SIZE", value),
            ]));
            assert!(matches!(result, Err(CollectorError::Config(_))), "{}", value);
        }
    }
}
