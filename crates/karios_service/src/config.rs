//! Service configuration from environment variables.

use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_HTTP_PORT: u16 = 5000;
const DEFAULT_METRICS_PORT: u16 = 9095;
const DEFAULT_BRAIN_FILE: &str = "karios_brain.json";
const DEFAULT_USER_FILE: &str = "users.json";
const DEFAULT_COINGECKO_BASE_URL: &str = "https://api.coingecko.com/api/v3";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// Runtime configuration for the Karios service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub http_port: u16,
    /// Prometheus exporter port. `0` disables the exporter.
    pub metrics_port: u16,
    /// Glossary JSON file.
    pub brain_file: PathBuf,
    /// Username -> password JSON file.
    pub user_file: PathBuf,
    pub coingecko_base_url: String,
    pub upstream_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
            metrics_port: DEFAULT_METRICS_PORT,
            brain_file: PathBuf::from(DEFAULT_BRAIN_FILE),
            user_file: PathBuf::from(DEFAULT_USER_FILE),
            coingecko_base_url: DEFAULT_COINGECKO_BASE_URL.to_string(),
            upstream_timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        }
    }
}

impl ServiceConfig {
    /// Read configuration from the process environment.
    ///
    /// Unset variables and unparsable numbers fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            http_port: lookup("HTTP_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.http_port),
            metrics_port: lookup("METRICS_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.metrics_port),
            brain_file: lookup("BRAIN_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.brain_file),
            user_file: lookup("USER_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.user_file),
            coingecko_base_url: lookup("COINGECKO_BASE_URL")
                .unwrap_or(defaults.coingecko_base_url),
            upstream_timeout: lookup("UPSTREAM_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.upstream_timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::from_lookup(|_| None);
        assert_eq!(config.http_port, 5000);
        assert_eq!(config.metrics_port, 9095);
        assert_eq!(config.brain_file, PathBuf::from("karios_brain.json"));
        assert_eq!(config.user_file, PathBuf::from("users.json"));
        assert_eq!(config.upstream_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("HTTP_PORT", "8088"),
            ("BRAIN_FILE", "/tmp/brain.json"),
            ("COINGECKO_BASE_URL", "http://localhost:9999"),
            ("UPSTREAM_TIMEOUT_SECS", "3"),
        ]);
        let config = ServiceConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.http_port, 8088);
        assert_eq!(config.brain_file, PathBuf::from("/tmp/brain.json"));
        assert_eq!(config.coingecko_base_url, "http://localhost:9999");
        assert_eq!(config.upstream_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_unparsable_port_falls_back() {
        let config = ServiceConfig::from_lookup(|k| {
            (k == "HTTP_PORT").then(|| "not-a-port".to_string())
        });
        assert_eq!(config.http_port, 5000);
    }
}
