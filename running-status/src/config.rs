//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::CacheConfig;

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Default static asset directory.
pub const DEFAULT_STATIC_DIR: &str = "static";

/// Errors in configuration values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidAddr { var: &'static str, value: String },

    #[error("{var} is not a whole number of seconds: {value}")]
    InvalidSeconds { var: &'static str, value: String },
}

/// Everything `main` needs to start the server.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// `RAIL_RADAR_API_KEY`; empty when unset
    pub api_key: String,
    /// `RAIL_RADAR_BASE_URL`
    pub base_url: Option<String>,
    /// `RAIL_RADAR_MOCK_DIR`; serve recorded responses instead of calling the API
    pub mock_dir: Option<PathBuf>,
    /// `BIND_ADDR`
    pub bind_addr: SocketAddr,
    /// `STATIC_DIR`
    pub static_dir: PathBuf,
    /// `CACHE_TTL_SECS`
    pub cache_ttl: Duration,
}

impl ServerConfig {
    /// Read configuration through a lookup function.
    ///
    /// Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = match get("BIND_ADDR") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidAddr {
                var: "BIND_ADDR",
                value,
            })?,
            None => DEFAULT_BIND_ADDR
                .parse()
                .map_err(|_| ConfigError::InvalidAddr {
                    var: "BIND_ADDR",
                    value: DEFAULT_BIND_ADDR.to_string(),
                })?,
        };

        let cache_ttl = match get("CACHE_TTL_SECS") {
            Some(value) => Duration::from_secs(value.parse().map_err(|_| {
                ConfigError::InvalidSeconds {
                    var: "CACHE_TTL_SECS",
                    value,
                }
            })?),
            None => CacheConfig::default().ttl,
        };

        Ok(Self {
            api_key: get("RAIL_RADAR_API_KEY").unwrap_or_default(),
            base_url: get("RAIL_RADAR_BASE_URL"),
            mock_dir: get("RAIL_RADAR_MOCK_DIR").map(PathBuf::from),
            bind_addr,
            static_dir: get("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
            cache_ttl,
        })
    }

    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Cache configuration implied by these settings.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::default().with_ttl(self.cache_ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.api_key, "");
        assert_eq!(config.base_url, None);
        assert_eq!(config.mock_dir, None);
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:3000");
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("RAIL_RADAR_API_KEY", " secret "),
            ("RAIL_RADAR_BASE_URL", "http://localhost:9000/api"),
            ("RAIL_RADAR_MOCK_DIR", "data/mock_trains"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("STATIC_DIR", "/srv/static"),
            ("CACHE_TTL_SECS", "15"),
        ])
        .unwrap();

        assert_eq!(config.api_key, "secret");
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:9000/api"));
        assert_eq!(config.mock_dir, Some(PathBuf::from("data/mock_trains")));
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.static_dir, PathBuf::from("/srv/static"));
        assert_eq!(config.cache_config().ttl, Duration::from_secs(15));
    }

    #[test]
    fn empty_values_are_unset() {
        let config = config(&[("RAIL_RADAR_MOCK_DIR", ""), ("BIND_ADDR", "  ")]).unwrap();
        assert_eq!(config.mock_dir, None);
        assert_eq!(config.bind_addr.port(), 3000);
    }

    #[test]
    fn invalid_values() {
        assert_eq!(
            config(&[("BIND_ADDR", "localhost")]),
            Err(ConfigError::InvalidAddr {
                var: "BIND_ADDR",
                value: "localhost".to_string()
            })
        );
        assert!(matches!(
            config(&[("CACHE_TTL_SECS", "-1")]),
            Err(ConfigError::InvalidSeconds { .. })
        ));
    }
}
