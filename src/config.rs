//! Configuration Module
//!
//! Handles loading client configuration from environment variables.

use std::env;
use std::time::Duration;

/// Default socket read/write timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Default number of pooled connections kept per server
pub const DEFAULT_MAX_IDLE_CONNS: u32 = 100;

/// Client configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Memcached servers, `host:port` or `memcache://host:port`
    pub servers: Vec<String>,
    /// Socket read/write timeout
    pub timeout: Duration,
    /// Maximum pooled connections per server
    pub max_idle_conns: u32,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MEMCACHE_SERVERS` - Comma separated servers (default: localhost:11211)
    /// - `MEMCACHE_TIMEOUT_MS` - Socket timeout in milliseconds (default: 3000)
    /// - `MEMCACHE_MAX_IDLE_CONNS` - Pool size per server (default: 100)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            servers: env::var("MEMCACHE_SERVERS")
                .ok()
                .map(|v| parse_servers(&v))
                .filter(|servers| !servers.is_empty())
                .unwrap_or(defaults.servers),
            timeout: env::var("MEMCACHE_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.timeout),
            max_idle_conns: env::var("MEMCACHE_MAX_IDLE_CONNS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_idle_conns),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            servers: vec!["localhost:11211".to_string()],
            timeout: DEFAULT_TIMEOUT,
            max_idle_conns: DEFAULT_MAX_IDLE_CONNS,
        }
    }
}

fn parse_servers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.servers, vec!["localhost:11211".to_string()]);
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.max_idle_conns, 100);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("MEMCACHE_SERVERS");
        env::remove_var("MEMCACHE_TIMEOUT_MS");
        env::remove_var("MEMCACHE_MAX_IDLE_CONNS");

        let config = Config::from_env();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_servers() {
        assert_eq!(
            parse_servers(" a:1 ,b:2,,"),
            vec!["a:1".to_string(), "b:2".to_string()]
        );
        assert!(parse_servers(" , ").is_empty());
    }
}
