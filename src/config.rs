//! Configuration Module
//!
//! Handles loading application and cache configuration from environment variables.

use std::env;
use std::str::FromStr;

/// Default port of a Redis-compatible store.
pub const DEFAULT_CACHE_PORT: u16 = 6379;

/// Default TTL in seconds applied by `set_expire_default`.
pub const DEFAULT_EXPIRE_SECONDS: u64 = 3600;

// == Environment ==
/// Deployment environment the application runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Live,
    Staging,
    #[default]
    Dev,
    Cli,
    UnitTest,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "live" | "production" | "prod" => Ok(Self::Live),
            "staging" => Ok(Self::Staging),
            "dev" | "development" => Ok(Self::Dev),
            "cli" => Ok(Self::Cli),
            "unit_test" | "test" => Ok(Self::UnitTest),
            other => Err(format!("unknown environment: {}", other)),
        }
    }
}

// == Cache Config ==
/// Connection settings for the cache store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Store hostname or IP address
    pub host: String,
    /// Store TCP port
    pub port: u16,
    /// TTL in seconds used when callers do not pass one
    pub default_ttl: u64,
}

impl CacheConfig {
    /// Creates a cache config for `host:port` with the default TTL.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            default_ttl: DEFAULT_EXPIRE_SECONDS,
        }
    }

    /// Connection URL understood by the `redis` client.
    pub fn url(&self) -> String {
        format!("redis://{}:{}/", self.host, self.port)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new("127.0.0.1", DEFAULT_CACHE_PORT)
    }
}

// == Config ==
/// Application configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Deployment environment
    pub environment: Environment,
    /// Cache store connection settings
    pub cache: CacheConfig,
    /// HTTP port of the health probe server
    pub server_port: u16,
    /// Seconds between background readiness checks
    pub ready_check_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `APP_ENV` - Deployment environment (default: dev)
    /// - `CACHE_HOST` - Cache store host (default: 127.0.0.1)
    /// - `CACHE_PORT` - Cache store port (default: 6379)
    /// - `CACHE_DEFAULT_TTL` - Default expiry in seconds (default: 3600)
    /// - `SERVER_PORT` - Health probe port (default: 3000)
    /// - `READY_CHECK_INTERVAL` - Readiness check frequency in seconds (default: 5)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            environment: env_or("APP_ENV", defaults.environment),
            cache: CacheConfig {
                host: env::var("CACHE_HOST")
                    .ok()
                    .filter(|v| !v.trim().is_empty())
                    .unwrap_or(defaults.cache.host),
                port: env_or("CACHE_PORT", defaults.cache.port),
                default_ttl: env_or("CACHE_DEFAULT_TTL", defaults.cache.default_ttl),
            },
            server_port: env_or("SERVER_PORT", defaults.server_port),
            ready_check_interval: env_or("READY_CHECK_INTERVAL", defaults.ready_check_interval),
        }
    }

    pub fn is_live(&self) -> bool {
        self.environment == Environment::Live
    }

    pub fn is_staging(&self) -> bool {
        self.environment == Environment::Staging
    }

    pub fn is_dev(&self) -> bool {
        self.environment == Environment::Dev
    }

    pub fn is_cli(&self) -> bool {
        self.environment == Environment::Cli
    }

    pub fn is_unit_test(&self) -> bool {
        self.environment == Environment::UnitTest
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: Environment::Dev,
            cache: CacheConfig::default(),
            server_port: 3000,
            ready_check_interval: 5,
        }
    }
}

/// Parses an environment variable, falling back to `default` when unset or invalid.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
