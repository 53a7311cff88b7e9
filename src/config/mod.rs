//! Environment-backed configuration.
//!
//! Every setting has a default. Override with the environment variables listed on
//! [`Config`].

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default cache-tier URL used when `REDIS_URL` is not set.
pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";
/// `REDIS_URL` value selecting the in-process cache tier instead of Redis.
pub const MEMORY_CACHE_URL: &str = "memory://";
/// Default durable-tier file.
pub const DEFAULT_STORE_PATH: &str = "./data/shaders.json";

/// What a write does when the cache tier rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheWritePolicy {
    /// Fail the write before the durable tier is touched.
    #[default]
    Strict,
    /// Log and continue with a durable-only write.
    Degrade,
}

impl FromStr for CacheWritePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "degrade" => Ok(Self::Degrade),
            _ => Err(ConfigError::InvalidCachePolicy {
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for CacheWritePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheWritePolicy::Strict => write!(f, "strict"),
            CacheWritePolicy::Degrade => write!(f, "degrade"),
        }
    }
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (`PORT`). Default: `3000`.
    pub port: u16,

    /// IP address to bind to (`BIND_ADDR`). Default: `0.0.0.0`.
    pub bind_addr: IpAddr,

    /// Cache-tier connection string (`REDIS_URL`). Default: `redis://localhost:6379`.
    pub redis_url: String,

    /// Durable-tier JSON file (`STORE_PATH`). Default: `./data/shaders.json`.
    pub store_path: PathBuf,

    /// Upper bound on storage work per request (`REQUEST_TIMEOUT_SECS`). Default: 10s.
    pub request_timeout: Duration,

    /// Cache failure handling on writes (`CACHE_WRITE_POLICY`). Default: strict.
    pub cache_write_policy: CacheWritePolicy,

    /// Max entries for the in-process cache (`MEMORY_CACHE_CAPACITY`). Default: `100_000`.
    pub memory_cache_capacity: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            redis_url: DEFAULT_REDIS_URL.to_string(),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            request_timeout: Duration::from_secs(10),
            cache_write_policy: CacheWritePolicy::default(),
            memory_cache_capacity: 100_000,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "PORT";
    const ENV_BIND_ADDR: &'static str = "BIND_ADDR";
    const ENV_REDIS_URL: &'static str = "REDIS_URL";
    const ENV_STORE_PATH: &'static str = "STORE_PATH";
    const ENV_REQUEST_TIMEOUT_SECS: &'static str = "REQUEST_TIMEOUT_SECS";
    const ENV_CACHE_WRITE_POLICY: &'static str = "CACHE_WRITE_POLICY";
    const ENV_MEMORY_CACHE_CAPACITY: &'static str = "MEMORY_CACHE_CAPACITY";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let redis_url = Self::parse_string_from_env(Self::ENV_REDIS_URL, defaults.redis_url);
        let store_path = Self::parse_path_from_env(Self::ENV_STORE_PATH, defaults.store_path);
        let request_timeout = Self::parse_timeout_from_env(defaults.request_timeout)?;
        let cache_write_policy = match env::var(Self::ENV_CACHE_WRITE_POLICY) {
            Ok(value) => value.parse()?,
            Err(_) => defaults.cache_write_policy,
        };
        let memory_cache_capacity = Self::parse_u64_from_env(
            Self::ENV_MEMORY_CACHE_CAPACITY,
            defaults.memory_cache_capacity,
        );

        Ok(Self {
            port,
            bind_addr,
            redis_url,
            store_path,
            request_timeout,
            cache_write_policy,
            memory_cache_capacity,
        })
    }

    /// Validates paths and basic invariants (does not create files).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store_path.is_dir() {
            return Err(ConfigError::NotAFile {
                path: self.store_path.clone(),
            });
        }

        if !self.uses_memory_cache()
            && !self.redis_url.starts_with("redis://")
            && !self.redis_url.starts_with("rediss://")
        {
            return Err(ConfigError::UnsupportedCacheUrl {
                value: self.redis_url.clone(),
            });
        }

        Ok(())
    }

    /// Returns `true` if `REDIS_URL` selects the in-process cache tier.
    pub fn uses_memory_cache(&self) -> bool {
        self.redis_url == MEMORY_CACHE_URL
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        match self.bind_addr {
            IpAddr::V4(addr) => format!("{}:{}", addr, self.port),
            IpAddr::V6(addr) => format!("[{}]:{}", addr, self.port),
        }
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_timeout_from_env(default: Duration) -> Result<Duration, ConfigError> {
        match env::var(Self::ENV_REQUEST_TIMEOUT_SECS) {
            Ok(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
                _ => Err(ConfigError::InvalidTimeout { value }),
            },
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(default)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(default)
    }

    fn parse_u64_from_env(var_name: &str, default: u64) -> u64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}
