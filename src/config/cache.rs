//! Cache backend configuration.

use std::{env, time::Duration};

/// How long a fetched weather record stays cached (12 hours)
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 12 * 60 * 60;

/// Configuration for the weather cache
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Redis connection string; the in-memory store is used when unset
    pub redis_url: Option<String>,
    pub ttl_seconds: u64,
    /// Upper bound for a single Redis command
    pub redis_timeout_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
            redis_timeout_ms: 500,
        }
    }
}

impl CacheConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let redis_url = env::var("REDIS_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());

        let ttl_seconds = env::var("CACHE_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v| *v > 0)
            .unwrap_or(defaults.ttl_seconds);

        let redis_timeout_ms = env::var("REDIS_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.redis_timeout_ms);

        Self {
            redis_url,
            ttl_seconds,
            redis_timeout_ms,
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    pub fn redis_timeout(&self) -> Duration {
        Duration::from_millis(self.redis_timeout_ms)
    }
}
