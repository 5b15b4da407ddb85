//! Key/value stores with per-key expiry used as the weather read-through cache.

use crate::utils::clock::{Clock, SystemClock};
use async_trait::async_trait;
use redis::{AsyncCommands, RedisResult, aio::ConnectionManager};
use std::{
    collections::HashMap,
    future::Future,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

/// Upper bound for establishing the initial Redis connection
const REDIS_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Errors raised by a cache backend
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(#[from] redis::RedisError),

    #[error("cache operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Storage behind the read-through cache.
///
/// Expired entries must never be returned from `get`. Writes overwrite any
/// previous value for the key.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Value for `key` if present and not expired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `value` under `key`, expiring after `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Instant,
}

/// Process-local cache store
///
/// Expired entries are dropped lazily when read.
pub struct InMemoryCacheStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Number of stored entries, including expired ones not yet read.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());

        match entries.get(key) {
            Some(entry) if entry.expires_at > now => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let expires_at = self.clock.now() + ttl;
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Redis-backed cache store
///
/// Uses `GET` / `SETEX` over an auto-reconnecting multiplexed connection.
/// Every command is bounded by `op_timeout` so an unreachable server shows
/// up as an error instead of a stalled request.
#[derive(Clone)]
pub struct RedisCacheStore {
    connection: ConnectionManager,
    op_timeout: Duration,
}

impl RedisCacheStore {
    /// Connect to the Redis server at `url`.
    pub async fn connect(url: &str, op_timeout: Duration) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        let connection = tokio::time::timeout(REDIS_CONNECT_TIMEOUT, ConnectionManager::new(client))
            .await
            .map_err(|_| CacheError::Timeout(REDIS_CONNECT_TIMEOUT))??;

        Ok(Self {
            connection,
            op_timeout,
        })
    }

    async fn bounded<T, F>(&self, command: F) -> Result<T, CacheError>
    where
        F: Future<Output = RedisResult<T>>,
    {
        match tokio::time::timeout(self.op_timeout, command).await {
            Ok(result) => result.map_err(CacheError::from),
            Err(_) => Err(CacheError::Timeout(self.op_timeout)),
        }
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut connection = self.connection.clone();
        self.bounded(async move { connection.get::<_, Option<String>>(key).await })
            .await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut connection = self.connection.clone();
        // SETEX rejects a zero expiry
        let seconds = ttl.as_secs().max(1);
        self.bounded(async move { connection.set_ex::<_, _, ()>(key, value, seconds).await })
            .await
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::clock::ManualClock;

    #[tokio::test]
    async fn test_get_returns_stored_value() {
        let store = InMemoryCacheStore::new();
        store
            .set("paris", "{\"city\":\"Paris\"}", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(
            store.get("paris").await.unwrap().as_deref(),
            Some("{\"city\":\"Paris\"}")
        );
        assert_eq!(store.get("london").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites_existing_entry() {
        let store = InMemoryCacheStore::new();
        store.set("paris", "old", Duration::from_secs(60)).await.unwrap();
        store.set("paris", "new", Duration::from_secs(60)).await.unwrap();

        assert_eq!(store.get("paris").await.unwrap().as_deref(), Some("new"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_entries_expire_after_ttl() {
        let clock = Arc::new(ManualClock::new());
        let store = InMemoryCacheStore::with_clock(clock.clone());
        store
            .set("paris", "value", Duration::from_secs(12 * 60 * 60))
            .await
            .unwrap();

        clock.advance(Duration::from_secs(12 * 60 * 60 - 1));
        assert!(store.get("paris").await.unwrap().is_some());

        clock.advance(Duration::from_secs(1));
        assert!(store.get("paris").await.unwrap().is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_redis_connect_rejects_invalid_url() {
        let result = RedisCacheStore::connect("not a redis url", Duration::from_millis(100)).await;
        assert!(matches!(result, Err(CacheError::Backend(_))));
    }

    #[tokio::test]
    async fn test_redis_connect_fails_for_unreachable_server() {
        let result = RedisCacheStore::connect("redis://127.0.0.1:1", Duration::from_millis(100)).await;
        assert!(matches!(
            result,
            Err(CacheError::Backend(_)) | Err(CacheError::Timeout(_))
        ));
    }
}
