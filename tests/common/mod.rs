//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};
use weather_lookup_api::{
    AppMetrics, AppState, CacheError, CacheStore, InMemoryCacheStore, ManualClock, MetricsConfig,
    RateLimitConfig, SimpleRateLimiter, UpstreamError, WeatherProvider, WeatherRecord,
    WeatherService, title_case,
};

pub const API_KEY: &str = "test-api-key";

/// What the stub provider answers with
#[derive(Debug, Clone)]
pub enum StubReply {
    Weather { temperature: String, description: String },
    InvalidCity,
    RequestError(String),
    Malformed(String),
}

/// Provider that records calls and answers with a fixed reply
pub struct StubProvider {
    calls: AtomicUsize,
    last_city: Mutex<Option<String>>,
    reply: Mutex<StubReply>,
}

impl StubProvider {
    pub fn new(reply: StubReply) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            last_city: Mutex::new(None),
            reply: Mutex::new(reply),
        }
    }

    pub fn sunny() -> Self {
        Self::new(StubReply::Weather {
            temperature: "18.4°C".to_string(),
            description: "Partly cloudy".to_string(),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_city(&self) -> Option<String> {
        self.last_city.lock().unwrap().clone()
    }

    pub fn set_reply(&self, reply: StubReply) {
        *self.reply.lock().unwrap() = reply;
    }
}

#[async_trait]
impl WeatherProvider for StubProvider {
    async fn fetch(&self, city: &str, api_key: &str) -> Result<WeatherRecord, UpstreamError> {
        assert_eq!(api_key, API_KEY);
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_city.lock().unwrap() = Some(city.to_string());

        match self.reply.lock().unwrap().clone() {
            StubReply::Weather {
                temperature,
                description,
            } => Ok(WeatherRecord {
                city: title_case(city),
                temperature,
                description,
            }),
            StubReply::InvalidCity => Err(UpstreamError::InvalidCity),
            StubReply::RequestError(cause) => Err(UpstreamError::Request(cause)),
            StubReply::Malformed(cause) => Err(UpstreamError::MalformedPayload(cause)),
        }
    }
}

/// Cache backend that is always unreachable
#[derive(Default)]
pub struct UnreachableCache {
    pub attempts: AtomicUsize,
}

#[async_trait]
impl CacheStore for UnreachableCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(CacheError::Timeout(Duration::from_millis(500)))
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), CacheError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(CacheError::Timeout(Duration::from_millis(500)))
    }

    fn backend(&self) -> &'static str {
        "unreachable"
    }
}

/// Service wired to a manual clock, an inspectable in-memory cache and a
/// stub provider
pub struct Harness {
    pub clock: Arc<ManualClock>,
    pub cache: Arc<InMemoryCacheStore>,
    pub provider: Arc<StubProvider>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_provider(StubProvider::sunny())
    }

    pub fn with_provider(provider: StubProvider) -> Self {
        let clock = Arc::new(ManualClock::new());
        Self {
            cache: Arc::new(InMemoryCacheStore::with_clock(clock.clone())),
            clock,
            provider: Arc::new(provider),
        }
    }

    /// Service with a quota generous enough not to interfere
    pub fn service(&self) -> WeatherService {
        self.service_with(
            RateLimitConfig {
                requests_per_window: 1_000,
                period_seconds: 60,
            },
            Some(API_KEY.to_string()),
        )
    }

    pub fn service_with(&self, rate_limit: RateLimitConfig, api_key: Option<String>) -> WeatherService {
        WeatherService::new(
            self.cache.clone(),
            self.provider.clone(),
            SimpleRateLimiter::with_clock(rate_limit, self.clock.clone()),
            api_key,
        )
        .with_cache_ttl(Duration::from_secs(12 * 60 * 60))
    }
}

pub fn app_state(service: WeatherService) -> AppState {
    let metrics = AppMetrics::new().unwrap();
    AppState::new(service.with_metrics(metrics.clone()), metrics, MetricsConfig::default())
}
