//! Weather lookup service: rate limit, read-through cache, upstream fetch.

use crate::{
    config::AppConfig,
    models::{ErrorResponse, WeatherRecord, WeatherSource},
    services::{
        cache::{CacheStore, InMemoryCacheStore, RedisCacheStore},
        metrics::AppMetrics,
        rate_limit::SimpleRateLimiter,
        upstream::{ClientInitError, UpstreamError, VisualCrossingClient, WeatherProvider},
    },
    utils::text::normalize_city,
};
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tracing::{debug, error, info, warn};

/// Errors returned by [`WeatherService::lookup`]
///
/// Each variant maps to exactly one HTTP status and JSON body.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("API key not found")]
    Configuration,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimitExceeded,

    #[error("Invalid city name or API error")]
    BadRequest,

    #[error("Weather API request failed: {0}")]
    UpstreamFailure(String),

    #[error("An unexpected error occurred: {0}")]
    Internal(String),
}

impl WeatherError {
    fn body(&self) -> ErrorResponse {
        match self {
            WeatherError::Configuration => ErrorResponse::new("API key not found"),
            WeatherError::RateLimitExceeded => ErrorResponse::new("Too Many Requests")
                .with_message("Rate limit exceeded. Please try again later."),
            WeatherError::BadRequest => ErrorResponse::new("Invalid city name or API error"),
            WeatherError::UpstreamFailure(cause) => {
                ErrorResponse::new("Weather API request failed").with_message(cause.clone())
            }
            WeatherError::Internal(cause) => {
                ErrorResponse::new("An unexpected error occurred").with_message(cause.clone())
            }
        }
    }
}

impl ResponseError for WeatherError {
    fn status_code(&self) -> StatusCode {
        match self {
            WeatherError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            WeatherError::BadRequest => StatusCode::BAD_REQUEST,
            WeatherError::Configuration
            | WeatherError::UpstreamFailure(_)
            | WeatherError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.body())
    }
}

/// Errors while assembling the service at startup
#[derive(Debug, thiserror::Error)]
pub enum ServiceInitError {
    #[error(transparent)]
    Client(#[from] ClientInitError),
}

/// Coordinates the rate limiter, cache and weather provider.
///
/// Holds no mutable state of its own; the limiter and cache are shared
/// across every worker through this one instance.
pub struct WeatherService {
    cache: Arc<dyn CacheStore>,
    provider: Arc<dyn WeatherProvider>,
    limiter: SimpleRateLimiter,
    api_key: Option<String>,
    cache_ttl: Duration,
    metrics: Option<AppMetrics>,
}

impl WeatherService {
    pub fn new(
        cache: Arc<dyn CacheStore>,
        provider: Arc<dyn WeatherProvider>,
        limiter: SimpleRateLimiter,
        api_key: Option<String>,
    ) -> Self {
        Self {
            cache,
            provider,
            limiter,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            cache_ttl: Duration::from_secs(crate::config::DEFAULT_CACHE_TTL_SECONDS),
            metrics: None,
        }
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_metrics(mut self, metrics: AppMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Build the production service from configuration.
    ///
    /// Uses Redis when `REDIS_URL` is configured and reachable, otherwise
    /// the in-memory store.
    pub async fn from_config(config: &AppConfig) -> Result<Self, ServiceInitError> {
        let cache: Arc<dyn CacheStore> = match &config.cache.redis_url {
            Some(url) => match RedisCacheStore::connect(url, config.cache.redis_timeout()).await {
                Ok(store) => {
                    info!("Connected to Redis cache");
                    Arc::new(store)
                }
                Err(e) => {
                    error!(error = %e, "Redis unavailable, falling back to in-memory cache");
                    Arc::new(InMemoryCacheStore::new())
                }
            },
            None => Arc::new(InMemoryCacheStore::new()),
        };

        let provider = Arc::new(VisualCrossingClient::new(&config.weather_api)?);
        let limiter = SimpleRateLimiter::new(config.rate_limit.clone());

        if config.weather_api.api_key.is_none() {
            warn!("WEATHER_API_KEY is not set; weather requests will fail");
        }

        Ok(Self::new(cache, provider, limiter, config.weather_api.api_key.clone())
            .with_cache_ttl(config.cache.ttl()))
    }

    pub fn cache_backend(&self) -> &'static str {
        self.cache.backend()
    }

    /// Current weather for `raw_city` on behalf of `client_id`.
    pub async fn lookup(
        &self,
        raw_city: Option<&str>,
        client_id: &str,
    ) -> Result<(WeatherRecord, WeatherSource), WeatherError> {
        let city = normalize_city(raw_city);

        if !self.limiter.allow(client_id) {
            warn!(client = %client_id, "Rate limit exceeded");
            if let Some(metrics) = &self.metrics {
                metrics.record_rate_limited();
            }
            return Err(WeatherError::RateLimitExceeded);
        }

        let Some(api_key) = self.api_key.as_deref() else {
            error!("Weather API key is not configured");
            return Err(WeatherError::Configuration);
        };

        if let Some(record) = self.read_cache(&city).await {
            debug!(city = %city, "Serving weather from cache");
            return Ok((record, WeatherSource::Cache));
        }

        let record = self.fetch_upstream(&city, api_key).await?;
        self.write_cache(&city, &record).await?;

        Ok((record, WeatherSource::Api))
    }

    /// Cached record for `key`; any failure counts as a miss.
    async fn read_cache(&self, key: &str) -> Option<WeatherRecord> {
        let (record, outcome) = match self.cache.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str::<WeatherRecord>(&raw) {
                Ok(record) if record.is_complete() => (Some(record), "hit"),
                Ok(_) => {
                    warn!(city = %key, "Cached weather record is incomplete, refetching");
                    (None, "corrupt")
                }
                Err(e) => {
                    warn!(city = %key, error = %e, "Cached weather record is unreadable, refetching");
                    (None, "corrupt")
                }
            },
            Ok(None) => (None, "miss"),
            Err(e) => {
                warn!(
                    city = %key,
                    backend = self.cache.backend(),
                    error = %e,
                    "Cache read failed, treating as miss"
                );
                (None, "error")
            }
        };

        if let Some(metrics) = &self.metrics {
            metrics.record_cache_lookup(outcome);
        }
        record
    }

    async fn write_cache(&self, key: &str, record: &WeatherRecord) -> Result<(), WeatherError> {
        let value = serde_json::to_string(record)
            .map_err(|e| WeatherError::Internal(format!("failed to serialize weather record: {e}")))?;

        if let Err(e) = self.cache.set(key, &value, self.cache_ttl).await {
            warn!(
                city = %key,
                backend = self.cache.backend(),
                error = %e,
                "Cache write failed"
            );
        }
        Ok(())
    }

    async fn fetch_upstream(&self, city: &str, api_key: &str) -> Result<WeatherRecord, WeatherError> {
        let start = Instant::now();
        let result = self.provider.fetch(city, api_key).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(UpstreamError::InvalidCity) => "invalid_city",
            Err(UpstreamError::Request(_)) => "request_error",
            Err(UpstreamError::MalformedPayload(_)) => "malformed",
        };
        if let Some(metrics) = &self.metrics {
            metrics.record_upstream(outcome, start.elapsed());
        }

        result.map_err(|e| match e {
            UpstreamError::InvalidCity => {
                info!(city = %city, "Weather API returned no forecast days");
                WeatherError::BadRequest
            }
            UpstreamError::Request(cause) => {
                error!(city = %city, error = %cause, "Weather API request failed");
                WeatherError::UpstreamFailure(cause)
            }
            UpstreamError::MalformedPayload(cause) => {
                error!(city = %city, error = %cause, "Weather API payload unusable");
                WeatherError::Internal(cause)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_json(err: WeatherError) -> (StatusCode, serde_json::Value) {
        let response = err.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn test_configuration_error_response() {
        let (status, json) = body_json(WeatherError::Configuration).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json, serde_json::json!({"error": "API key not found"}));
    }

    #[actix_web::test]
    async fn test_bad_request_response() {
        let (status, json) = body_json(WeatherError::BadRequest).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json, serde_json::json!({"error": "Invalid city name or API error"}));
    }

    #[actix_web::test]
    async fn test_upstream_failure_response_carries_cause() {
        let (status, json) =
            body_json(WeatherError::UpstreamFailure("connection refused".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json,
            serde_json::json!({
                "error": "Weather API request failed",
                "message": "connection refused"
            })
        );
    }

    #[actix_web::test]
    async fn test_internal_error_response_carries_cause() {
        let (status, json) = body_json(WeatherError::Internal("boom".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "An unexpected error occurred");
        assert_eq!(json["message"], "boom");
    }

    #[actix_web::test]
    async fn test_rate_limit_response() {
        let (status, json) = body_json(WeatherError::RateLimitExceeded).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(json["error"], "Too Many Requests");
    }

    #[actix_web::test]
    async fn test_unreachable_redis_falls_back_to_memory() {
        let mut config = AppConfig::default();
        config.cache.redis_url = Some("redis://127.0.0.1:1".to_string());

        let service = WeatherService::from_config(&config).await.unwrap();
        assert_eq!(service.cache_backend(), "memory");
    }

    #[actix_web::test]
    async fn test_memory_cache_without_redis_url() {
        let service = WeatherService::from_config(&AppConfig::default()).await.unwrap();
        assert_eq!(service.cache_backend(), "memory");
    }
}
