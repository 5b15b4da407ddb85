//! Weather Lookup API - current weather per city behind a read-through cache
//!
//! An Actix Web service exposing `GET /weather?city=<name>`:
//! - per-client fixed-window rate limiting (5 requests per minute)
//! - cache-aside lookups keyed by normalized city name, 12 hour TTL,
//!   in-memory or Redis backed
//! - Visual Crossing as the upstream weather provider
//! - Prometheus metrics, request IDs and structured logging
//!
//! ## Architecture
//!
//! - `models/` - Request/response models and the cached `WeatherRecord`
//! - `handlers/` - HTTP request handlers and the app factory
//! - `middleware/` - Request ID and metrics middleware
//! - `services/` - Rate limiter, cache stores, upstream client, lookup service
//! - `utils/` - Client identity, city formatting, clocks
//! - `config/` - Environment-driven configuration
//! - `telemetry` - Tracing subscriber setup
//!
//! ## Quick Start
//!
//! ```no_run
//! use actix_web::HttpServer;
//! use weather_lookup_api::{create_app, AppConfig, AppMetrics, AppState, WeatherService};
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let config = AppConfig::from_env();
//!     let service = WeatherService::from_config(&config).await.map_err(std::io::Error::other)?;
//!     let metrics = AppMetrics::new().map_err(std::io::Error::other)?;
//!     let state = AppState::new(service, metrics, config.metrics.clone());
//!
//!     HttpServer::new(move || create_app(state.clone()))
//!         .bind(&config.server.bind_address)?
//!         .run()
//!         .await
//! }
//! ```

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod telemetry;
pub mod utils;

pub use config::{
    AppConfig, CacheConfig, LoggingConfig, MetricsConfig, RateLimitConfig, ServerConfig,
    WeatherApiConfig,
};
pub use handlers::{create_app, create_openapi_spec, get_metrics, health, version, weather, AppState};
pub use middleware::{MetricsMiddleware, RequestIdMiddleware};
pub use models::{
    ErrorResponse, HealthResponse, VersionResponse, WeatherQuery, WeatherRecord, WeatherResponse,
    WeatherSource,
};
pub use services::{
    AppMetrics, CacheError, CacheStore, InMemoryCacheStore, RedisCacheStore, SimpleRateLimiter,
    UpstreamError, VisualCrossingClient, WeatherError, WeatherProvider, WeatherService,
};
pub use utils::{Clock, ManualClock, SystemClock, client_identity, normalize_city, title_case};
