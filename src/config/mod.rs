//! Configuration structures and loading utilities.
//!
//! Every structure loads from environment variables with `from_env()` and
//! falls back to its `Default` for anything unset or unparsable.

pub mod cache;
pub mod metrics;
pub mod rate_limit;
pub mod server;
pub mod weather_api;

pub use cache::*;
pub use metrics::*;
pub use rate_limit::*;
pub use server::*;
pub use weather_api::*;

/// All configuration the service needs at startup
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub weather_api: WeatherApiConfig,
    pub cache: CacheConfig,
    pub rate_limit: RateLimitConfig,
    pub metrics: MetricsConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            weather_api: WeatherApiConfig::from_env(),
            cache: CacheConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
            metrics: MetricsConfig::from_env(),
            server: ServerConfig::from_env(),
            logging: LoggingConfig::from_env(),
        }
    }
}
