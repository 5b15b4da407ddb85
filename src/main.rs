use actix_web::HttpServer;
use weather_lookup_api::{
    AppConfig, AppMetrics, AppState, WeatherService, create_app, telemetry::init_tracing,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // A missing .env file is fine; the real environment still applies
    let dotenv = dotenvy::dotenv();

    let config = AppConfig::from_env();
    init_tracing(&config.logging).map_err(std::io::Error::other)?;

    if let Err(e) = dotenv
        && !e.not_found()
    {
        tracing::warn!(error = %e, "Failed to load .env file");
    }

    let service = WeatherService::from_config(&config)
        .await
        .map_err(std::io::Error::other)?;
    let metrics = AppMetrics::new().map_err(std::io::Error::other)?;
    let service = service.with_metrics(metrics.clone());

    tracing::info!(
        bind_address = %config.server.bind_address,
        cache_backend = service.cache_backend(),
        cache_ttl_seconds = config.cache.ttl_seconds,
        rate_limit = config.rate_limit.requests_per_window,
        rate_limit_period_seconds = config.rate_limit.period_seconds,
        "Starting weather lookup API"
    );

    let state = AppState::new(service, metrics, config.metrics.clone());

    HttpServer::new(move || create_app(state.clone()))
        .bind(&config.server.bind_address)?
        .run()
        .await
}
