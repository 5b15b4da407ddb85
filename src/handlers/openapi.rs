//! OpenAPI specification generation and app factory.

use crate::{
    config::MetricsConfig,
    handlers::{get_metrics, health, version, weather},
    middleware::{MetricsMiddleware, RequestIdMiddleware},
    services::{AppMetrics, WeatherService},
};
use actix_web::App;
use paperclip::actix::{web, OpenApiExt};
use paperclip::v2::models::{DefaultApiRaw, Info};

/// Creates the shared OpenAPI specification for the API
pub fn create_openapi_spec() -> DefaultApiRaw {
    DefaultApiRaw {
        info: Info {
            title: "Weather Lookup API".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            description: Some(
                "Current weather conditions per city with a read-through cache.\n\n\
                ## Caching\n\
                Results are cached per normalized city name (trimmed, lower-cased) for 12 hours. \
                The `source` field of a successful response is `cache` or `API`.\n\
                \n\
                ## Rate limiting\n\
                Each client address may make 5 weather requests per minute. \
                Further requests receive `429 Too Many Requests` until the window resets.\n\
                \n\
                ## Errors\n\
                Errors are JSON objects with an `error` field and, for upstream and unexpected \
                failures, a `message` field describing the cause."
                    .into(),
            ),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Shared state handed to every worker's app instance
///
/// Built once before the server starts so that the rate limiter and cache
/// are shared by all workers.
#[derive(Clone)]
pub struct AppState {
    pub weather: web::Data<WeatherService>,
    pub metrics: web::Data<AppMetrics>,
    pub metrics_config: web::Data<MetricsConfig>,
}

impl AppState {
    pub fn new(weather: WeatherService, metrics: AppMetrics, metrics_config: MetricsConfig) -> Self {
        Self {
            weather: web::Data::new(weather),
            metrics: web::Data::new(metrics),
            metrics_config: web::Data::new(metrics_config),
        }
    }
}

/// Creates the application with all routes and middleware
///
/// - `GET /weather` weather lookup
/// - `GET /api/health`, `GET /api/version`, `GET /api/metrics`
/// - `GET /api/spec/v2` OpenAPI document
///
/// Used by both `main` and the integration tests.
pub fn create_app(
    state: AppState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(RequestIdMiddleware)
        .wrap(MetricsMiddleware)
        .wrap_api_with_spec(create_openapi_spec())
        .app_data(state.weather)
        .app_data(state.metrics)
        .app_data(state.metrics_config)
        .service(web::resource("/weather").route(web::get().to(weather)))
        .service(web::resource("/api/health").route(web::get().to(health)))
        .service(web::resource("/api/version").route(web::get().to(version)))
        .service(web::resource("/api/metrics").route(web::get().to(get_metrics)))
        .with_json_spec_at("/api/spec/v2")
        .build()
}
