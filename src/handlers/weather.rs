//! Weather endpoint handler.

use crate::{
    models::{WeatherQuery, WeatherResponse},
    services::weather::{WeatherError, WeatherService},
    utils::http::client_identity,
};
use actix_web::{web, Error, HttpRequest, Result};
use paperclip::actix::api_v2_operation;

/// Weather endpoint
///
/// Returns current conditions for a city, served from cache when a fresh
/// entry exists and from the weather provider otherwise.
#[api_v2_operation(
    summary = "Current Weather Endpoint",
    description = "Returns current weather for a city (e.g., ?city=Paris, default San Francisco). Responses are cached for 12 hours per city; the `source` field tells whether the data came from the cache or the weather API. Each client is limited to 5 requests per minute.",
    tags("Weather"),
    parameters(
        ("city" = Option<String>, Query, description = "City name (e.g., Paris)"),
    ),
    responses(
        (status = 200, description = "Successful response", body = WeatherResponse),
        (status = 400, description = "Bad Request - Invalid city name or API error"),
        (status = 429, description = "Too Many Requests"),
        (status = 500, description = "Internal Server Error - Missing API key or weather API failure")
    )
)]
pub async fn weather(
    req: HttpRequest,
    query: web::Query<WeatherQuery>,
) -> Result<web::Json<WeatherResponse>, Error> {
    let service = req
        .app_data::<web::Data<WeatherService>>()
        .ok_or_else(|| WeatherError::Internal("weather service is not configured".to_string()))?;

    let client_id = client_identity(&req);
    let (record, source) = service.lookup(query.city.as_deref(), &client_id).await?;

    tracing::debug!(
        city = %record.city,
        source = source.as_str(),
        "Returning weather response"
    );

    Ok(web::Json(WeatherResponse::new(record, source)))
}
