//! Upstream weather provider client.
//!
//! Fetches the Visual Crossing timeline for a city and reduces it to a
//! [`WeatherRecord`] for the first forecast day. No caching and no retries
//! happen here; a single bounded request is made per call.

use crate::{config::WeatherApiConfig, models::WeatherRecord, utils::text::title_case};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, warn};
use url::Url;

/// Errors from a provider call
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// The provider answered without any forecast days.
    #[error("Invalid city name or API error")]
    InvalidCity,

    /// Transport failure, timeout, non-success status or unreadable body.
    #[error("{0}")]
    Request(String),

    /// Forecast days were present but the first day is unusable.
    #[error("malformed forecast payload: {0}")]
    MalformedPayload(String),
}

/// Errors building the client
#[derive(Debug, thiserror::Error)]
pub enum ClientInitError {
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid weather API base URL: {0}")]
    BaseUrl(#[from] url::ParseError),

    #[error("weather API base URL cannot take path segments: {0}")]
    NotHierarchical(String),
}

/// A source of current weather for a normalized city name
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn fetch(&self, city: &str, api_key: &str) -> Result<WeatherRecord, UpstreamError>;
}

/// Client for the Visual Crossing timeline API
#[derive(Debug, Clone)]
pub struct VisualCrossingClient {
    client: Client,
    base_url: Url,
}

impl VisualCrossingClient {
    /// Create a client from the weather API configuration
    pub fn new(config: &WeatherApiConfig) -> Result<Self, ClientInitError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()?;

        let base_url = Url::parse(config.base_url.trim_end_matches('/'))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientInitError::NotHierarchical(config.base_url.clone()));
        }

        Ok(Self { client, base_url })
    }

    /// `{base}/{city}?unitGroup=metric&key=..&contentType=json`
    fn timeline_url(&self, city: &str, api_key: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(city);
        }
        url.query_pairs_mut()
            .append_pair("unitGroup", "metric")
            .append_pair("key", api_key)
            .append_pair("contentType", "json");
        url
    }

    fn destination(&self) -> &str {
        self.base_url.host_str().unwrap_or("unknown")
    }
}

#[async_trait]
impl WeatherProvider for VisualCrossingClient {
    async fn fetch(&self, city: &str, api_key: &str) -> Result<WeatherRecord, UpstreamError> {
        let url = self.timeline_url(city, api_key);
        let start = Instant::now();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| {
                warn!(
                    destination = %self.destination(),
                    city = %city,
                    timeout = e.is_timeout(),
                    duration_ms = start.elapsed().as_millis(),
                    "Weather API request failed"
                );
                UpstreamError::Request(describe(e))
            })?;

        let status = response.status();
        debug!(
            destination = %self.destination(),
            city = %city,
            status = status.as_u16(),
            duration_ms = start.elapsed().as_millis(),
            "Weather API responded"
        );

        if !status.is_success() {
            return Err(UpstreamError::Request(format!(
                "Weather API returned status: {status}"
            )));
        }

        let timeline: Value = response
            .json()
            .await
            .map_err(|e| {
                UpstreamError::Request(format!("Failed to parse weather data: {}", describe(e)))
            })?;

        record_from_timeline(city, timeline)
    }
}

/// Error text with its cause chain.
///
/// reqwest errors embed the request URL, which carries the API key, so it
/// is stripped first.
fn describe(error: reqwest::Error) -> String {
    let error = error.without_url();
    let mut message = error.to_string();
    let mut source = std::error::Error::source(&error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Reduce a timeline body to the first forecast day.
///
/// Anything other than an object with a non-empty `days` list whose first
/// entry is an object counts as an unknown city.
fn record_from_timeline(city: &str, timeline: Value) -> Result<WeatherRecord, UpstreamError> {
    let today = timeline
        .get("days")
        .and_then(Value::as_array)
        .and_then(|days| days.first())
        .and_then(Value::as_object)
        .ok_or(UpstreamError::InvalidCity)?;

    let temp = today
        .get("temp")
        .and_then(|t| match t {
            Value::Number(n) => Some(n),
            _ => None,
        })
        .ok_or_else(|| UpstreamError::MalformedPayload("missing 'temp'".to_string()))?;

    let description = today
        .get("conditions")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| UpstreamError::MalformedPayload("missing 'conditions'".to_string()))?;

    Ok(WeatherRecord {
        city: title_case(city),
        temperature: format_temperature(temp),
        description: description.to_string(),
    })
}

/// Render a temperature the way the provider sent it: integers stay
/// integral, floats always keep a fractional part (`18` vs `18.0`).
///
/// Branches on the number kind instead of relying on `Number`'s `Display`,
/// which prints the raw text when serde_json's `arbitrary_precision` is on.
fn format_temperature(temp: &serde_json::Number) -> String {
    if let Some(whole) = temp.as_i64() {
        format!("{whole}°C")
    } else if let Some(whole) = temp.as_u64() {
        format!("{whole}°C")
    } else if let Some(value) = temp.as_f64() {
        format!("{value:?}°C")
    } else {
        format!("{temp}°C")
    }
}
