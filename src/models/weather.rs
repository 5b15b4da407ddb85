//! Weather request, record and response models.

use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// Query parameters for `GET /weather`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Apiv2Schema)]
pub struct WeatherQuery {
    /// City name (e.g. "Paris"); defaults to San Francisco
    pub city: Option<String>,
}

/// Current conditions for one city, as stored in the cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherRecord {
    /// Title-cased city name
    pub city: String,
    /// Temperature with unit, e.g. "18.4°C"
    pub temperature: String,
    /// Condition summary, e.g. "Partly cloudy"
    pub description: String,
}

impl WeatherRecord {
    /// All fields carry a value.
    pub fn is_complete(&self) -> bool {
        !self.city.trim().is_empty()
            && !self.temperature.trim().is_empty()
            && !self.description.trim().is_empty()
    }
}

/// Where a returned record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Apiv2Schema)]
pub enum WeatherSource {
    #[serde(rename = "cache")]
    Cache,
    #[serde(rename = "API")]
    Api,
}

impl WeatherSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherSource::Cache => "cache",
            WeatherSource::Api => "API",
        }
    }
}

/// Response model for the weather endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct WeatherResponse {
    pub source: WeatherSource,
    pub city: String,
    pub temperature: String,
    pub description: String,
}

impl WeatherResponse {
    pub fn new(record: WeatherRecord, source: WeatherSource) -> Self {
        Self {
            source,
            city: record.city,
            temperature: record.temperature,
            description: record.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_wire_format() {
        let record = WeatherRecord {
            city: "Paris".to_string(),
            temperature: "18.4°C".to_string(),
            description: "Partly cloudy".to_string(),
        };

        let json = serde_json::to_value(WeatherResponse::new(record, WeatherSource::Api)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "source": "API",
                "city": "Paris",
                "temperature": "18.4°C",
                "description": "Partly cloudy"
            })
        );
    }

    #[test]
    fn test_source_labels() {
        assert_eq!(serde_json::to_string(&WeatherSource::Cache).unwrap(), "\"cache\"");
        assert_eq!(WeatherSource::Api.as_str(), "API");
    }

    #[test]
    fn test_incomplete_record() {
        let record = WeatherRecord {
            city: "Paris".to_string(),
            temperature: " ".to_string(),
            description: "Clear".to_string(),
        };
        assert!(!record.is_complete());
    }
}
