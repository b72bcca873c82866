//! Primary adapter: WeatherAPI.com current conditions.
//!
//! WeatherAPI reports wind in km/h and carries no OpenWeather-style icon
//! code, so the adapter converts the wind speed and pins the icon to the
//! default sentinel.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::ProviderError,
    model::{self, Coordinates, WeatherRecord},
    provider::{REQUEST_TIMEOUT, truncate_body, unix_to_utc},
};

use super::{ProviderId, WeatherProvider};

const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com";

#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: String) -> Result<Self, ProviderError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { api_key, base_url: DEFAULT_BASE_URL.to_string(), http })
    }

    /// Point the adapter at a different host. Used by tests against a mock
    /// server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    feelslike_c: f64,
    humidity: u8,
    pressure_mb: f64,
    wind_kph: f64,
    wind_degree: Option<u16>,
    condition: WaCondition,
    last_updated_epoch: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    location: WaLocation,
    current: WaCurrent,
}

fn normalize(parsed: WaResponse) -> WeatherRecord {
    let observed_at =
        parsed.current.last_updated_epoch.and_then(unix_to_utc).unwrap_or_else(Utc::now);
    let condition = parsed.current.condition.text;

    WeatherRecord {
        city_name: parsed.location.name,
        country_code: parsed.location.country,
        temperature_c: parsed.current.temp_c,
        feels_like_c: parsed.current.feelslike_c,
        humidity_pct: parsed.current.humidity,
        pressure_hpa: parsed.current.pressure_mb.round() as u32,
        condition_description: condition.to_lowercase(),
        condition_main: condition,
        // WeatherAPI has no icon codes
        icon_code: model::DEFAULT_ICON.to_string(),
        wind_speed_mps: parsed.current.wind_kph / 3.6,
        wind_direction_deg: parsed.current.wind_degree.unwrap_or(0) % 360,
        cloudiness_pct: 0,
        visibility_meters: model::DEFAULT_VISIBILITY_METERS,
        observed_at,
        coordinates: Coordinates::default(),
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::WeatherApi
    }

    async fn fetch(&self, city: &str) -> Result<WeatherRecord, ProviderError> {
        let url = format!("{}/v1/current.json", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", city), ("aqi", "no")])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::debug!(%status, body = %truncate_body(&body), "weatherapi request failed");
            return Err(ProviderError::Unavailable { status: status.as_u16() });
        }

        let parsed: WaResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        Ok(normalize(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> WaResponse {
        WaResponse {
            location: WaLocation {
                name: "London".to_string(),
                country: "United Kingdom".to_string(),
            },
            current: WaCurrent {
                temp_c: 15.0,
                feelslike_c: 13.5,
                humidity: 72,
                pressure_mb: 1012.6,
                wind_kph: 18.0,
                wind_degree: Some(360),
                condition: WaCondition { text: "Partly Cloudy".to_string() },
                last_updated_epoch: Some(1_700_000_000),
            },
        }
    }

    #[test]
    fn wind_is_converted_from_kph() {
        let record = normalize(sample());
        assert!((record.wind_speed_mps - 5.0).abs() < 1e-9);
    }

    #[test]
    fn icon_is_always_the_sentinel() {
        assert_eq!(normalize(sample()).icon_code, "01d");
    }

    #[test]
    fn condition_description_is_lowercased() {
        let record = normalize(sample());
        assert_eq!(record.condition_main, "Partly Cloudy");
        assert_eq!(record.condition_description, "partly cloudy");
    }

    #[test]
    fn degrees_wrap_and_pressure_rounds() {
        let record = normalize(sample());
        assert_eq!(record.wind_direction_deg, 0);
        assert_eq!(record.pressure_hpa, 1013);
    }

    #[test]
    fn omitted_fields_take_defaults() {
        let record = normalize(sample());
        assert_eq!(record.visibility_meters, 10_000);
        assert_eq!(record.cloudiness_pct, 0);
        assert_eq!(record.coordinates, Coordinates::default());
    }
}
