//! Tertiary adapter: Visual Crossing timeline endpoint, "today" slice.
//!
//! The timeline response resolves the query to a full address; the city is
//! the text before the first comma. Visual Crossing never reports a country
//! code, so the record carries the unknown-country sentinel.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::ProviderError,
    model::{self, Coordinates, WeatherRecord},
    provider::{REQUEST_TIMEOUT, truncate_body},
};

use super::{ProviderId, WeatherProvider};

const DEFAULT_BASE_URL: &str = "https://weather.visualcrossing.com";

#[derive(Debug, Clone)]
pub struct VisualCrossingProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl VisualCrossingProvider {
    pub fn new(api_key: String) -> Result<Self, ProviderError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { api_key, base_url: DEFAULT_BASE_URL.to_string(), http })
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct VcCurrentConditions {
    temp: f64,
    feelslike: f64,
    humidity: f64,
    pressure: f64,
    conditions: String,
    windspeed: f64,
    winddir: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct VcResponse {
    #[serde(rename = "resolvedAddress")]
    resolved_address: String,
    #[serde(rename = "currentConditions")]
    current_conditions: VcCurrentConditions,
}

fn normalize(parsed: VcResponse) -> WeatherRecord {
    let city_name =
        parsed.resolved_address.split(',').next().unwrap_or_default().to_string();
    let current = parsed.current_conditions;

    WeatherRecord {
        city_name,
        country_code: model::UNKNOWN_COUNTRY.to_string(),
        temperature_c: current.temp,
        feels_like_c: current.feelslike,
        humidity_pct: current.humidity.round() as u8,
        pressure_hpa: current.pressure.round() as u32,
        condition_description: current.conditions.to_lowercase(),
        condition_main: current.conditions,
        icon_code: model::DEFAULT_ICON.to_string(),
        wind_speed_mps: current.windspeed / 3.6,
        wind_direction_deg: current.winddir.map_or(0, |d| d.round() as u16) % 360,
        cloudiness_pct: 0,
        visibility_meters: model::DEFAULT_VISIBILITY_METERS,
        observed_at: Utc::now(),
        coordinates: Coordinates::default(),
    }
}

#[async_trait]
impl WeatherProvider for VisualCrossingProvider {
    fn id(&self) -> ProviderId {
        ProviderId::VisualCrossing
    }

    async fn fetch(&self, city: &str) -> Result<WeatherRecord, ProviderError> {
        let url = format!(
            "{}/VisualCrossingWebServices/rest/services/timeline/{}/today",
            self.base_url, city
        );

        let res = self
            .http
            .get(&url)
            .query(&[
                ("unitGroup", "metric"),
                ("include", "current"),
                ("key", self.api_key.as_str()),
                ("contentType", "json"),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::debug!(%status, body = %truncate_body(&body), "visualcrossing request failed");
            return Err(ProviderError::Unavailable { status: status.as_u16() });
        }

        let parsed: VcResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        Ok(normalize(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VcResponse {
        VcResponse {
            resolved_address: "London, England, United Kingdom".to_string(),
            current_conditions: VcCurrentConditions {
                temp: 15.2,
                feelslike: 14.1,
                humidity: 71.6,
                pressure: 1012.4,
                conditions: "Overcast".to_string(),
                windspeed: 18.0,
                winddir: Some(249.7),
            },
        }
    }

    #[test]
    fn city_is_the_text_before_the_first_comma() {
        assert_eq!(normalize(sample()).city_name, "London");
    }

    #[test]
    fn country_is_always_unknown() {
        assert_eq!(normalize(sample()).country_code, "XX");
    }

    #[test]
    fn wind_is_converted_and_direction_rounded() {
        let record = normalize(sample());
        assert!((record.wind_speed_mps - 5.0).abs() < 1e-9);
        assert_eq!(record.wind_direction_deg, 250);
    }

    #[test]
    fn fractional_fields_round_to_record_types() {
        let record = normalize(sample());
        assert_eq!(record.humidity_pct, 72);
        assert_eq!(record.pressure_hpa, 1012);
    }

    #[test]
    fn address_without_commas_is_used_whole() {
        let mut parsed = sample();
        parsed.resolved_address = "Reykjavik".to_string();
        assert_eq!(normalize(parsed).city_name, "Reykjavik");
    }
}
