//! Secondary adapter: OpenWeather current conditions.
//!
//! With `units=metric` the payload already matches the normalized record
//! nearly field for field, so this is mostly a pass-through with defaults
//! for the optional pieces.

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

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
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
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    deg: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct OwClouds {
    all: u8,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: Option<i64>,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: Option<OwWind>,
    clouds: Option<OwClouds>,
    visibility: Option<u32>,
    sys: Option<OwSys>,
    coord: Option<OwCoord>,
}

fn normalize(parsed: OwCurrentResponse) -> WeatherRecord {
    let observed_at = parsed.dt.and_then(unix_to_utc).unwrap_or_else(Utc::now);

    let (condition_main, condition_description, icon_code) = parsed
        .weather
        .into_iter()
        .next()
        .map(|w| {
            (w.main, w.description, w.icon.unwrap_or_else(|| model::DEFAULT_ICON.to_string()))
        })
        .unwrap_or_else(|| {
            ("Clear".to_string(), "clear sky".to_string(), model::DEFAULT_ICON.to_string())
        });

    let wind = parsed.wind.unwrap_or(OwWind { speed: 0.0, deg: None });

    WeatherRecord {
        city_name: parsed.name,
        country_code: parsed
            .sys
            .and_then(|s| s.country)
            .unwrap_or_else(|| model::UNKNOWN_COUNTRY.to_string()),
        temperature_c: parsed.main.temp,
        feels_like_c: parsed.main.feels_like,
        humidity_pct: parsed.main.humidity,
        pressure_hpa: parsed.main.pressure.unwrap_or(0),
        condition_main,
        condition_description,
        icon_code,
        // already m/s under units=metric
        wind_speed_mps: wind.speed,
        wind_direction_deg: wind.deg.unwrap_or(0) % 360,
        cloudiness_pct: parsed.clouds.map_or(0, |c| c.all),
        visibility_meters: parsed.visibility.unwrap_or(model::DEFAULT_VISIBILITY_METERS),
        observed_at,
        coordinates: parsed
            .coord
            .map_or_else(Coordinates::default, |c| Coordinates { lat: c.lat, lon: c.lon }),
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenWeather
    }

    async fn fetch(&self, city: &str) -> Result<WeatherRecord, ProviderError> {
        let url = format!("{}/data/2.5/weather", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::debug!(%status, body = %truncate_body(&body), "openweather request failed");
            return Err(ProviderError::Unavailable { status: status.as_u16() });
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        Ok(normalize(parsed))
    }
}
