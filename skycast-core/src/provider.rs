use crate::{error::ProviderError, model::WeatherRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{convert::TryFrom, fmt::Debug, time::Duration};

pub mod mock;
pub mod openweather;
pub mod visualcrossing;
pub mod weatherapi;

/// Bounded wait for any single remote call.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    WeatherApi,
    OpenWeather,
    VisualCrossing,
    Mock,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::WeatherApi => "weatherapi",
            ProviderId::OpenWeather => "openweather",
            ProviderId::VisualCrossing => "visualcrossing",
            ProviderId::Mock => "mock",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[
            ProviderId::WeatherApi,
            ProviderId::OpenWeather,
            ProviderId::VisualCrossing,
            ProviderId::Mock,
        ]
    }

    /// The synthetic generator is the only adapter that works without
    /// credentials.
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, ProviderId::Mock)
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "weatherapi" => Ok(ProviderId::WeatherApi),
            "openweather" => Ok(ProviderId::OpenWeather),
            "visualcrossing" => Ok(ProviderId::VisualCrossing),
            "mock" => Ok(ProviderId::Mock),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: weatherapi, openweather, visualcrossing."
            )),
        }
    }
}

/// Capability shared by every adapter in the fallback chain: turn a city
/// name into a fully populated record, or fail with a classified error.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    fn id(&self) -> ProviderId;

    async fn fetch(&self, city: &str) -> Result<WeatherRecord, ProviderError>;
}

pub(crate) fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX { format!("{}...", &body[..MAX]) } else { body.to_string() }
}
