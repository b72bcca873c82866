use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel country code used when a provider cannot name the country.
pub const UNKNOWN_COUNTRY: &str = "XX";

/// Icon shown when a provider supplies no icon of its own.
pub const DEFAULT_ICON: &str = "01d";

/// Assumed visibility when a provider omits the field.
pub const DEFAULT_VISIBILITY_METERS: u32 = 10_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Normalized, provider-agnostic current conditions.
///
/// Every field is always populated: adapters substitute the documented
/// defaults (`UNKNOWN_COUNTRY`, `DEFAULT_ICON`, `DEFAULT_VISIBILITY_METERS`,
/// origin coordinates) for anything their provider omits, so a record can be
/// rendered without any missing-data checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub city_name: String,
    pub country_code: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: u32,
    pub condition_main: String,
    pub condition_description: String,
    pub icon_code: String,
    pub wind_speed_mps: f64,
    /// 0–359, normalized by the adapters.
    pub wind_direction_deg: u16,
    pub cloudiness_pct: u8,
    pub visibility_meters: u32,
    pub observed_at: DateTime<Utc>,
    pub coordinates: Coordinates,
}
